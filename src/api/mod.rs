//! Device-Management API
//!
//! Unit-scoped alert and notification deletion, endpoint lookup, and the
//! endpoint settings applied by a reset.

mod client;

pub use client::{AlexaDeviceApi, DEFAULT_API_ENDPOINT};
