//! Core Components
//!
//! HTTP transport shared by every remote call.

pub mod transport;

pub use transport::*;
