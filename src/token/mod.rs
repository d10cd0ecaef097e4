//! Token Exchange
//!
//! Turns stored OAuth2 credentials into a bearer access token. Tokens are
//! fetched fresh on every invocation and never cached.

pub mod exchanger;

pub use exchanger::{LwaTokenExchanger, TokenExchanger};
