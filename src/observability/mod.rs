//! Observability
//!
//! Logging setup for the library and the `unit-reset` binary. The library
//! itself only emits `tracing` events; installing a subscriber is left to the
//! process entry point.
//!
//! ```rust,no_run
//! use unit_reset::observability::{LoggingConfig, LogFormat};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! LoggingConfig::new().with_format(LogFormat::Json).init()?;
//! # Ok(())
//! # }
//! ```

mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
