//! Device Reset Pipeline
//!
//! Ordered, fail-fast sequence of device-management calls that returns a
//! unit to its default configuration.

mod pipeline;

pub use pipeline::ResetPipeline;
