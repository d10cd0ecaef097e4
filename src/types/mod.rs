//! Unit Reset Types

pub mod credentials;
pub mod invocation;
pub mod outcome;
pub mod settings;
pub mod token;

pub use credentials::*;
pub use invocation::*;
pub use outcome::*;
pub use settings::*;
pub use token::*;
