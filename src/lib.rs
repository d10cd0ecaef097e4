//! Alexa Smart Properties Unit Reset
//!
//! Returns a unit (a group of devices such as a hotel room) to a known state:
//! fetches OAuth2 client credentials from a secret store, exchanges the
//! refresh token for an access token at Login with Amazon, and runs a fixed
//! sequence of device-management calls against the unit.
//!
//! # Features
//!
//! - Credential retrieval from AWS Secrets Manager (Signature V4 signed)
//! - Token Refresh (RFC 6749 Section 6)
//! - Fail-fast reset pipeline: alerts, endpoint settings, notifications,
//!   Bluetooth pairings
//! - Entry adapter producing `{statusCode, body}` envelopes
//!
//! # Example
//!
//! ```rust,no_run
//! use unit_reset::{InvocationEvent, UnitResetConfig, UnitResetHandler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UnitResetConfig::builder()
//!         .secret_id("prod/lwa-credentials")
//!         .region("us-east-1")
//!         .build()?;
//!
//!     let handler = UnitResetHandler::from_config(&config)?;
//!     let response = handler
//!         .handle(InvocationEvent::new("amzn1.alexa.unit.did.EXAMPLE"))
//!         .await;
//!
//!     println!("{} {}", response.status_code, response.body);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: credentials, tokens, reset settings, steps and envelopes
//! - `error`: error hierarchy
//! - `core`: HTTP transport
//! - `credentials`: credential providers and AWS credentials
//! - `signing`: AWS Signature V4
//! - `token`: refresh-token exchange
//! - `api`: device-management API client
//! - `reset`: the reset pipeline
//! - `handler`: the entry adapter
//! - `config`: process configuration
//! - `observability`: logging setup

pub mod api;
pub mod config;
pub mod core;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod observability;
pub mod reset;
pub mod signing;
pub mod token;
pub mod types;

// Re-export the entry points
pub use config::{UnitResetConfig, UnitResetConfigBuilder};
pub use handler::UnitResetHandler;
pub use reset::ResetPipeline;

// Re-export errors
pub use error::{
    ConfigurationError, CredentialError, DeviceApiError, NetworkError, ProtocolError,
    SigningError, TokenError, UnitResetError, UnitResetResult,
};

// Re-export types
pub use types::{
    // Credentials and tokens
    AccessToken, OAuthCredentials, TokenResponse,
    // Settings
    DistanceUnits, ResetConfiguration, TemperatureUnit,
    // Pipeline
    ResetOutcome, ResetStep,
    // Invocation
    InvocationEvent, InvocationResponse,
};

// Re-export core components
pub use crate::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
};

// Re-export collaborators
pub use api::AlexaDeviceApi;
pub use credentials::{
    AwsCredentials, AwsCredentialsProvider, CredentialProvider, EnvAwsCredentialsProvider,
    SecretsManagerCredentialProvider, StaticAwsCredentialsProvider, StaticCredentialProvider,
};
pub use token::{LwaTokenExchanger, TokenExchanger};
