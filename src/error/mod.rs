//! Unit Reset Error Types
//!
//! Error hierarchy for credential retrieval, token exchange and the device
//! reset pipeline.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the unit reset integration.
#[derive(Error, Debug)]
pub enum UnitResetError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Device API error: {0}")]
    DeviceApi(#[from] DeviceApiError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),
}

impl UnitResetError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "UNIT_RESET_CONFIG",
            Self::Credential(_) => "UNIT_RESET_CREDENTIAL",
            Self::Token(_) => "UNIT_RESET_TOKEN",
            Self::DeviceApi(DeviceApiError::EndpointNotFound { .. }) => {
                "UNIT_RESET_ENDPOINT_NOT_FOUND"
            }
            Self::DeviceApi(_) => "UNIT_RESET_REMOTE_API",
            Self::Network(_) => "UNIT_RESET_NETWORK",
            Self::Protocol(_) => "UNIT_RESET_PROTOCOL",
            Self::Signing(_) => "UNIT_RESET_SIGNING",
        }
    }

    /// HTTP status returned by the remote side, if any.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::DeviceApi(DeviceApiError::Remote { status, .. }) => Some(*status),
            Self::Token(TokenError::ExchangeFailed { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Invalid reset setting {field}: {message}")]
    InvalidResetSetting { field: String, message: String },

    #[error("Failed to read settings file {path}: {message}")]
    SettingsFile { path: String, message: String },
}

/// Secret store (credential provider) error.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Secret not found: {secret_id}")]
    NotFound { secret_id: String },

    #[error("Access denied to secret {secret_id}: {message}")]
    AccessDenied { secret_id: String, message: String },

    #[error("Malformed secret {secret_id}: {message}")]
    Malformed { secret_id: String, message: String },

    #[error("Secret store unavailable: {message}")]
    Unavailable { message: String },

    #[error("AWS credentials not found in environment")]
    AwsCredentialsNotFound,
}

/// Token exchange error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid OAuth credentials: {field} is empty")]
    InvalidCredentials { field: String },

    #[error("Token exchange failed with HTTP {status}: {message}")]
    ExchangeFailed { status: u16, message: String },

    #[error("Token response has no access_token")]
    MissingAccessToken,
}

/// Device-management API error.
#[derive(Error, Debug)]
pub enum DeviceApiError {
    #[error("Remote API returned HTTP {status}: {payload}")]
    Remote { status: u16, payload: String },

    #[error("No endpoint associated with unit '{unit_id}'")]
    EndpointNotFound { unit_id: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("HTTP client initialization failed: {message}")]
    ClientInit { message: String },
}

/// Protocol/response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Unexpected redirect to: {location}")]
    UnexpectedRedirect { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// AWS request signing error.
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("Invalid signing key: {message}")]
    InvalidKey { message: String },

    #[error("Invalid request URL: {url}")]
    InvalidUrl { url: String },
}

/// Result type for unit reset operations.
pub type UnitResetResult<T> = Result<T, UnitResetError>;

/// Error payload returned by the LWA token endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Parse a token endpoint error body.
pub fn parse_token_error_response(body: &str) -> Option<TokenErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Create a token exchange error from a non-200 token endpoint response.
pub fn create_token_error(status: u16, body: &str) -> UnitResetError {
    let message = match parse_token_error_response(body) {
        Some(response) => match response.error_description {
            Some(description) => format!("{}: {}", response.error, description),
            None => response.error,
        },
        None => format!("HTTP {}", status),
    };

    UnitResetError::Token(TokenError::ExchangeFailed { status, message })
}

/// Create a device API error from a non-2xx response, preserving the payload.
pub fn create_remote_error(status: u16, body: &str) -> UnitResetError {
    UnitResetError::DeviceApi(DeviceApiError::Remote {
        status,
        payload: body.to_string(),
    })
}
