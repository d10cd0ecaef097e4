//! Invocation Types
//!
//! Event received by the entry adapter and the response envelope it returns.

use serde::{Deserialize, Deserializer, Serialize};

/// Body returned when the reset completed.
pub const RESET_SUCCESS_MESSAGE: &str = "Reset was successful";
/// Body returned when credentials or the access token could not be obtained.
pub const ACCESS_TOKEN_ERROR_MESSAGE: &str = "Access token error";
/// Body returned when the reset pipeline failed.
pub const RESET_FAILURE_MESSAGE: &str = "Reset went wrong. Some internal issue";

/// Incoming invocation event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    /// Unit to reset. Missing, null and empty values are passed through.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub unit_id: String,
}

impl InvocationEvent {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    /// HTTP-style status code (200 or 500).
    pub status_code: u16,
    /// JSON-encoded message.
    pub body: String,
}

impl InvocationResponse {
    /// Build a response whose body is the JSON encoding of `message`.
    pub fn with_message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::Value::String(message.to_string()).to_string(),
        }
    }

    pub fn success() -> Self {
        Self::with_message(200, RESET_SUCCESS_MESSAGE)
    }

    pub fn token_error() -> Self {
        Self::with_message(500, ACCESS_TOKEN_ERROR_MESSAGE)
    }

    pub fn reset_error() -> Self {
        Self::with_message(500, RESET_FAILURE_MESSAGE)
    }
}
