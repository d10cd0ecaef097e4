//! Token Types
//!
//! Token endpoint response and the bearer token handed to the device API.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;

/// Token response from the authorization server.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// Access token. Optional here so a missing field maps to a token error
    /// instead of a JSON error.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token type (usually "bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expires in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Rotated refresh token, if any.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Additional fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Bearer access token.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
}

impl AccessToken {
    /// Wrap a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: SecretString::new(value.into()),
        }
    }

    /// Raw token value.
    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
