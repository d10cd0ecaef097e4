//! Credential Types
//!
//! OAuth2 client credentials as stored in the secret store.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::TokenError;

/// OAuth2 client credentials for the LWA refresh-token grant.
///
/// Field names match the JSON document kept in the secret store.
#[derive(Clone, Deserialize)]
pub struct OAuthCredentials {
    /// Client identifier.
    #[serde(rename = "lwa-client-id")]
    pub client_id: String,
    /// Client secret.
    #[serde(rename = "lwa-client-secret")]
    pub client_secret: SecretString,
    /// Long-lived refresh token.
    #[serde(rename = "lwa-refresh-token")]
    pub refresh_token: SecretString,
    /// Requested scope.
    #[serde(rename = "lwa-auth-scope")]
    pub scope: String,
    /// Token endpoint URL.
    #[serde(rename = "lwa-auth-url")]
    pub token_endpoint_url: String,
}

impl OAuthCredentials {
    /// Create credentials from plain values.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        scope: impl Into<String>,
        token_endpoint_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            refresh_token: SecretString::new(refresh_token.into()),
            scope: scope.into(),
            token_endpoint_url: token_endpoint_url.into(),
        }
    }

    /// Check that every field is non-empty.
    pub fn validate(&self) -> Result<(), TokenError> {
        let fields = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
            ("refresh_token", self.refresh_token.expose_secret().as_str()),
            ("scope", self.scope.as_str()),
            ("token_endpoint_url", self.token_endpoint_url.as_str()),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(TokenError::InvalidCredentials {
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("token_endpoint_url", &self.token_endpoint_url)
            .finish()
    }
}
