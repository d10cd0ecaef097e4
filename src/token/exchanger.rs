//! Token Exchanger
//!
//! RFC 6749 Section 6 - refresh token grant against the LWA token endpoint.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{create_token_error, ProtocolError, TokenError, UnitResetError};
use crate::types::{AccessToken, OAuthCredentials, TokenResponse};

/// Token exchanger interface.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange a refresh token for an access token.
    async fn exchange_token(
        &self,
        credentials: &OAuthCredentials,
    ) -> Result<AccessToken, UnitResetError>;
}

/// Refresh-token grant against the endpoint named in the credentials.
pub struct LwaTokenExchanger<T: HttpTransport> {
    transport: Arc<T>,
    timeout: Duration,
}

impl<T: HttpTransport> LwaTokenExchanger<T> {
    /// Create new exchanger.
    pub fn new(transport: Arc<T>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    fn build_request_body(credentials: &OAuthCredentials) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", credentials.refresh_token.expose_secret())
            .append_pair("client_id", &credentials.client_id)
            .append_pair("client_secret", credentials.client_secret.expose_secret())
            .append_pair("scope", &credentials.scope)
            .finish()
    }
}

#[async_trait]
impl<T: HttpTransport> TokenExchanger for LwaTokenExchanger<T> {
    async fn exchange_token(
        &self,
        credentials: &OAuthCredentials,
    ) -> Result<AccessToken, UnitResetError> {
        credentials.validate()?;

        let request = HttpRequest::new(HttpMethod::Post, credentials.token_endpoint_url.clone())
            .header("content-type", "application/x-www-form-urlencoded")
            .header("accept", "application/json")
            .body(Self::build_request_body(credentials))
            .timeout(self.timeout);

        debug!(endpoint = %credentials.token_endpoint_url, "Requesting access token");

        let response = self.transport.send(request).await.map_err(|e| {
            error!(error = %e, code = e.error_code(), "Token request failed");
            e
        })?;

        debug!(status = response.status, "Token endpoint responded");

        if response.status != 200 {
            let err = create_token_error(response.status, &response.body);
            error!(error = %err, "Token exchange rejected");
            return Err(err);
        }

        let token_response: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            UnitResetError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;

        match token_response.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => {
                error!("Token response has no access_token");
                Err(UnitResetError::Token(TokenError::MissingAccessToken))
            }
        }
    }
}
