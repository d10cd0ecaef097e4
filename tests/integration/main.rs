//! Integration tests using WireMock
//!
//! These tests run the token exchange, the Secrets Manager provider and the
//! full reset flow against a mock HTTP server over real HTTP.

mod end_to_end;
mod secrets_manager;
mod token_exchange;

use std::sync::Arc;
use std::time::Duration;
use unit_reset::{OAuthCredentials, ReqwestHttpTransport};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/auth/o2/token";
pub const ACCESS_TOKEN: &str = "Atza|integration-token";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Real transport with a short timeout
pub fn transport() -> Arc<ReqwestHttpTransport> {
    Arc::new(ReqwestHttpTransport::with_options(Duration::from_secs(5), 1_048_576).unwrap())
}

/// Credentials pointing at the mock token endpoint
pub fn credentials_for(server: &MockServer) -> OAuthCredentials {
    OAuthCredentials::new(
        "amzn1.application-oa2-client.test",
        "client-secret",
        "Atzr|refresh-token",
        "alexa::enterprise:management",
        format!("{}{}", server.uri(), TOKEN_PATH),
    )
}

/// Token endpoint returning a valid access token
pub fn token_success() -> Mock {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": ACCESS_TOKEN,
            "refresh_token": "Atzr|refresh-token",
            "token_type": "bearer",
            "expires_in": 3600
        })))
}

/// Device API mock requiring the bearer token
pub fn device_call(method_matcher: &str, path_matcher: &str) -> wiremock::MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher.to_string()))
        .and(header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
        .and(header("content-type", "application/json"))
}
