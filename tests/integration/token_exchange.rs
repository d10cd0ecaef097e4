//! Integration tests for the refresh-token exchange

use super::*;
use unit_reset::{LwaTokenExchanger, TokenError, TokenExchanger, UnitResetError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn exchanger() -> LwaTokenExchanger<ReqwestHttpTransport> {
    LwaTokenExchanger::new(transport(), Duration::from_secs(5))
}

#[tokio::test]
async fn test_token_exchange_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("client_id=amzn1.application-oa2-client.test"))
        .and(body_string_contains("client_secret=client-secret"))
        .and(body_string_contains("scope=alexa%3A%3Aenterprise%3Amanagement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = exchanger()
        .exchange_token(&credentials_for(&mock_server))
        .await
        .unwrap();

    assert_eq!(token.secret(), ACCESS_TOKEN);
}

#[tokio::test]
async fn test_token_exchange_unauthorized() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed"
        })))
        .mount(&mock_server)
        .await;

    let result = exchanger()
        .exchange_token(&credentials_for(&mock_server))
        .await;

    match result {
        Err(UnitResetError::Token(TokenError::ExchangeFailed { status, message })) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid_client: Client authentication failed");
        }
        other => panic!("unexpected result: {:?}", other.map(|t| t.secret().to_string())),
    }
}

#[tokio::test]
async fn test_token_exchange_missing_access_token() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"token_type": "bearer"})),
        )
        .mount(&mock_server)
        .await;

    let result = exchanger()
        .exchange_token(&credentials_for(&mock_server))
        .await;

    assert!(matches!(
        result,
        Err(UnitResetError::Token(TokenError::MissingAccessToken))
    ));
}

#[tokio::test]
async fn test_token_exchange_connection_refused() {
    let mock_server = setup_mock_server().await;
    let credentials = credentials_for(&mock_server);
    drop(mock_server);

    let result = exchanger().exchange_token(&credentials).await;

    assert!(matches!(result, Err(UnitResetError::Network(_))));
}
