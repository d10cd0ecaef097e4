//! Integration tests for the Secrets Manager credential provider

use super::*;
use secrecy::ExposeSecret;
use unit_reset::credentials::GET_SECRET_VALUE_TARGET;
use unit_reset::{
    AwsCredentials, CredentialError, CredentialProvider, SecretsManagerCredentialProvider,
    StaticAwsCredentialsProvider, UnitResetError,
};
use url::Url;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

fn provider(server: &MockServer) -> SecretsManagerCredentialProvider<ReqwestHttpTransport> {
    SecretsManagerCredentialProvider::new(
        transport(),
        Arc::new(StaticAwsCredentialsProvider::new(
            AwsCredentials::with_session_token("AKIDEXAMPLE", "secret-key", "session-token"),
        )),
        "us-east-1",
        Some(Url::parse(&server.uri()).unwrap()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_get_secret_value() {
    let mock_server = setup_mock_server().await;

    let secret = serde_json::json!({
        "lwa-refresh-token": "Atzr|refresh-token",
        "lwa-client-id": "amzn1.application-oa2-client.test",
        "lwa-client-secret": "client-secret",
        "lwa-auth-scope": "alexa::enterprise:management",
        "lwa-auth-url": "https://api.amazon.com/auth/o2/token"
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-amz-target", GET_SECRET_VALUE_TARGET))
        .and(header("content-type", "application/x-amz-json-1.1"))
        .and(header("x-amz-security-token", "session-token"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .and(body_json(serde_json::json!({
            "SecretId": "prod/lwa",
            "VersionStage": "AWSCURRENT"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ARN": "arn:aws:secretsmanager:us-east-1:123456789012:secret:prod/lwa",
            "Name": "prod/lwa",
            "SecretString": secret.to_string(),
            "VersionStages": ["AWSCURRENT"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let credentials = provider(&mock_server).fetch("prod/lwa").await.unwrap();

    assert_eq!(credentials.client_id, "amzn1.application-oa2-client.test");
    assert_eq!(credentials.client_secret.expose_secret(), "client-secret");
    assert_eq!(credentials.scope, "alexa::enterprise:management");
    assert_eq!(
        credentials.token_endpoint_url,
        "https://api.amazon.com/auth/o2/token"
    );
}

#[tokio::test]
async fn test_signature_uses_credential_scope() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "__type": "ResourceNotFoundException",
            "Message": "Secrets Manager can't find the specified secret."
        })))
        .mount(&mock_server)
        .await;

    let _ = provider(&mock_server).fetch("prod/lwa").await;

    let requests = mock_server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(authorization.contains("/us-east-1/secretsmanager/aws4_request"));
    assert!(authorization.contains(
        "SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target"
    ));
}

#[tokio::test]
async fn test_secret_not_found() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "__type": "ResourceNotFoundException",
            "Message": "Secrets Manager can't find the specified secret."
        })))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server).fetch("missing").await;

    match result {
        Err(UnitResetError::Credential(CredentialError::NotFound { secret_id })) => {
            assert_eq!(secret_id, "missing")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_secret_access_denied() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server).fetch("prod/lwa").await;

    assert!(matches!(
        result,
        Err(UnitResetError::Credential(CredentialError::AccessDenied { .. }))
    ));
}

#[tokio::test]
async fn test_secret_service_error_is_unavailable() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "__type": "InternalServiceError",
            "Message": "try again"
        })))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server).fetch("prod/lwa").await;

    assert!(matches!(
        result,
        Err(UnitResetError::Credential(CredentialError::Unavailable { .. }))
    ));
}
