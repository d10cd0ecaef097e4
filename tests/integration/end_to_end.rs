//! End-to-end reset scenarios
//!
//! Token endpoint, secret store and device API are all served by one mock
//! server; the handler talks to it over real HTTP.

use super::*;
use unit_reset::credentials::GET_SECRET_VALUE_TARGET;
use unit_reset::{
    AlexaDeviceApi, AwsCredentials, CredentialProvider, InvocationEvent, InvocationResponse,
    LwaTokenExchanger, ResetConfiguration, ResetPipeline, SecretsManagerCredentialProvider,
    StaticAwsCredentialsProvider, StaticCredentialProvider, UnitResetHandler,
};
use url::Url;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const UNIT_ID: &str = "amzn1.alexa.unit.did.TEST";
const ENDPOINT_ID: &str = "amzn1.alexa.endpoint.TEST";

fn handler_with(
    server: &MockServer,
    credentials: Arc<dyn CredentialProvider>,
) -> UnitResetHandler<ReqwestHttpTransport> {
    let api = AlexaDeviceApi::new(
        transport(),
        Url::parse(&server.uri()).unwrap(),
        Duration::from_secs(5),
    );
    UnitResetHandler::new(
        credentials,
        Arc::new(LwaTokenExchanger::new(transport(), Duration::from_secs(5))),
        ResetPipeline::new(api),
        "prod/lwa",
        Arc::new(ResetConfiguration::default()),
    )
}

fn handler(server: &MockServer) -> UnitResetHandler<ReqwestHttpTransport> {
    handler_with(
        server,
        Arc::new(StaticCredentialProvider::new(credentials_for(server))),
    )
}

fn endpoint_path(suffix: &str) -> String {
    format!("/v2/endpoints/{}/{}", ENDPOINT_ID, suffix)
}

async fn mount_unit_deletes(server: &MockServer) {
    for alert in ["alarms", "reminders", "timers"] {
        device_call("DELETE", &format!("/v1/alerts/{}", alert))
            .and(query_param("unitId", UNIT_ID))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn mount_endpoint_lookup(server: &MockServer, results: serde_json::Value) {
    device_call("GET", "/v2/endpoints")
        .and(query_param("associatedUnits.id", UNIT_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": results,
            "paginationContext": {}
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_endpoint_steps(server: &MockServer, temperature_status: u16) {
    let after_temperature: u64 = if (200..300).contains(&temperature_status) { 1 } else { 0 };

    device_call("POST", &endpoint_path("features/speaker/setVolume"))
        .and(body_json(serde_json::json!({"payload": {"volume": 40}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;

    let settings = [
        ("Alexa.DoNotDisturb.doNotDisturb", "true"),
        ("System.locales", r#"["en-US","fr-FR"]"#),
        ("SpeechRecognizer.wakeWords", r#"["ALEXA"]"#),
        ("System.timeZone", r#""America/Los_Angeles""#),
    ];
    for (setting, body) in settings {
        device_call("PUT", &endpoint_path(&format!("settings/{}", setting)))
            .and(body_string(body))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(server)
            .await;
    }

    device_call("PUT", &endpoint_path("settings/System.temperatureUnit"))
        .and(body_string(r#""FAHRENHEIT""#))
        .respond_with(ResponseTemplate::new(temperature_status).set_body_json(
            serde_json::json!({"code": "INVALID_REQUEST", "message": "unsupported"}),
        ))
        .expect(1)
        .mount(server)
        .await;

    device_call("PUT", &endpoint_path("settings/System.distanceUnits"))
        .and(body_string(r#""IMPERIAL""#))
        .respond_with(ResponseTemplate::new(204))
        .expect(after_temperature)
        .mount(server)
        .await;

    device_call("POST", &endpoint_path("features/bluetooth/unpair"))
        .respond_with(ResponseTemplate::new(200))
        .expect(after_temperature)
        .mount(server)
        .await;
}

async fn mount_delete_notifications(server: &MockServer, times: u64) {
    device_call("DELETE", "/v3/notifications")
        .and(query_param("recipients.id", UNIT_ID))
        .and(query_param("recipients.type", "Unit"))
        .and(query_param("notification.variants.type", "DeviceNotification"))
        .respond_with(ResponseTemplate::new(200))
        .expect(times)
        .mount(server)
        .await;
}

/// Device API paths received by the server, in order.
async fn device_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .filter(|p| p != TOKEN_PATH && p != "/")
        .collect()
}

#[tokio::test]
async fn test_full_reset_succeeds() {
    let mock_server = setup_mock_server().await;
    token_success().expect(1).mount(&mock_server).await;
    mount_unit_deletes(&mock_server).await;
    mount_endpoint_lookup(&mock_server, serde_json::json!([{"id": ENDPOINT_ID}])).await;
    mount_endpoint_steps(&mock_server, 200).await;
    mount_delete_notifications(&mock_server, 1).await;

    let response = handler(&mock_server)
        .handle(InvocationEvent::new(UNIT_ID))
        .await;

    assert_eq!(response, InvocationResponse::success());
    assert_eq!(response.body, "\"Reset was successful\"");

    let expected = vec![
        "/v1/alerts/alarms".to_string(),
        "/v1/alerts/reminders".to_string(),
        "/v1/alerts/timers".to_string(),
        "/v2/endpoints".to_string(),
        endpoint_path("features/speaker/setVolume"),
        endpoint_path("settings/Alexa.DoNotDisturb.doNotDisturb"),
        endpoint_path("settings/System.locales"),
        endpoint_path("settings/SpeechRecognizer.wakeWords"),
        endpoint_path("settings/System.timeZone"),
        endpoint_path("settings/System.temperatureUnit"),
        endpoint_path("settings/System.distanceUnits"),
        "/v3/notifications".to_string(),
        endpoint_path("features/bluetooth/unpair"),
    ];
    assert_eq!(device_paths(&mock_server).await, expected);
}

#[tokio::test]
async fn test_token_rejected_makes_no_device_calls() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = handler(&mock_server)
        .handle(InvocationEvent::new(UNIT_ID))
        .await;

    assert_eq!(
        response,
        InvocationResponse {
            status_code: 500,
            body: "\"Access token error\"".to_string(),
        }
    );
    assert!(device_paths(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_unit_without_endpoint_fails_at_lookup() {
    let mock_server = setup_mock_server().await;
    token_success().mount(&mock_server).await;
    mount_unit_deletes(&mock_server).await;
    mount_endpoint_lookup(&mock_server, serde_json::json!([])).await;
    mount_delete_notifications(&mock_server, 0).await;

    let response = handler(&mock_server)
        .handle(InvocationEvent::new(UNIT_ID))
        .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, "\"Reset went wrong. Some internal issue\"");
    assert_eq!(
        device_paths(&mock_server).await,
        vec![
            "/v1/alerts/alarms",
            "/v1/alerts/reminders",
            "/v1/alerts/timers",
            "/v2/endpoints",
        ]
    );
}

#[tokio::test]
async fn test_rejected_setting_stops_remaining_steps() {
    let mock_server = setup_mock_server().await;
    token_success().mount(&mock_server).await;
    mount_unit_deletes(&mock_server).await;
    mount_endpoint_lookup(&mock_server, serde_json::json!([{"id": ENDPOINT_ID}])).await;
    mount_endpoint_steps(&mock_server, 400).await;
    mount_delete_notifications(&mock_server, 0).await;

    let response = handler(&mock_server)
        .handle(InvocationEvent::new(UNIT_ID))
        .await;

    assert_eq!(response, InvocationResponse::reset_error());

    let paths = device_paths(&mock_server).await;
    assert_eq!(paths.len(), 10);
    assert_eq!(
        paths.last().map(String::as_str),
        Some(endpoint_path("settings/System.temperatureUnit").as_str())
    );
}

#[tokio::test]
async fn test_full_stack_with_secret_store() {
    let mock_server = setup_mock_server().await;

    let secret = serde_json::json!({
        "lwa-refresh-token": "Atzr|refresh-token",
        "lwa-client-id": "amzn1.application-oa2-client.test",
        "lwa-client-secret": "client-secret",
        "lwa-auth-scope": "alexa::enterprise:management",
        "lwa-auth-url": format!("{}{}", mock_server.uri(), TOKEN_PATH)
    });
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-amz-target", GET_SECRET_VALUE_TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Name": "prod/lwa",
            "SecretString": secret.to_string()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    token_success().expect(1).mount(&mock_server).await;
    mount_unit_deletes(&mock_server).await;
    mount_endpoint_lookup(&mock_server, serde_json::json!([{"id": ENDPOINT_ID}])).await;
    mount_endpoint_steps(&mock_server, 200).await;
    mount_delete_notifications(&mock_server, 1).await;

    let credentials = SecretsManagerCredentialProvider::new(
        transport(),
        Arc::new(StaticAwsCredentialsProvider::new(AwsCredentials::new(
            "AKIDEXAMPLE",
            "secret-key",
        ))),
        "us-east-1",
        Some(Url::parse(&mock_server.uri()).unwrap()),
        Duration::from_secs(5),
    )
    .unwrap();

    let response = handler_with(&mock_server, Arc::new(credentials))
        .handle(InvocationEvent::new(UNIT_ID))
        .await;

    assert_eq!(response, InvocationResponse::success());
    assert_eq!(device_paths(&mock_server).await.len(), 13);
}

#[tokio::test]
async fn test_missing_secret_is_access_token_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "__type": "ResourceNotFoundException",
            "Message": "Secrets Manager can't find the specified secret."
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let credentials = SecretsManagerCredentialProvider::new(
        transport(),
        Arc::new(StaticAwsCredentialsProvider::new(AwsCredentials::new(
            "AKIDEXAMPLE",
            "secret-key",
        ))),
        "us-east-1",
        Some(Url::parse(&mock_server.uri()).unwrap()),
        Duration::from_secs(5),
    )
    .unwrap();

    let response = handler_with(&mock_server, Arc::new(credentials))
        .handle(InvocationEvent::new(UNIT_ID))
        .await;

    assert_eq!(response, InvocationResponse::token_error());
    assert!(device_paths(&mock_server).await.is_empty());
}
