//! AWS Secrets Manager credential provider.
//!
//! Calls `GetSecretValue` over the AWS JSON 1.1 protocol and parses the
//! secret string as [`OAuthCredentials`].

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::{AwsCredentialsProvider, CredentialProvider};
use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{ConfigurationError, CredentialError, UnitResetError};
use crate::signing::RequestSigner;
use crate::types::OAuthCredentials;

/// Signing name of the service.
pub const SECRETS_MANAGER_SERVICE: &str = "secretsmanager";
/// Target header value for `GetSecretValue`.
pub const GET_SECRET_VALUE_TARGET: &str = "secretsmanager.GetSecretValue";
/// Version stage always requested.
pub const VERSION_STAGE_CURRENT: &str = "AWSCURRENT";

const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

#[derive(Debug, Deserialize)]
struct GetSecretValueResponse {
    #[serde(rename = "SecretString", default)]
    secret_string: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AwsErrorResponse {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// Credential provider backed by AWS Secrets Manager.
pub struct SecretsManagerCredentialProvider<T: HttpTransport> {
    transport: Arc<T>,
    aws_credentials: Arc<dyn AwsCredentialsProvider>,
    signer: RequestSigner,
    endpoint: Url,
    timeout: Duration,
}

impl<T: HttpTransport> SecretsManagerCredentialProvider<T> {
    /// Create a provider for `region`, using the regional endpoint unless
    /// `endpoint` overrides it.
    pub fn new(
        transport: Arc<T>,
        aws_credentials: Arc<dyn AwsCredentialsProvider>,
        region: &str,
        endpoint: Option<Url>,
        timeout: Duration,
    ) -> Result<Self, UnitResetError> {
        let endpoint = match endpoint {
            Some(url) => url,
            None => {
                let url = format!("https://{}.{}.amazonaws.com/", SECRETS_MANAGER_SERVICE, region);
                Url::parse(&url).map_err(|_| {
                    UnitResetError::Configuration(ConfigurationError::InvalidEndpoint { url })
                })?
            }
        };

        Ok(Self {
            transport,
            aws_credentials,
            signer: RequestSigner::new(region, SECRETS_MANAGER_SERVICE),
            endpoint,
            timeout,
        })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_error(secret_id: &str, status: u16, body: &str) -> CredentialError {
        let parsed: Option<AwsErrorResponse> = serde_json::from_str(body).ok();
        let error_type = parsed
            .as_ref()
            .and_then(|e| e.error_type.as_deref())
            .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
            .unwrap_or_default();
        let message = parsed
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("HTTP {}", status));

        match error_type.as_str() {
            "ResourceNotFoundException" => CredentialError::NotFound {
                secret_id: secret_id.to_string(),
            },
            "AccessDeniedException" | "UnrecognizedClientException" => {
                CredentialError::AccessDenied {
                    secret_id: secret_id.to_string(),
                    message,
                }
            }
            _ if status == 403 => CredentialError::AccessDenied {
                secret_id: secret_id.to_string(),
                message,
            },
            _ => CredentialError::Unavailable {
                message: format!("{} ({})", message, status),
            },
        }
    }

    fn parse_secret(secret_id: &str, body: &str) -> Result<OAuthCredentials, CredentialError> {
        let malformed = |message: String| CredentialError::Malformed {
            secret_id: secret_id.to_string(),
            message,
        };

        let response: GetSecretValueResponse =
            serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
        let secret = response
            .secret_string
            .ok_or_else(|| malformed("secret has no SecretString".to_string()))?;

        serde_json::from_str(&secret).map_err(|e| malformed(e.to_string()))
    }
}

#[async_trait]
impl<T: HttpTransport> CredentialProvider for SecretsManagerCredentialProvider<T> {
    async fn fetch(&self, secret_id: &str) -> Result<OAuthCredentials, UnitResetError> {
        let aws_credentials = self.aws_credentials.aws_credentials().await?;

        let body = serde_json::json!({
            "SecretId": secret_id,
            "VersionStage": VERSION_STAGE_CURRENT,
        })
        .to_string();

        let mut request = HttpRequest::new(HttpMethod::Post, self.endpoint.as_str())
            .header("content-type", AMZ_JSON_CONTENT_TYPE)
            .header("x-amz-target", GET_SECRET_VALUE_TARGET)
            .timeout(self.timeout);

        request.headers = self.signer.sign(
            HttpMethod::Post.as_str(),
            &self.endpoint,
            &request.headers,
            body.as_bytes(),
            &aws_credentials,
            &Utc::now(),
        )?;
        request.body = Some(body);

        debug!(secret_id, "Fetching OAuth credentials from secret store");

        let response = self.transport.send(request).await.map_err(|e| {
            error!(secret_id, error = %e, "Secret store request failed");
            UnitResetError::Credential(CredentialError::Unavailable {
                message: e.to_string(),
            })
        })?;

        if response.status != 200 {
            let err = Self::map_error(secret_id, response.status, &response.body);
            error!(secret_id, status = response.status, error = %err, "GetSecretValue failed");
            return Err(err.into());
        }

        Self::parse_secret(secret_id, &response.body).map_err(|e| {
            error!(secret_id, error = %e, "Secret does not hold OAuth credentials");
            e.into()
        })
    }
}
