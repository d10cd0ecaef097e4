//! Credential Providers
//!
//! Supply the OAuth2 client credentials used for the token exchange. The
//! production provider reads them from AWS Secrets Manager; the static
//! provider serves fixed values.

mod aws;
mod secrets_manager;

pub use aws::{
    AwsCredentials, AwsCredentialsProvider, EnvAwsCredentialsProvider,
    StaticAwsCredentialsProvider, AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN,
};
pub use secrets_manager::{
    SecretsManagerCredentialProvider, GET_SECRET_VALUE_TARGET, SECRETS_MANAGER_SERVICE,
    VERSION_STAGE_CURRENT,
};

use async_trait::async_trait;

use crate::error::UnitResetError;
use crate::types::OAuthCredentials;

/// Credential provider interface.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch OAuth credentials stored under `secret_id`.
    async fn fetch(&self, secret_id: &str) -> Result<OAuthCredentials, UnitResetError>;
}

/// Credential provider returning fixed credentials for any secret id.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: OAuthCredentials,
}

impl StaticCredentialProvider {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn fetch(&self, _secret_id: &str) -> Result<OAuthCredentials, UnitResetError> {
        Ok(self.credentials.clone())
    }
}
