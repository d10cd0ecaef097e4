//! AWS credentials used to sign secret store requests.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::fmt;

use crate::error::{CredentialError, UnitResetError};

/// Environment variable names for AWS credentials.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// AWS credentials.
#[derive(Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
}

impl AwsCredentials {
    /// Create new long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
            session_token: None,
        }
    }

    /// Create temporary credentials with a session token.
    pub fn with_session_token(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
            session_token: Some(SecretString::new(session_token.into())),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|s| s.expose_secret().as_str())
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Source of AWS credentials.
#[async_trait]
pub trait AwsCredentialsProvider: Send + Sync {
    async fn aws_credentials(&self) -> Result<AwsCredentials, UnitResetError>;
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
/// `AWS_SESSION_TOKEN`, as provided to Lambda functions.
#[derive(Debug, Clone, Default)]
pub struct EnvAwsCredentialsProvider;

impl EnvAwsCredentialsProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AwsCredentialsProvider for EnvAwsCredentialsProvider {
    async fn aws_credentials(&self) -> Result<AwsCredentials, UnitResetError> {
        let read = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        let access_key_id = read(AWS_ACCESS_KEY_ID)
            .ok_or(UnitResetError::Credential(CredentialError::AwsCredentialsNotFound))?;
        let secret_access_key = read(AWS_SECRET_ACCESS_KEY)
            .ok_or(UnitResetError::Credential(CredentialError::AwsCredentialsNotFound))?;

        Ok(match read(AWS_SESSION_TOKEN) {
            Some(token) => {
                AwsCredentials::with_session_token(access_key_id, secret_access_key, token)
            }
            None => AwsCredentials::new(access_key_id, secret_access_key),
        })
    }
}

/// Fixed AWS credentials.
#[derive(Debug, Clone)]
pub struct StaticAwsCredentialsProvider {
    credentials: AwsCredentials,
}

impl StaticAwsCredentialsProvider {
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl AwsCredentialsProvider for StaticAwsCredentialsProvider {
    async fn aws_credentials(&self) -> Result<AwsCredentials, UnitResetError> {
        Ok(self.credentials.clone())
    }
}
