//! Configuration
//!
//! Process-level settings: where the OAuth credentials live, which endpoints
//! to call, the per-request timeout and the values a unit is reset to.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use url::Url;

use crate::api::DEFAULT_API_ENDPOINT;
use crate::error::ConfigurationError;
use crate::types::ResetConfiguration;

/// Secret id holding the OAuth credentials.
pub const SECRET_ID_ENV: &str = "UNIT_RESET_SECRET_ID";
/// Secrets Manager endpoint override.
pub const SECRETS_ENDPOINT_ENV: &str = "UNIT_RESET_SECRETS_ENDPOINT";
/// Device-management API base URL.
pub const API_ENDPOINT_ENV: &str = "UNIT_RESET_API_ENDPOINT";
/// Per-request timeout in milliseconds.
pub const TIMEOUT_MS_ENV: &str = "UNIT_RESET_TIMEOUT_MS";
/// JSON file with reset settings.
pub const SETTINGS_FILE_ENV: &str = "UNIT_RESET_SETTINGS_FILE";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Unit reset configuration.
#[derive(Debug, Clone)]
pub struct UnitResetConfig {
    /// Secret id holding the OAuth credentials.
    pub secret_id: String,
    /// AWS region of the secret store.
    pub region: String,
    /// Secret store endpoint override.
    pub secrets_manager_endpoint: Option<Url>,
    /// Device-management API base URL.
    pub api_endpoint: Url,
    /// Timeout applied to each HTTP request.
    pub timeout: Duration,
    /// Values a unit is reset to.
    pub reset: ResetConfiguration,
}

impl UnitResetConfig {
    /// Create a new builder.
    pub fn builder() -> UnitResetConfigBuilder {
        UnitResetConfigBuilder::new()
    }

    /// Build a configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        UnitResetConfigBuilder::new().from_env().build()
    }
}

/// Builder for [`UnitResetConfig`].
#[derive(Debug, Default)]
pub struct UnitResetConfigBuilder {
    secret_id: Option<String>,
    region: Option<String>,
    secrets_manager_endpoint: Option<String>,
    api_endpoint: Option<String>,
    timeout: Option<Duration>,
    reset: Option<ResetConfiguration>,
    settings_file: Option<PathBuf>,
}

impl UnitResetConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the secret id.
    pub fn secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.secret_id = Some(secret_id.into());
        self
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the Secrets Manager endpoint.
    pub fn secrets_manager_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.secrets_manager_endpoint = Some(endpoint.into());
        self
    }

    /// Set the device-management API base URL.
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the reset values directly.
    pub fn reset_configuration(mut self, reset: ResetConfiguration) -> Self {
        self.reset = Some(reset);
        self
    }

    /// Load the reset values from a JSON file at build time.
    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Apply settings from environment variables.
    pub fn from_env(self) -> Self {
        self.from_lookup(|name| env::var(name).ok())
    }

    /// Apply settings from a custom variable source.
    pub fn from_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(secret_id) = get(SECRET_ID_ENV) {
            self.secret_id = Some(secret_id);
        }
        if let Some(region) = get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
            self.region = Some(region);
        }
        if let Some(endpoint) = get(SECRETS_ENDPOINT_ENV) {
            self.secrets_manager_endpoint = Some(endpoint);
        }
        if let Some(endpoint) = get(API_ENDPOINT_ENV) {
            self.api_endpoint = Some(endpoint);
        }
        if let Some(val) = get(TIMEOUT_MS_ENV) {
            match val.trim().parse::<u64>() {
                Ok(ms) => self.timeout = Some(Duration::from_millis(ms)),
                Err(_) => warn!(value = %val, "Ignoring invalid {}", TIMEOUT_MS_ENV),
            }
        }
        if let Some(path) = get(SETTINGS_FILE_ENV) {
            self.settings_file = Some(PathBuf::from(path));
        }

        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<UnitResetConfig, ConfigurationError> {
        let secret_id = self
            .secret_id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigurationError::MissingRequired {
                field: "secret_id".to_string(),
            })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        let api_endpoint = parse_endpoint(
            self.api_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_API_ENDPOINT),
        )?;
        let secrets_manager_endpoint = self
            .secrets_manager_endpoint
            .as_deref()
            .map(parse_endpoint)
            .transpose()?;

        let reset = match (self.reset, self.settings_file) {
            (Some(reset), _) => reset,
            (None, Some(path)) => load_settings_file(&path)?,
            (None, None) => ResetConfiguration::default(),
        };
        reset.validate()?;

        Ok(UnitResetConfig {
            secret_id,
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            secrets_manager_endpoint,
            api_endpoint,
            timeout,
            reset,
        })
    }
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidEndpoint {
        url: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

fn load_settings_file(path: &Path) -> Result<ResetConfiguration, ConfigurationError> {
    let file_error = |message: String| ConfigurationError::SettingsFile {
        path: path.display().to_string(),
        message,
    };
    let contents = fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| file_error(e.to_string()))
}
