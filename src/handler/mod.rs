//! Entry Adapter
//!
//! Turns an invocation event into one credential fetch, one token exchange
//! and one pipeline run, and collapses the result into a response envelope.
//! Failure detail is logged, never returned to the caller.

use std::sync::Arc;
use tracing::{error, info};

use crate::api::AlexaDeviceApi;
use crate::config::UnitResetConfig;
use crate::core::{HttpTransport, ReqwestHttpTransport, DEFAULT_MAX_RESPONSE_SIZE};
use crate::credentials::{
    CredentialProvider, EnvAwsCredentialsProvider, SecretsManagerCredentialProvider,
};
use crate::error::UnitResetError;
use crate::reset::ResetPipeline;
use crate::token::{LwaTokenExchanger, TokenExchanger};
use crate::types::{AccessToken, InvocationEvent, InvocationResponse, ResetConfiguration};

/// Unit reset entry point.
pub struct UnitResetHandler<T: HttpTransport> {
    credentials: Arc<dyn CredentialProvider>,
    exchanger: Arc<dyn TokenExchanger>,
    pipeline: ResetPipeline<T>,
    secret_id: String,
    reset: Arc<ResetConfiguration>,
}

impl UnitResetHandler<ReqwestHttpTransport> {
    /// Wire the production collaborators: Secrets Manager credentials signed
    /// with AWS credentials from the environment, the LWA token endpoint and
    /// the device-management API, all sharing one HTTP client.
    pub fn from_config(config: &UnitResetConfig) -> Result<Self, UnitResetError> {
        let transport = Arc::new(ReqwestHttpTransport::with_options(
            config.timeout,
            DEFAULT_MAX_RESPONSE_SIZE,
        )?);

        let credentials = SecretsManagerCredentialProvider::new(
            transport.clone(),
            Arc::new(EnvAwsCredentialsProvider::new()),
            &config.region,
            config.secrets_manager_endpoint.clone(),
            config.timeout,
        )?;
        let exchanger = LwaTokenExchanger::new(transport.clone(), config.timeout);
        let api = AlexaDeviceApi::new(transport, config.api_endpoint.clone(), config.timeout);

        Ok(Self::new(
            Arc::new(credentials),
            Arc::new(exchanger),
            ResetPipeline::new(api),
            config.secret_id.clone(),
            Arc::new(config.reset.clone()),
        ))
    }
}

impl<T: HttpTransport> UnitResetHandler<T> {
    /// Create handler from its collaborators.
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        exchanger: Arc<dyn TokenExchanger>,
        pipeline: ResetPipeline<T>,
        secret_id: impl Into<String>,
        reset: Arc<ResetConfiguration>,
    ) -> Self {
        Self {
            credentials,
            exchanger,
            pipeline,
            secret_id: secret_id.into(),
            reset,
        }
    }

    /// Handle one invocation.
    pub async fn handle(&self, event: InvocationEvent) -> InvocationResponse {
        info!(unit_id = %event.unit_id, "Received unit reset request");

        let token = match self.acquire_token().await {
            Ok(token) => token,
            Err(e) => {
                log_failure(&event, "token", &e);
                return InvocationResponse::token_error();
            }
        };

        let outcome = self
            .pipeline
            .reset_unit(&event.unit_id, &token, &self.reset)
            .await;

        match &outcome.cause {
            None => {
                info!(unit_id = %event.unit_id, "Unit reset succeeded");
                InvocationResponse::success()
            }
            Some(cause) => {
                info!(
                    unit_id = %event.unit_id,
                    failed_step = outcome.failed_step_id().unwrap_or_default(),
                    completed = outcome.completed_steps.len(),
                    "Unit reset stopped"
                );
                log_failure(&event, "reset", cause);
                InvocationResponse::reset_error()
            }
        }
    }

    async fn acquire_token(&self) -> Result<AccessToken, UnitResetError> {
        let credentials = self.credentials.fetch(&self.secret_id).await?;
        self.exchanger.exchange_token(&credentials).await
    }
}

/// The envelope is chosen by stage; the cause only reaches the log.
fn log_failure(event: &InvocationEvent, stage: &'static str, cause: &UnitResetError) {
    error!(
        unit_id = %event.unit_id,
        stage,
        code = cause.error_code(),
        remote_status = cause.remote_status(),
        error = %cause,
        "Unit reset request failed"
    );
}
