//! Unit reset pipeline.

use std::time::Instant;
use tracing::{error, info};

use crate::api::AlexaDeviceApi;
use crate::core::HttpTransport;
use crate::error::{DeviceApiError, UnitResetError};
use crate::types::{AccessToken, ResetConfiguration, ResetOutcome, ResetStep};

/// Runs the fixed reset sequence against one unit.
///
/// Steps run in [`ResetStep::ALL`] order, one request at a time. The first
/// failure stops the run; effects of earlier steps are kept.
pub struct ResetPipeline<T: HttpTransport> {
    api: AlexaDeviceApi<T>,
}

impl<T: HttpTransport> ResetPipeline<T> {
    /// Create new pipeline.
    pub fn new(api: AlexaDeviceApi<T>) -> Self {
        Self { api }
    }

    /// Reset `unit_id` to `config`.
    pub async fn reset_unit(
        &self,
        unit_id: &str,
        token: &AccessToken,
        config: &ResetConfiguration,
    ) -> ResetOutcome {
        let started = Instant::now();
        let mut completed = Vec::with_capacity(ResetStep::ALL.len());
        let mut endpoint_id: Option<String> = None;

        for step in ResetStep::ALL {
            if let Err(cause) = self
                .run_step(step, unit_id, token, config, &mut endpoint_id)
                .await
            {
                error!(
                    unit_id,
                    step = step.id(),
                    code = cause.error_code(),
                    error = %cause,
                    "Reset step failed"
                );
                return ResetOutcome::failed(step, cause, completed, endpoint_id);
            }

            info!(unit_id, step = step.id(), "Reset step completed");
            completed.push(step);
        }

        info!(
            unit_id,
            endpoint_id = endpoint_id.as_deref().unwrap_or_default(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Unit reset completed"
        );
        ResetOutcome::succeeded(completed, endpoint_id)
    }

    async fn run_step(
        &self,
        step: ResetStep,
        unit_id: &str,
        token: &AccessToken,
        config: &ResetConfiguration,
        endpoint_id: &mut Option<String>,
    ) -> Result<(), UnitResetError> {
        let api = &self.api;

        let endpoint = match endpoint_id.as_deref() {
            Some(id) => id.to_string(),
            None if step.requires_endpoint() => {
                return Err(UnitResetError::DeviceApi(DeviceApiError::EndpointNotFound {
                    unit_id: unit_id.to_string(),
                }))
            }
            None => String::new(),
        };
        let endpoint = endpoint.as_str();

        match step {
            ResetStep::DeleteAlarms => api.delete_alarms(unit_id, token).await,
            ResetStep::DeleteReminders => api.delete_reminders(unit_id, token).await,
            ResetStep::DeleteTimers => api.delete_timers(unit_id, token).await,
            ResetStep::ResolveEndpoint => {
                *endpoint_id = Some(api.resolve_endpoint(unit_id, token).await?);
                Ok(())
            }
            ResetStep::SetVolume => api.set_volume(endpoint, config.volume, token).await,
            ResetStep::SetDoNotDisturb => api.set_do_not_disturb(endpoint, token).await,
            ResetStep::SetLocales => api.set_locales(endpoint, &config.locales, token).await,
            ResetStep::SetWakeWords => {
                api.set_wake_words(endpoint, &config.wake_words, token).await
            }
            ResetStep::SetTimeZone => api.set_time_zone(endpoint, &config.time_zone, token).await,
            ResetStep::SetTemperatureUnit => {
                api.set_temperature_unit(endpoint, config.temperature_unit, token)
                    .await
            }
            ResetStep::SetDistanceUnits => {
                api.set_distance_units(endpoint, config.distance_units, token)
                    .await
            }
            ResetStep::DeleteNotifications => api.delete_notifications(unit_id, token).await,
            ResetStep::UnpairBluetooth => api.unpair_bluetooth(endpoint, token).await,
        }
    }
}
