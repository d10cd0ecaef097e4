//! Device-management API client.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{create_remote_error, DeviceApiError, ProtocolError, UnitResetError};
use crate::types::{AccessToken, DistanceUnits, TemperatureUnit};

/// Default device-management API base URL.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.amazonalexa.com";

/// Notification recipient type used for unit-wide deletion.
const RECIPIENT_TYPE_UNIT: &str = "Unit";
/// Notification variant removed during a reset.
const DEVICE_NOTIFICATION_VARIANT: &str = "DeviceNotification";

#[derive(Debug, Deserialize)]
struct EndpointList {
    #[serde(default)]
    results: Vec<EndpointSummary>,
}

#[derive(Debug, Deserialize)]
struct EndpointSummary {
    id: String,
}

#[derive(Debug, Serialize)]
struct SetVolumeRequest {
    payload: VolumePayload,
}

#[derive(Debug, Serialize)]
struct VolumePayload {
    volume: u8,
}

/// Client for the unit and endpoint operations used by a reset.
///
/// Every call is authorized with the bearer token passed in and succeeds on
/// any 2xx status. Failures are logged here and returned unchanged.
pub struct AlexaDeviceApi<T: HttpTransport> {
    transport: Arc<T>,
    base_url: Url,
    timeout: Duration,
}

impl<T: HttpTransport> AlexaDeviceApi<T> {
    /// Create new client.
    pub fn new(transport: Arc<T>, base_url: Url, timeout: Duration) -> Self {
        Self {
            transport,
            base_url,
            timeout,
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `DELETE /v1/alerts/alarms?unitId={unit_id}`
    pub async fn delete_alarms(
        &self,
        unit_id: &str,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let url = self.url(&["v1", "alerts", "alarms"], &[("unitId", unit_id)]);
        self.call("deleteAlarms", HttpMethod::Delete, url, None, token)
            .await?;
        Ok(())
    }

    /// `DELETE /v1/alerts/reminders?unitId={unit_id}`
    pub async fn delete_reminders(
        &self,
        unit_id: &str,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let url = self.url(&["v1", "alerts", "reminders"], &[("unitId", unit_id)]);
        self.call("deleteReminders", HttpMethod::Delete, url, None, token)
            .await?;
        Ok(())
    }

    /// `DELETE /v1/alerts/timers?unitId={unit_id}`
    pub async fn delete_timers(
        &self,
        unit_id: &str,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let url = self.url(&["v1", "alerts", "timers"], &[("unitId", unit_id)]);
        self.call("deleteTimers", HttpMethod::Delete, url, None, token)
            .await?;
        Ok(())
    }

    /// Look up the first endpoint associated with the unit.
    pub async fn resolve_endpoint(
        &self,
        unit_id: &str,
        token: &AccessToken,
    ) -> Result<String, UnitResetError> {
        let url = self.url(&["v2", "endpoints"], &[("associatedUnits.id", unit_id)]);
        let response = self
            .call("resolveEndpoint", HttpMethod::Get, url, None, token)
            .await?;

        let list: EndpointList = serde_json::from_str(&response.body).map_err(|e| {
            error!(operation = "resolveEndpoint", error = %e, "Endpoint list is not valid JSON");
            UnitResetError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;

        match list.results.into_iter().next() {
            Some(endpoint) => {
                debug!(unit_id, endpoint_id = %endpoint.id, "Resolved endpoint");
                Ok(endpoint.id)
            }
            None => {
                error!(unit_id, "No endpoint associated with unit");
                Err(UnitResetError::DeviceApi(DeviceApiError::EndpointNotFound {
                    unit_id: unit_id.to_string(),
                }))
            }
        }
    }

    /// Set speaker volume.
    pub async fn set_volume(
        &self,
        endpoint_id: &str,
        volume: u8,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let url = self.url(
            &["v2", "endpoints", endpoint_id, "features", "speaker", "setVolume"],
            &[],
        );
        let body = SetVolumeRequest {
            payload: VolumePayload { volume },
        };
        self.call("setVolume", HttpMethod::Post, url, Some(to_json(&body)?), token)
            .await?;
        Ok(())
    }

    /// Enable Do-Not-Disturb.
    pub async fn set_do_not_disturb(
        &self,
        endpoint_id: &str,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let setting = "Alexa.DoNotDisturb.doNotDisturb";
        self.put_setting("setDoNotDisturb", endpoint_id, setting, &true, token)
            .await
    }

    /// Replace the endpoint locales.
    pub async fn set_locales(
        &self,
        endpoint_id: &str,
        locales: &[String],
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        self.put_setting("setLocales", endpoint_id, "System.locales", &locales, token)
            .await
    }

    /// Replace the endpoint wake words.
    pub async fn set_wake_words(
        &self,
        endpoint_id: &str,
        wake_words: &[String],
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let setting = "SpeechRecognizer.wakeWords";
        self.put_setting("setWakeWords", endpoint_id, setting, &wake_words, token)
            .await
    }

    /// Set the endpoint time zone.
    pub async fn set_time_zone(
        &self,
        endpoint_id: &str,
        time_zone: &str,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        self.put_setting("setTimeZone", endpoint_id, "System.timeZone", &time_zone, token)
            .await
    }

    /// Set the temperature unit.
    pub async fn set_temperature_unit(
        &self,
        endpoint_id: &str,
        unit: TemperatureUnit,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let setting = "System.temperatureUnit";
        self.put_setting("setTemperatureUnit", endpoint_id, setting, &unit, token)
            .await
    }

    /// Set the distance units.
    pub async fn set_distance_units(
        &self,
        endpoint_id: &str,
        units: DistanceUnits,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let setting = "System.distanceUnits";
        self.put_setting("setDistanceUnits", endpoint_id, setting, &units, token)
            .await
    }

    /// Delete every device notification addressed to the unit.
    pub async fn delete_notifications(
        &self,
        unit_id: &str,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let url = self.url(
            &["v3", "notifications"],
            &[
                ("recipients.id", unit_id),
                ("recipients.type", RECIPIENT_TYPE_UNIT),
                ("notification.variants.type", DEVICE_NOTIFICATION_VARIANT),
            ],
        );
        self.call("deleteNotifications", HttpMethod::Delete, url, None, token)
            .await?;
        Ok(())
    }

    /// Unpair every Bluetooth device from the endpoint.
    pub async fn unpair_bluetooth(
        &self,
        endpoint_id: &str,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let url = self.url(
            &["v2", "endpoints", endpoint_id, "features", "bluetooth", "unpair"],
            &[],
        );
        self.call("unpairBluetooth", HttpMethod::Post, url, Some("{}".to_string()), token)
            .await?;
        Ok(())
    }

    async fn put_setting<V: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        endpoint_id: &str,
        setting: &str,
        value: &V,
        token: &AccessToken,
    ) -> Result<(), UnitResetError> {
        let url = self.url(&["v2", "endpoints", endpoint_id, "settings", setting], &[]);
        self.call(operation, HttpMethod::Put, url, Some(to_json(value)?), token)
            .await?;
        Ok(())
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    async fn call(
        &self,
        operation: &'static str,
        method: HttpMethod,
        url: Url,
        body: Option<String>,
        token: &AccessToken,
    ) -> Result<HttpResponse, UnitResetError> {
        let mut request = HttpRequest::new(method, url.as_str())
            .header("authorization", token.authorization_header())
            .header("content-type", "application/json")
            .timeout(self.timeout);
        request.body = body;

        debug!(operation, method = method.as_str(), url = %url, "Calling device API");

        let response = self.transport.send(request).await.map_err(|e| {
            error!(operation, error = %e, code = e.error_code(), "Device API request failed");
            e
        })?;

        if !response.is_success() {
            let err = create_remote_error(response.status, &response.body);
            error!(
                operation,
                status = response.status,
                payload = %response.body,
                "Device API returned an error"
            );
            return Err(err);
        }

        debug!(operation, status = response.status, "Device API call succeeded");
        Ok(response)
    }
}

fn to_json<V: Serialize + ?Sized>(value: &V) -> Result<String, UnitResetError> {
    serde_json::to_string(value).map_err(|e| {
        UnitResetError::Protocol(ProtocolError::InvalidJson {
            message: e.to_string(),
        })
    })
}
