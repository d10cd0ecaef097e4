//! Reset Settings
//!
//! Target values applied to an endpoint during a unit reset.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Maximum speaker volume accepted by the device API.
pub const MAX_VOLUME: u8 = 100;

/// Temperature unit setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fahrenheit => "FAHRENHEIT",
            Self::Celsius => "CELSIUS",
        }
    }
}

/// Distance units setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceUnits {
    Imperial,
    Metric,
}

impl DistanceUnits {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imperial => "IMPERIAL",
            Self::Metric => "METRIC",
        }
    }
}

/// Values a unit is reset to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetConfiguration {
    /// Locale tags, in priority order.
    pub locales: Vec<String>,
    /// Wake words, in priority order.
    pub wake_words: Vec<String>,
    /// IANA time zone.
    pub time_zone: String,
    /// Temperature unit.
    pub temperature_unit: TemperatureUnit,
    /// Distance units.
    pub distance_units: DistanceUnits,
    /// Speaker volume, 0-100.
    pub volume: u8,
}

impl Default for ResetConfiguration {
    fn default() -> Self {
        Self {
            locales: vec!["en-US".to_string(), "fr-FR".to_string()],
            wake_words: vec!["ALEXA".to_string()],
            time_zone: "America/Los_Angeles".to_string(),
            temperature_unit: TemperatureUnit::Fahrenheit,
            distance_units: DistanceUnits::Imperial,
            volume: 40,
        }
    }
}

impl ResetConfiguration {
    /// Validate the settings.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.volume > MAX_VOLUME {
            return Err(invalid("volume", format!("{} exceeds {}", self.volume, MAX_VOLUME)));
        }
        if self.locales.is_empty() || self.locales.iter().any(|l| l.trim().is_empty()) {
            return Err(invalid("locales", "must contain non-empty locale tags"));
        }
        if self.wake_words.is_empty() || self.wake_words.iter().any(|w| w.trim().is_empty()) {
            return Err(invalid("wakeWords", "must contain non-empty wake words"));
        }
        if self.time_zone.trim().is_empty() {
            return Err(invalid("timeZone", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidResetSetting {
        field: field.to_string(),
        message: message.into(),
    }
}
