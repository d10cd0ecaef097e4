//! Reset Steps and Outcome

use crate::error::UnitResetError;

/// One step of the unit reset sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetStep {
    DeleteAlarms,
    DeleteReminders,
    DeleteTimers,
    ResolveEndpoint,
    SetVolume,
    SetDoNotDisturb,
    SetLocales,
    SetWakeWords,
    SetTimeZone,
    SetTemperatureUnit,
    SetDistanceUnits,
    DeleteNotifications,
    UnpairBluetooth,
}

impl ResetStep {
    /// Every step, in execution order.
    pub const ALL: [ResetStep; 13] = [
        Self::DeleteAlarms,
        Self::DeleteReminders,
        Self::DeleteTimers,
        Self::ResolveEndpoint,
        Self::SetVolume,
        Self::SetDoNotDisturb,
        Self::SetLocales,
        Self::SetWakeWords,
        Self::SetTimeZone,
        Self::SetTemperatureUnit,
        Self::SetDistanceUnits,
        Self::DeleteNotifications,
        Self::UnpairBluetooth,
    ];

    /// Step identifier used in outcomes and logs.
    pub fn id(&self) -> &'static str {
        match self {
            Self::DeleteAlarms => "deleteAlarms",
            Self::DeleteReminders => "deleteReminders",
            Self::DeleteTimers => "deleteTimers",
            Self::ResolveEndpoint => "resolveEndpoint",
            Self::SetVolume => "setVolume",
            Self::SetDoNotDisturb => "setDoNotDisturb",
            Self::SetLocales => "setLocales",
            Self::SetWakeWords => "setWakeWords",
            Self::SetTimeZone => "setTimeZone",
            Self::SetTemperatureUnit => "setTemperatureUnit",
            Self::SetDistanceUnits => "setDistanceUnits",
            Self::DeleteNotifications => "deleteNotifications",
            Self::UnpairBluetooth => "unpairBluetooth",
        }
    }

    /// Whether the step targets a single endpoint rather than the unit.
    pub fn requires_endpoint(&self) -> bool {
        !matches!(
            self,
            Self::DeleteAlarms
                | Self::DeleteReminders
                | Self::DeleteTimers
                | Self::ResolveEndpoint
                | Self::DeleteNotifications
        )
    }
}

impl std::fmt::Display for ResetStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct ResetOutcome {
    /// True when every step completed.
    pub success: bool,
    /// Step that failed, if any.
    pub failed_step: Option<ResetStep>,
    /// Error returned by the failed step.
    pub cause: Option<UnitResetError>,
    /// Steps that completed, in order.
    pub completed_steps: Vec<ResetStep>,
    /// Endpoint resolved for the unit, once step 4 has run.
    pub endpoint_id: Option<String>,
}

impl ResetOutcome {
    pub(crate) fn succeeded(completed_steps: Vec<ResetStep>, endpoint_id: Option<String>) -> Self {
        Self {
            success: true,
            failed_step: None,
            cause: None,
            completed_steps,
            endpoint_id,
        }
    }

    pub(crate) fn failed(
        step: ResetStep,
        cause: UnitResetError,
        completed_steps: Vec<ResetStep>,
        endpoint_id: Option<String>,
    ) -> Self {
        Self {
            success: false,
            failed_step: Some(step),
            cause: Some(cause),
            completed_steps,
            endpoint_id,
        }
    }

    /// Identifier of the failed step.
    pub fn failed_step_id(&self) -> Option<&'static str> {
        self.failed_step.map(|s| s.id())
    }
}
