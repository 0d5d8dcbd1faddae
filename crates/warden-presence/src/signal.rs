use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PresenceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Heartbeat,
    StatusChanged,
    CouplingRequested,
    EnergyLow,
    IntegrityAlert,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Heartbeat => "HEARTBEAT",
            SignalType::StatusChanged => "STATUS_CHANGED",
            SignalType::CouplingRequested => "COUPLING_REQUESTED",
            SignalType::EnergyLow => "ENERGY_LOW",
            SignalType::IntegrityAlert => "INTEGRITY_ALERT",
        }
    }

    /// SSE `event:` name.
    pub fn event_name(&self) -> String {
        self.as_str().to_lowercase()
    }

    pub fn is_heartbeat(&self) -> bool {
        matches!(self, SignalType::Heartbeat)
    }

    /// Heartbeats and coupling requests are never suppressed for lack of change.
    pub fn bypasses_change_detection(&self) -> bool {
        matches!(self, SignalType::Heartbeat | SignalType::CouplingRequested)
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = PresenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HEARTBEAT" => Ok(SignalType::Heartbeat),
            "STATUS_CHANGED" => Ok(SignalType::StatusChanged),
            "COUPLING_REQUESTED" => Ok(SignalType::CouplingRequested),
            "ENERGY_LOW" => Ok(SignalType::EnergyLow),
            "INTEGRITY_ALERT" => Ok(SignalType::IntegrityAlert),
            _ => Err(PresenceError::UnknownSignalType(s.to_string())),
        }
    }
}
