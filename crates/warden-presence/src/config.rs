use serde::{Deserialize, Serialize};

/// Identifies this deployment/version in every signal payload.
pub const DEFAULT_ORG_HASH: &str = "f374e3bc0c147426";

/// Presence Guard tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceConfig {
    /// Minimum gap between non-heartbeat signals
    #[serde(default = "default_signal_interval_ms")]
    pub signal_interval_ms: u64,

    /// Minimum gap between heartbeats
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// How long a quarantined channel stays silent
    #[serde(default = "default_silence_duration_ms")]
    pub silence_duration_ms: u64,

    /// Coupling strength at or below which a resting agent stops heartbeating
    #[serde(default = "default_epsilon_min")]
    pub epsilon_min: f64,

    #[serde(default = "default_org_hash")]
    pub org_hash: String,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            signal_interval_ms: default_signal_interval_ms(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            silence_duration_ms: default_silence_duration_ms(),
            epsilon_min: default_epsilon_min(),
            org_hash: default_org_hash(),
        }
    }
}

fn default_signal_interval_ms() -> u64 {
    60_000
}

fn default_heartbeat_interval_ms() -> u64 {
    300_000
}

fn default_silence_duration_ms() -> u64 {
    600_000
}

fn default_epsilon_min() -> f64 {
    0.001
}

fn default_org_hash() -> String {
    DEFAULT_ORG_HASH.to_string()
}
