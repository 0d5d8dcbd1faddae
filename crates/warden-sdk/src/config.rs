use serde::{Deserialize, Serialize};
use warden_axioms::Config;
use warden_presence::PresenceConfig;

use crate::error::{Result, WardenError};

/// Upper bound for any configured duration: one hundred years.
pub const MAX_DURATION_MS: u64 = 100 * 365 * 24 * 60 * 60 * 1_000;

/// Everything a supervisor needs, in one document.
///
/// ```json
/// {
///   "axioms":   { "maxComplexity": 500, "blockRepeatThreshold": 3 },
///   "presence": { "signalIntervalMs": 30000 },
///   "invariantsTotal": 9
/// }
/// ```
///
/// Every section and field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardenConfig {
    #[serde(default)]
    pub axioms: Config,

    #[serde(default)]
    pub presence: PresenceConfig,

    /// Number of invariants the host tracks (for `invariantsSatisfied`)
    #[serde(default = "default_invariants_total")]
    pub invariants_total: u32,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            axioms: Config::default(),
            presence: PresenceConfig::default(),
            invariants_total: default_invariants_total(),
        }
    }
}

impl WardenConfig {
    /// Parse from JSON text. Reading the file is the caller's job.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| WardenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no policy could mean.
    pub fn validate(&self) -> Result<()> {
        if !self.axioms.max_complexity.is_finite() || self.axioms.max_complexity < 0.0 {
            return Err(WardenError::Config(format!(
                "maxComplexity must be a non-negative number, got {}",
                self.axioms.max_complexity
            )));
        }
        if !self.presence.epsilon_min.is_finite() || self.presence.epsilon_min < 0.0 {
            return Err(WardenError::Config(format!(
                "epsilonMin must be a non-negative number, got {}",
                self.presence.epsilon_min
            )));
        }
        let durations = [
            ("signalIntervalMs", self.presence.signal_interval_ms),
            ("heartbeatIntervalMs", self.presence.heartbeat_interval_ms),
            ("silenceDurationMs", self.presence.silence_duration_ms),
            ("blockRepeatWindow", self.axioms.block_repeat_window_ms),
        ];
        for (field, ms) in durations {
            if ms > MAX_DURATION_MS {
                return Err(WardenError::Config(format!(
                    "{field} must be at most {MAX_DURATION_MS} ms, got {ms}"
                )));
            }
        }
        Ok(())
    }
}

fn default_invariants_total() -> u32 {
    9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            WardenConfig::from_json_str("{}").unwrap(),
            WardenConfig::default()
        );
    }

    #[test]
    fn nested_overrides() {
        let config = WardenConfig::from_json_str(
            r#"{"axioms": {"maxComplexity": 500, "blockRepeatThreshold": 3},
                "presence": {"signalIntervalMs": 30000},
                "invariantsTotal": 12}"#,
        )
        .unwrap();
        assert_eq!(config.axioms.max_complexity, 500.0);
        assert_eq!(config.axioms.block_repeat_threshold, 3);
        assert_eq!(config.axioms.block_repeat_window_ms, 300_000);
        assert_eq!(config.presence.signal_interval_ms, 30_000);
        assert_eq!(config.presence.heartbeat_interval_ms, 300_000);
        assert_eq!(config.invariants_total, 12);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            WardenConfig::from_json_str("not json"),
            Err(WardenError::Config(_))
        ));
        assert!(matches!(
            WardenConfig::from_json_str(r#"{"axioms": {"maxComplexity": -1}}"#),
            Err(WardenError::Config(_))
        ));
    }

    #[test]
    fn rejects_oversized_durations() {
        let documents = [
            r#"{"presence": {"signalIntervalMs": 18446744073709551615}}"#,
            r#"{"presence": {"heartbeatIntervalMs": 9223372036854775808}}"#,
            r#"{"presence": {"silenceDurationMs": 9000000000000000000}}"#,
            r#"{"axioms": {"blockRepeatWindow": 18446744073709551615}}"#,
        ];
        for document in documents {
            let err = WardenConfig::from_json_str(document).unwrap_err();
            assert!(matches!(err, WardenError::Config(_)), "{document}");
        }

        let mut config = WardenConfig::default();
        config.presence.silence_duration_ms = MAX_DURATION_MS;
        assert!(config.validate().is_ok());
        config.presence.silence_duration_ms = MAX_DURATION_MS + 1;
        assert!(config.validate().is_err());
    }
}
