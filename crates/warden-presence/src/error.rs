use thiserror::Error;

/// Errors from the Presence Guard.
///
/// Denials are not errors; they come back as [`crate::SignalVerdict`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresenceError {
    #[error("unknown signal type: {0}")]
    UnknownSignalType(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PresenceError {
    fn from(e: serde_json::Error) -> Self {
        PresenceError::Serialization(e.to_string())
    }
}
