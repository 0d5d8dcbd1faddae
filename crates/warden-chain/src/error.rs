use thiserror::Error;

/// Errors from Hash Chain operations.
///
/// Verification never produces these: a bad chain is a `false`/report value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("chain has no genesis event")]
    NotInitialized,

    #[error("chain already has a genesis event")]
    AlreadyInitialized,

    #[error("chain integrity failure at index {index}: {reason}")]
    IntegrityFailure { index: usize, reason: String },

    #[error("sequence gap: expected seq {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        ChainError::Serialization(e.to_string())
    }
}
