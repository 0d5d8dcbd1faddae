use thiserror::Error;
use warden_chain::ChainError;
use warden_presence::PresenceError;

/// Errors surfaced by the facade.
#[derive(Error, Debug)]
pub enum WardenError {
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("presence error: {0}")]
    Presence(#[from] PresenceError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WardenError>;
