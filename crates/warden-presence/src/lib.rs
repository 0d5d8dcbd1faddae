//! # warden-presence
//!
//! Presence Guard: decides whether a prepared signal may leave the agent.
//!
//! Each channel owns one [`PresenceState`]. A signal passes four ordered
//! checks, stopping at the first that fails:
//!
//! 1. **Silence**: the channel is quarantined (`SILENCED`)
//! 2. **Rate limit**: heartbeats and other signals have independent
//!    minimum intervals (`RATE_LIMIT`)
//! 3. **REST dominance**: no heartbeats once at rest with negligible
//!    coupling (`REST_DOMINANCE`)
//! 4. **Change detection**: nothing observable changed (`NO_CHANGE`)
//!
//! Approved signals are framed for a server-sent-event transport by
//! [`frame_signal`]. [`PresenceChannel`] serializes check-record-frame for
//! concurrent producers.

pub mod channel;
pub mod config;
pub mod error;
pub mod guard;
pub mod payload;
pub mod signal;
pub mod state;

pub use channel::{Emission, PresenceChannel};
pub use config::{PresenceConfig, DEFAULT_ORG_HASH};
pub use error::PresenceError;
pub use guard::{guard_signal, guard_signal_at, silence_channel, PresenceViolation, SignalVerdict};
pub use payload::{frame_signal, keep_alive_frame, CouplingSummary, SignalPayload, StateSummary};
pub use signal::SignalType;
pub use state::PresenceState;
