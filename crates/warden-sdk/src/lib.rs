//! # warden
//!
//! Governance and integrity for an autonomous agent's state changes.
//!
//! - **Axiom Validator** ([`warden_axioms`]): may this operation run?
//! - **Hash Chain** ([`warden_chain`]): has the recorded history been altered?
//! - **Presence Guard** ([`warden_presence`]): may this signal go out?
//!
//! The subsystems are independent; [`Supervisor`] wires them together in the
//! usual order (guard, apply, record, signal) and handles the cross-cutting
//! policies: repeated-denial escalation and quarantine of the presence
//! channel when the chain fails an audit.
//!
//! ```no_run
//! use chrono::Utc;
//! use serde_json::json;
//! use warden::{Operation, SignalType, State, Supervisor, WardenConfig};
//!
//! let supervisor = Supervisor::new(WardenConfig::default());
//! let state = State::nominal();
//! let op = Operation::new("read");
//!
//! let now = Utc::now();
//! if supervisor.evaluate(&op, &state, now).decision.allowed {
//!     supervisor.record("OPERATION", json!({"type": "read"}), now)?;
//!     let snapshot = supervisor.snapshot(&state, 0);
//!     if let Some(frame) = supervisor.signal(SignalType::StatusChanged, &snapshot, 0.5, false, now)? {
//!         print!("{frame}");
//!     }
//! }
//! # Ok::<(), warden::WardenError>(())
//! ```

pub mod config;
pub mod error;
pub mod supervisor;

pub use config::{WardenConfig, MAX_DURATION_MS};
pub use error::{Result, WardenError};
pub use supervisor::{Supervision, Supervisor};

// Subsystem re-exports
pub use warden_axioms::{
    check_repeated_blocks, guard, validate, AxiomId, BlockEvent, BlockMonitor, Config,
    EnergyCostModel, GuardDecision, RepeatedBlockReport, ValidationResult,
};
pub use warden_chain::{
    hash_event, hash_object, sha256, verify_chain, verify_chain_report, verify_event_hash,
    verify_records, ChainError, ChainVerification, Event, EventChain,
};
pub use warden_presence::{
    frame_signal, guard_signal, guard_signal_at, keep_alive_frame, silence_channel, Emission,
    PresenceChannel, PresenceConfig, PresenceError, PresenceState, PresenceViolation,
    SignalPayload, SignalType, SignalVerdict,
};
pub use warden_types::{Operation, State, StateSnapshot};
