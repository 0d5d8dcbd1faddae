//! Core type definitions for Warden.
//!
//! This crate provides the shared data model. No business logic, just types
//! and the projections between them. Every Warden crate depends on this crate.

pub mod ids;
pub mod operation;
pub mod snapshot;
pub mod state;
pub mod temporal;

pub use ids::ChannelId;
pub use operation::Operation;
pub use snapshot::StateSnapshot;
pub use state::{Coupling, Energy, Integrity, Lyapunov, Memory, State};
pub use temporal::{
    deadline_after, iso_timestamp, millis_between, millis_duration, saturating_millis,
};
