//! Hash Chain: canonical content hashing and a tamper-evident event history.
//!
//! Every recorded event carries a SHA-256 digest over its canonical content
//! and the digest of its predecessor. Altering, dropping or reordering any
//! event breaks a downstream link.
//!
//! - [`sha256`] / [`hash_object`]: deterministic digests; object keys are
//!   sorted before hashing so construction order never matters
//! - [`Event`] / [`EventDraft`]: the persisted record and its unsealed form
//! - [`verify_chain`] / [`verify_chain_report`]: total, non-throwing audits
//! - [`EventChain`]: single-writer in-memory log that never forks
//!
//! Nothing here performs I/O; persistence belongs to the host.

pub mod canonical;
pub mod chain;
pub mod error;
pub mod event;
mod finite;
pub mod verify;

pub use canonical::{canonical_json, hash_object, sha256};
pub use chain::{ChainHead, EventChain, GENESIS_EVENT_TYPE};
pub use error::ChainError;
pub use event::{hash_event, verify_event_hash, verify_record, Event, EventDraft};
pub use verify::{
    verify_chain, verify_chain_report, verify_records, verify_records_report, ChainFault,
    ChainVerification,
};
