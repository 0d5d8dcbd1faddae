use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::event::{verify_record, Event};

/// Why a chain failed verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainFault {
    /// Record is not an object or lacks `hash`/`prev_hash`.
    Malformed,
    /// First event carries a non-null `prev_hash`.
    GenesisHasPrevHash,
    /// Stored `hash` does not match the recomputed digest.
    HashMismatch,
    /// `prev_hash` does not equal the predecessor's `hash`.
    BrokenLink,
}

impl std::fmt::Display for ChainFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChainFault::Malformed => "malformed record",
            ChainFault::GenesisHasPrevHash => "genesis event has a prev_hash",
            ChainFault::HashMismatch => "stored hash does not match content",
            ChainFault::BrokenLink => "prev_hash does not match predecessor",
        };
        f.write_str(s)
    }
}

/// Result of chain verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainVerification {
    /// Whether the chain is valid
    pub valid: bool,
    /// Total number of events checked
    pub total: usize,
    /// Number of leading events that verified
    pub verified: usize,
    /// Index of the first invalid event
    pub first_invalid: Option<usize>,
    pub fault: Option<ChainFault>,
}

impl ChainVerification {
    fn clean(total: usize) -> Self {
        Self {
            valid: true,
            total,
            verified: total,
            first_invalid: None,
            fault: None,
        }
    }

    fn failed(total: usize, index: usize, fault: ChainFault) -> Self {
        Self {
            valid: false,
            total,
            verified: index,
            first_invalid: Some(index),
            fault: Some(fault),
        }
    }
}

/// `true` iff the event sequence is an intact chain. Empty is valid.
pub fn verify_chain(events: &[Event]) -> bool {
    verify_chain_report(events).valid
}

/// Verify typed events, reporting the first fault.
pub fn verify_chain_report(events: &[Event]) -> ChainVerification {
    let records: Vec<Value> = events
        .iter()
        .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
        .collect();
    verify_records_report(&records)
}

/// `true` iff the raw stored records form an intact chain.
pub fn verify_records(records: &[Value]) -> bool {
    verify_records_report(records).valid
}

/// Verify raw stored records, reporting the first fault.
///
/// Stops at the first violation: a single bad link invalidates the chain
/// even when everything after it is well-formed.
pub fn verify_records_report(records: &[Value]) -> ChainVerification {
    let total = records.len();

    for (i, record) in records.iter().enumerate() {
        let prev_hash = match record.get("prev_hash") {
            Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.as_str()),
            _ => return fail(total, i, ChainFault::Malformed),
        };
        if record.get("hash").and_then(Value::as_str).is_none() {
            return fail(total, i, ChainFault::Malformed);
        }

        if i == 0 && prev_hash.is_some() {
            return fail(total, i, ChainFault::GenesisHasPrevHash);
        }

        if !verify_record(record) {
            return fail(total, i, ChainFault::HashMismatch);
        }

        if i > 0 {
            let expected = records[i - 1].get("hash").and_then(Value::as_str);
            if prev_hash != expected {
                return fail(total, i, ChainFault::BrokenLink);
            }
        }
    }

    debug!(events = total, "chain verified");
    ChainVerification::clean(total)
}

fn fail(total: usize, index: usize, fault: ChainFault) -> ChainVerification {
    warn!(index, %fault, "chain verification failed");
    ChainVerification::failed(total, index, fault)
}
