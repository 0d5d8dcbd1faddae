use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::hash_object;
use crate::error::ChainError;

/// A recorded event: the persisted unit of agent history.
///
/// `hash` is the digest of every other field; `prev_hash` links to the
/// predecessor and is `null` only for the genesis event. Wire format:
/// `{ seq, type, timestamp, data, prev_hash, hash }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    #[serde(rename = "type")]
    pub event_type: String,
    /// ISO-8601 string, hashed exactly as stored.
    pub timestamp: String,
    pub data: Value,
    pub prev_hash: Option<String>,
    pub hash: String,
}

/// An event before its digest is computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub seq: u64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: String,
    pub data: Value,
    pub prev_hash: Option<String>,
}

impl EventDraft {
    /// Compute the digest and produce the sealed event.
    pub fn seal(self) -> Result<Event, ChainError> {
        let hash = hash_event(&self)?;
        Ok(Event {
            seq: self.seq,
            event_type: self.event_type,
            timestamp: self.timestamp,
            data: self.data,
            prev_hash: self.prev_hash,
            hash,
        })
    }
}

impl Event {
    /// The hashed portion of this event.
    pub fn draft(&self) -> EventDraft {
        EventDraft {
            seq: self.seq,
            event_type: self.event_type.clone(),
            timestamp: self.timestamp.clone(),
            data: self.data.clone(),
            prev_hash: self.prev_hash.clone(),
        }
    }

    /// Is this the chain's first event by position convention?
    pub fn is_genesis(&self) -> bool {
        self.seq == 1 && self.prev_hash.is_none()
    }
}

/// Digest of an event with its `hash` field excluded.
pub fn hash_event(draft: &EventDraft) -> Result<String, ChainError> {
    hash_object(draft)
}

/// Recompute the digest and compare with the stored `hash`.
pub fn verify_event_hash(event: &Event) -> bool {
    match hash_event(&event.draft()) {
        Ok(expected) => expected == event.hash,
        Err(_) => false,
    }
}

/// Verify a raw stored record.
///
/// The digest covers every field except `hash`, extension fields included.
/// A record that is not an object, lacks a string `hash`, or lacks a
/// `prev_hash` field (string or null) fails verification.
pub fn verify_record(record: &Value) -> bool {
    let Some(obj) = record.as_object() else {
        return false;
    };
    let Some(stored) = obj.get("hash").and_then(Value::as_str) else {
        return false;
    };
    match obj.get("prev_hash") {
        Some(Value::Null) | Some(Value::String(_)) => {}
        _ => return false,
    }

    let mut content = obj.clone();
    content.remove("hash");
    match hash_object(&content) {
        Ok(expected) => expected == stored,
        Err(_) => false,
    }
}
