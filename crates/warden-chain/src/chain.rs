use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use warden_types::iso_timestamp;

use crate::error::ChainError;
use crate::event::{Event, EventDraft};
use crate::verify::{verify_chain_report, ChainVerification};

/// Conventional type tag of the first event.
pub const GENESIS_EVENT_TYPE: &str = "GENESIS";

/// Tail pointer of a chain: where the next event attaches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    /// Digest the next event links to; `None` until genesis
    pub last_hash: Option<String>,
    /// Seq of the newest event, 0 when empty
    pub event_count: u64,
}

impl ChainHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next event receives.
    pub fn next_seq(&self) -> u64 {
        self.event_count + 1
    }

    /// The `prev_hash` the next event must carry.
    pub fn previous_hash(&self) -> Option<String> {
        self.last_hash.clone()
    }

    /// Advance past an appended event.
    pub fn update(&mut self, event: &Event) {
        self.last_hash = Some(event.hash.clone());
        self.event_count = event.seq;
    }

    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }
}

struct ChainLog {
    head: ChainHead,
    events: Vec<Event>,
}

/// Single-writer, append-only in-memory event log.
///
/// All appends go through one lock, so no two events ever share a `seq`
/// or a `prev_hash` and the chain stays linear.
pub struct EventChain {
    log: Mutex<ChainLog>,
}

impl EventChain {
    /// An empty chain awaiting its genesis event.
    pub fn new() -> Self {
        Self {
            log: Mutex::new(ChainLog {
                head: ChainHead::new(),
                events: Vec::new(),
            }),
        }
    }

    /// Adopt previously stored events as the chain.
    ///
    /// The events must verify and carry contiguous sequence numbers from 1.
    pub fn resume(events: Vec<Event>) -> Result<Self, ChainError> {
        let report = verify_chain_report(&events);
        if let (Some(index), Some(fault)) = (report.first_invalid, report.fault) {
            return Err(ChainError::IntegrityFailure {
                index,
                reason: fault.to_string(),
            });
        }

        let mut head = ChainHead::new();
        for event in &events {
            if event.seq != head.next_seq() {
                return Err(ChainError::SequenceGap {
                    expected: head.next_seq(),
                    found: event.seq,
                });
            }
            head.update(event);
        }

        info!(events = head.event_count, "event chain resumed");
        Ok(Self {
            log: Mutex::new(ChainLog { head, events }),
        })
    }

    /// Record the genesis event (`seq = 1`, `prev_hash = null`).
    pub fn genesis(&self, data: Value, at: DateTime<Utc>) -> Result<Event, ChainError> {
        let mut log = self.log.lock();
        if !log.head.is_empty() {
            return Err(ChainError::AlreadyInitialized);
        }
        let event = Self::push(&mut log, GENESIS_EVENT_TYPE, data, at)?;
        info!(hash = %event.hash, "genesis event recorded");
        Ok(event)
    }

    /// Append an event linked to the current tail.
    pub fn append(
        &self,
        event_type: impl Into<String>,
        data: Value,
        at: DateTime<Utc>,
    ) -> Result<Event, ChainError> {
        let mut log = self.log.lock();
        if log.head.is_empty() {
            return Err(ChainError::NotInitialized);
        }
        let event_type: String = event_type.into();
        Self::push(&mut log, &event_type, data, at)
    }

    /// Genesis if the chain is empty, otherwise append. One lock for both,
    /// so concurrent first writers cannot race each other into an error.
    ///
    /// A genesis event always carries [`GENESIS_EVENT_TYPE`]; `event_type`
    /// applies from the second event on.
    pub fn record(
        &self,
        event_type: impl Into<String>,
        data: Value,
        at: DateTime<Utc>,
    ) -> Result<Event, ChainError> {
        let mut log = self.log.lock();
        if log.head.is_empty() {
            let event = Self::push(&mut log, GENESIS_EVENT_TYPE, data, at)?;
            info!(hash = %event.hash, "genesis event recorded");
            return Ok(event);
        }
        let event_type: String = event_type.into();
        Self::push(&mut log, &event_type, data, at)
    }

    fn push(
        log: &mut ChainLog,
        event_type: &str,
        data: Value,
        at: DateTime<Utc>,
    ) -> Result<Event, ChainError> {
        let event = EventDraft {
            seq: log.head.next_seq(),
            event_type: event_type.to_string(),
            timestamp: iso_timestamp(at),
            data,
            prev_hash: log.head.previous_hash(),
        }
        .seal()?;

        log.head.update(&event);
        log.events.push(event.clone());
        debug!(seq = event.seq, event_type, "event appended");
        Ok(event)
    }

    /// Current tail pointer.
    pub fn head(&self) -> ChainHead {
        self.log.lock().head.clone()
    }

    /// Copy of all recorded events, in order.
    pub fn events(&self) -> Vec<Event> {
        self.log.lock().events.clone()
    }

    pub fn len(&self) -> usize {
        self.log.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Audit the full chain.
    pub fn verify(&self) -> ChainVerification {
        verify_chain_report(&self.log.lock().events)
    }
}

impl Default for EventChain {
    fn default() -> Self {
        Self::new()
    }
}
