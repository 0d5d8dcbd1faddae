use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signal::SignalType;

/// Per-channel presence context. Lives as long as the channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceState {
    /// Number of attached subscribers.
    pub connected: u32,
    pub last_signal: Option<DateTime<Utc>>,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub signal_seq: u64,
    pub silenced_until: Option<DateTime<Utc>>,
}

impl PresenceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self) -> u32 {
        self.connected = self.connected.saturating_add(1);
        self.connected
    }

    pub fn disconnect(&mut self) -> u32 {
        self.connected = self.connected.saturating_sub(1);
        self.connected
    }

    pub fn is_silenced(&self, now: DateTime<Utc>) -> bool {
        matches!(self.silenced_until, Some(until) if until > now)
    }

    /// Record an approved emission and return its sequence number.
    ///
    /// Heartbeats and other signals keep separate clocks.
    pub fn record_emission(&mut self, signal_type: SignalType, now: DateTime<Utc>) -> u64 {
        if signal_type.is_heartbeat() {
            self.last_heartbeat = Some(now);
        } else {
            self.last_signal = Some(now);
        }
        self.signal_seq += 1;
        self.signal_seq
    }
}
