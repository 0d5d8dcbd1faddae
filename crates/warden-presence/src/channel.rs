use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};
use warden_types::{ChannelId, StateSnapshot};

use crate::config::PresenceConfig;
use crate::error::PresenceError;
use crate::guard::{guard_signal_at, silence_channel, PresenceViolation, SignalVerdict};
use crate::payload::{frame_signal, keep_alive_frame, SignalPayload};
use crate::signal::SignalType;
use crate::state::PresenceState;

/// Result of one emission attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Emission {
    Sent { seq: u64, frame: String },
    Suppressed(PresenceViolation),
}

impl Emission {
    pub fn frame(&self) -> Option<&str> {
        match self {
            Emission::Sent { frame, .. } => Some(frame.as_str()),
            Emission::Suppressed(_) => None,
        }
    }

    pub fn into_frame(self) -> Option<String> {
        match self {
            Emission::Sent { frame, .. } => Some(frame),
            Emission::Suppressed(_) => None,
        }
    }
}

struct ChannelInner {
    state: PresenceState,
    last_emitted: Option<StateSnapshot>,
}

/// One signaling channel.
///
/// All decisions and updates go through a single lock, so concurrent
/// producers each see a consistent prior timestamp and never share a `seq`.
pub struct PresenceChannel {
    id: ChannelId,
    config: PresenceConfig,
    inner: Mutex<ChannelInner>,
}

impl PresenceChannel {
    pub fn new(config: PresenceConfig) -> Self {
        let id = ChannelId::new();
        info!(channel = %id, "Presence channel opened");
        Self {
            id,
            config,
            inner: Mutex::new(ChannelInner {
                state: PresenceState::new(),
                last_emitted: None,
            }),
        }
    }

    pub fn id(&self) -> &ChannelId {
        &self.id
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    /// Copy of the current presence state.
    pub fn state(&self) -> PresenceState {
        self.inner.lock().state.clone()
    }

    pub fn last_emitted(&self) -> Option<StateSnapshot> {
        self.inner.lock().last_emitted.clone()
    }

    pub fn connect(&self) -> u32 {
        self.inner.lock().state.connect()
    }

    pub fn disconnect(&self) -> u32 {
        self.inner.lock().state.disconnect()
    }

    pub fn silence(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.lock();
        silence_channel(&mut inner.state, &self.config, now);
    }

    pub fn keep_alive(&self) -> &'static str {
        keep_alive_frame()
    }

    /// Check, record and frame in one step.
    ///
    /// The change check compares against the last snapshot this channel
    /// emitted. Nothing is recorded unless the frame was produced.
    pub fn try_emit(
        &self,
        signal_type: SignalType,
        snapshot: &StateSnapshot,
        epsilon: f64,
        urgent: bool,
        now: DateTime<Utc>,
    ) -> Result<Emission, PresenceError> {
        let mut inner = self.inner.lock();

        let verdict = guard_signal_at(
            signal_type,
            &inner.state,
            snapshot,
            inner.last_emitted.as_ref(),
            epsilon,
            &self.config,
            now,
        );
        if let SignalVerdict::Denied(violation) = verdict {
            return Ok(Emission::Suppressed(violation));
        }

        let seq = inner.state.signal_seq + 1;
        let payload = SignalPayload::build(
            signal_type,
            seq,
            now,
            self.config.org_hash.as_str(),
            snapshot,
            urgent,
        );
        let frame = frame_signal(&payload)?;

        let recorded = inner.state.record_emission(signal_type, now);
        inner.last_emitted = Some(snapshot.clone());
        debug!(channel = %self.id, signal = %signal_type, seq = recorded, "Signal emitted");

        Ok(Emission::Sent {
            seq: recorded,
            frame,
        })
    }
}

impl Default for PresenceChannel {
    fn default() -> Self {
        Self::new(PresenceConfig::default())
    }
}
