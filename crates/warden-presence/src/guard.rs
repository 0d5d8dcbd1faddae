use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use warden_types::{deadline_after, millis_between, saturating_millis, StateSnapshot};

use crate::config::PresenceConfig;
use crate::signal::SignalType;
use crate::state::PresenceState;

/// Why a signal was held back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceViolation {
    RateLimit,
    RestDominance,
    NoChange,
    Silenced,
}

impl std::fmt::Display for PresenceViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PresenceViolation::RateLimit => "RATE_LIMIT",
            PresenceViolation::RestDominance => "REST_DOMINANCE",
            PresenceViolation::NoChange => "NO_CHANGE",
            PresenceViolation::Silenced => "SILENCED",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "violation", rename_all = "lowercase")]
pub enum SignalVerdict {
    Approved,
    Denied(PresenceViolation),
}

impl SignalVerdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, SignalVerdict::Approved)
    }

    pub fn violation(&self) -> Option<PresenceViolation> {
        match self {
            SignalVerdict::Approved => None,
            SignalVerdict::Denied(v) => Some(*v),
        }
    }
}

/// [`guard_signal_at`] against the wall clock.
pub fn guard_signal(
    signal_type: SignalType,
    state: &PresenceState,
    current: &StateSnapshot,
    previous: Option<&StateSnapshot>,
    epsilon: f64,
    config: &PresenceConfig,
) -> SignalVerdict {
    guard_signal_at(
        signal_type,
        state,
        current,
        previous,
        epsilon,
        config,
        Utc::now(),
    )
}

/// Decide whether a signal may be emitted at `now`.
///
/// Never mutates `state`; on approval the caller records the emission with
/// [`PresenceState::record_emission`].
pub fn guard_signal_at(
    signal_type: SignalType,
    state: &PresenceState,
    current: &StateSnapshot,
    previous: Option<&StateSnapshot>,
    epsilon: f64,
    config: &PresenceConfig,
    now: DateTime<Utc>,
) -> SignalVerdict {
    let verdict = evaluate(signal_type, state, current, previous, epsilon, config, now);
    match verdict {
        SignalVerdict::Approved => debug!(signal = %signal_type, "Signal approved"),
        SignalVerdict::Denied(violation) => {
            debug!(signal = %signal_type, %violation, "Signal denied")
        }
    }
    verdict
}

fn evaluate(
    signal_type: SignalType,
    state: &PresenceState,
    current: &StateSnapshot,
    previous: Option<&StateSnapshot>,
    epsilon: f64,
    config: &PresenceConfig,
    now: DateTime<Utc>,
) -> SignalVerdict {
    // 1. Silence
    if state.is_silenced(now) {
        return SignalVerdict::Denied(PresenceViolation::Silenced);
    }

    // 2. Rate limit
    let (last, interval) = if signal_type.is_heartbeat() {
        (state.last_heartbeat, config.heartbeat_interval_ms)
    } else {
        (state.last_signal, config.signal_interval_ms)
    };
    if let Some(last) = last {
        if millis_between(last, now) < saturating_millis(interval) {
            return SignalVerdict::Denied(PresenceViolation::RateLimit);
        }
    }

    // 3. REST dominance
    if signal_type.is_heartbeat() && current.at_rest() && epsilon <= config.epsilon_min {
        return SignalVerdict::Denied(PresenceViolation::RestDominance);
    }

    // 4. Change detection
    if !signal_type.bypasses_change_detection() {
        if let Some(previous) = previous {
            if previous == current {
                return SignalVerdict::Denied(PresenceViolation::NoChange);
            }
        }
    }

    SignalVerdict::Approved
}

/// Quarantine the channel for the configured silence duration.
///
/// Invoked by the owner on an integrity violation, never by the guard.
pub fn silence_channel(state: &mut PresenceState, config: &PresenceConfig, now: DateTime<Utc>) {
    let until = deadline_after(now, config.silence_duration_ms);
    warn!(until = %until, "Presence channel silenced");
    state.silenced_until = Some(until);
}
