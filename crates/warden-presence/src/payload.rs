use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_types::{iso_timestamp, StateSnapshot};

use crate::error::PresenceError;
use crate::signal::SignalType;

/// The JSON body of one emitted signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalPayload {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub ts: String,
    pub seq: u64,
    pub org_hash: String,
    pub state: StateSummary,
    pub coupling: CouplingSummary,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    pub energy: f64,
    #[serde(rename = "V")]
    pub v: f64,
    /// Invariants currently satisfied.
    pub integrity: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouplingSummary {
    pub pending: u32,
    pub urgent: bool,
}

impl SignalPayload {
    pub fn build(
        signal_type: SignalType,
        seq: u64,
        at: DateTime<Utc>,
        org_hash: impl Into<String>,
        snapshot: &StateSnapshot,
        urgent: bool,
    ) -> Self {
        Self {
            signal_type,
            ts: iso_timestamp(at),
            seq,
            org_hash: org_hash.into(),
            state: StateSummary {
                energy: snapshot.energy,
                v: snapshot.v,
                integrity: snapshot.invariants_satisfied,
            },
            coupling: CouplingSummary {
                pending: snapshot.pending_couplings,
                urgent,
            },
        }
    }
}

/// Frame a payload as one server-sent event.
pub fn frame_signal(payload: &SignalPayload) -> Result<String, PresenceError> {
    let data = serde_json::to_string(payload)?;
    Ok(format!(
        "event: {}\ndata: {}\n\n",
        payload.signal_type.event_name(),
        data
    ))
}

/// SSE comment line keeping idle connections open.
pub fn keep_alive_frame() -> &'static str {
    ": keep-alive\n\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> SignalPayload {
        let snapshot = StateSnapshot {
            energy: 0.75,
            v: 0.2,
            invariants_satisfied: 8,
            status: "ok".into(),
            pending_couplings: 1,
        };
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        SignalPayload::build(SignalType::CouplingRequested, 4, at, "abc123", &snapshot, true)
    }

    #[test]
    fn frame_layout() {
        let frame = frame_signal(&payload()).unwrap();
        assert!(frame.starts_with("event: coupling_requested\ndata: {"));
        assert!(frame.ends_with("}\n\n"));
        assert_eq!(frame.lines().count(), 3);
    }

    #[test]
    fn payload_wire_fields() {
        let frame = frame_signal(&payload()).unwrap();
        let data = frame
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(data).unwrap();
        assert_eq!(json["type"], "COUPLING_REQUESTED");
        assert_eq!(json["ts"], "2025-06-01T09:30:00.000Z");
        assert_eq!(json["seq"], 4);
        assert_eq!(json["org_hash"], "abc123");
        assert_eq!(json["state"]["V"], 0.2);
        assert_eq!(json["state"]["integrity"], 8);
        assert_eq!(json["coupling"]["pending"], 1);
        assert_eq!(json["coupling"]["urgent"], true);
    }

    #[test]
    fn keep_alive_is_a_comment() {
        assert!(keep_alive_frame().starts_with(':'));
    }
}
