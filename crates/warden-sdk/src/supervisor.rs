use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use warden_axioms::{guard, BlockMonitor, GuardDecision, RepeatedBlockReport};
use warden_chain::{verify_records_report, ChainVerification, Event, EventChain};
use warden_presence::{Emission, PresenceChannel, SignalType};
use warden_types::{Operation, State, StateSnapshot};

use crate::config::WardenConfig;
use crate::error::Result;

/// Outcome of [`Supervisor::evaluate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supervision {
    pub decision: GuardDecision,
    /// Present when repeated denials crossed the configured threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<RepeatedBlockReport>,
}

/// Reference orchestrator: guard, then record, then signal.
///
/// The three subsystems never see each other; the supervisor passes values
/// between them. Safe to share across tasks.
pub struct Supervisor {
    config: WardenConfig,
    monitor: Mutex<BlockMonitor>,
    chain: EventChain,
    channel: PresenceChannel,
}

impl Supervisor {
    pub fn new(config: WardenConfig) -> Self {
        Self::with_chain(config, EventChain::new())
    }

    /// Supervise on top of an existing (e.g. resumed) chain.
    pub fn with_chain(config: WardenConfig, chain: EventChain) -> Self {
        info!(
            events = chain.len(),
            invariants = config.invariants_total,
            "Supervisor started"
        );
        Self {
            monitor: Mutex::new(BlockMonitor::new(config.axioms.clone())),
            channel: PresenceChannel::new(config.presence.clone()),
            chain,
            config,
        }
    }

    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    pub fn chain(&self) -> &EventChain {
        &self.chain
    }

    pub fn channel(&self) -> &PresenceChannel {
        &self.channel
    }

    /// Run the Conservative Guard and feed denials to the block monitor.
    pub fn evaluate(&self, operation: &Operation, state: &State, now: DateTime<Utc>) -> Supervision {
        let decision = guard(operation, state, &self.config.axioms);

        let escalation = {
            let mut monitor = self.monitor.lock();
            if monitor.record_decision(operation, &decision, now) {
                Some(monitor.check(now)).filter(|report| report.triggered)
            } else {
                None
            }
        };

        if let Some(report) = &escalation {
            warn!(
                op_type = %operation.op_type,
                count = report.count,
                threshold = report.threshold,
                "Repeated denials, escalating"
            );
        }

        Supervision {
            decision,
            escalation,
        }
    }

    /// Append to the chain, starting it with a genesis event if empty.
    pub fn record(
        &self,
        event_type: impl Into<String>,
        data: Value,
        now: DateTime<Utc>,
    ) -> Result<Event> {
        Ok(self.chain.record(event_type, data, now)?)
    }

    /// Project a state for change detection and payloads.
    pub fn snapshot(&self, state: &State, pending_couplings: u32) -> StateSnapshot {
        StateSnapshot::project(state, self.config.invariants_total, pending_couplings)
    }

    /// The framed SSE text when the Presence Guard approves, otherwise `None`.
    pub fn signal(
        &self,
        signal_type: SignalType,
        snapshot: &StateSnapshot,
        epsilon: f64,
        urgent: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let emission = self
            .channel
            .try_emit(signal_type, snapshot, epsilon, urgent, now)?;
        if let Emission::Suppressed(violation) = &emission {
            info!(signal = %signal_type, %violation, "Signal suppressed");
        }
        Ok(emission.into_frame())
    }

    /// Verify the whole chain. A broken chain silences the presence channel.
    pub fn audit(&self, now: DateTime<Utc>) -> ChainVerification {
        let report = self.chain.verify();
        self.quarantine_if_broken(&report, now);
        report
    }

    /// Verify stored records (e.g. replayed from disk) with the same
    /// quarantine policy as [`Supervisor::audit`].
    pub fn audit_records(&self, records: &[Value], now: DateTime<Utc>) -> ChainVerification {
        let report = verify_records_report(records);
        self.quarantine_if_broken(&report, now);
        report
    }

    fn quarantine_if_broken(&self, report: &ChainVerification, now: DateTime<Utc>) {
        if report.valid {
            return;
        }
        error!(
            first_invalid = ?report.first_invalid,
            fault = ?report.fault,
            "Chain integrity violated, silencing presence channel"
        );
        self.channel.silence(now);
    }

    /// Pending denials in the monitor window.
    pub fn recent_blocks(&self) -> usize {
        self.monitor.lock().len()
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(WardenConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use warden_axioms::AxiomId;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn denials_escalate_at_threshold() {
        let mut config = WardenConfig::default();
        config.axioms.block_repeat_threshold = 3;
        let supervisor = Supervisor::new(config);
        let state = State::nominal();
        let op = Operation::new("force_overwrite");

        for i in 0..2 {
            let s = supervisor.evaluate(&op, &state, t0() + Duration::seconds(i));
            assert!(!s.decision.allowed);
            assert!(s.escalation.is_none());
        }
        let third = supervisor.evaluate(&op, &state, t0() + Duration::seconds(2));
        let report = third.escalation.unwrap();
        assert!(report.triggered);
        assert_eq!(report.count, 3);
        assert_eq!(
            third.decision.denying_axiom(),
            Some(AxiomId::PossibilityPreservation)
        );
    }

    #[test]
    fn allowed_operations_never_escalate() {
        let supervisor = Supervisor::default();
        let s = supervisor.evaluate(&Operation::new("read"), &State::nominal(), t0());
        assert!(s.decision.allowed);
        assert!(s.escalation.is_none());
        assert_eq!(supervisor.recent_blocks(), 0);
    }

    #[test]
    fn first_record_is_genesis() {
        let supervisor = Supervisor::default();
        let g = supervisor.record("BOOT", json!({"agent": "a"}), t0()).unwrap();
        assert!(g.is_genesis());
        let e = supervisor
            .record("OPERATION", json!({"type": "read"}), t0())
            .unwrap();
        assert_eq!(e.seq, 2);
        assert!(supervisor.audit(t0()).valid);
    }

    #[test]
    fn snapshot_uses_configured_invariant_total() {
        let supervisor = Supervisor::default();
        let mut state = State::nominal();
        state.integrity.invariant_violations = 2;
        let snap = supervisor.snapshot(&state, 1);
        assert_eq!(snap.invariants_satisfied, 7);
        assert_eq!(snap.pending_couplings, 1);
    }

    #[test]
    fn signal_returns_frame_or_none() {
        let supervisor = Supervisor::default();
        let snap = supervisor.snapshot(&State::nominal(), 0);

        let frame = supervisor
            .signal(SignalType::StatusChanged, &snap, 0.5, false, t0())
            .unwrap()
            .unwrap();
        assert!(frame.starts_with("event: status_changed\n"));

        let again = supervisor
            .signal(SignalType::StatusChanged, &snap, 0.5, false, t0() + Duration::hours(1))
            .unwrap();
        assert!(again.is_none());
    }
}
