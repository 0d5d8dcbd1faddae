//! End-to-end: guard, record, signal, then audit a tampered history.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use warden::{
    AxiomId, EventChain, Operation, PresenceViolation, SignalType, State, Supervisor,
    ValidationResult, WardenConfig,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap()
}

#[test]
fn allowed_operation_is_recorded_and_signalled() {
    let supervisor = Supervisor::new(WardenConfig::default());
    let mut state = State::nominal();
    state.lyapunov.v = 0.4;

    let op = Operation::new("write").with_complexity(200.0);
    let supervision = supervisor.evaluate(&op, &state, t0());
    assert!(supervision.decision.allowed);

    supervisor
        .record("GENESIS", json!({"agent": "agent-7"}), t0())
        .unwrap();
    let event = supervisor
        .record("OPERATION", serde_json::to_value(&op).unwrap(), t0())
        .unwrap();
    assert_eq!(event.seq, 2);
    assert_eq!(event.data["type"], "write");

    state.energy.current -= 0.02;
    let snapshot = supervisor.snapshot(&state, 0);
    let frame = supervisor
        .signal(SignalType::StatusChanged, &snapshot, 0.3, false, t0())
        .unwrap()
        .expect("first status signal is approved");

    let data = frame
        .lines()
        .find_map(|l| l.strip_prefix("data: "))
        .unwrap();
    let payload: serde_json::Value = serde_json::from_str(data).unwrap();
    assert_eq!(payload["seq"], 1);
    assert_eq!(payload["state"]["V"], 0.4);
    assert_eq!(payload["state"]["integrity"], 9);
}

#[test]
fn decoupled_agent_is_confined_to_internal_work() {
    let supervisor = Supervisor::default();
    let mut state = State::nominal();
    state.coupling.active = false;

    let external = supervisor.evaluate(&Operation::new("respond"), &state, t0());
    assert!(!external.decision.allowed);
    assert_eq!(
        external.decision.result.axiom(),
        Some(AxiomId::ConditionedOperation)
    );

    let internal = supervisor.evaluate(&Operation::new("internal"), &state, t0());
    assert!(internal.decision.allowed);
    assert_eq!(internal.decision.result, ValidationResult::Allow);
}

#[test]
fn tampered_history_quarantines_the_channel() {
    let chain = EventChain::new();
    chain.genesis(json!({"agent": "agent-7"}), t0()).unwrap();
    chain
        .append("OPERATION", json!({"type": "read"}), t0() + Duration::seconds(1))
        .unwrap();
    chain
        .append("OPERATION", json!({"type": "write"}), t0() + Duration::seconds(2))
        .unwrap();

    let mut stored = chain.events();
    stored[1].data = json!({"type": "delete_without_backup"});

    // A resumed chain refuses tampered input outright.
    assert!(EventChain::resume(stored.clone()).is_err());

    let supervisor = Supervisor::with_chain(WardenConfig::default(), chain);
    assert!(supervisor.audit(t0()).valid);

    let records: Vec<serde_json::Value> = stored
        .iter()
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();
    let report = supervisor.audit_records(&records, t0());
    assert!(!report.valid);
    assert_eq!(report.first_invalid, Some(1));
    assert!(supervisor.channel().state().is_silenced(t0()));

    let snapshot = supervisor.snapshot(&State::nominal(), 0);
    let emission = supervisor
        .channel()
        .try_emit(SignalType::IntegrityAlert, &snapshot, 0.5, true, t0())
        .unwrap();
    assert_eq!(
        emission,
        warden::Emission::Suppressed(PresenceViolation::Silenced)
    );
}

#[test]
fn audit_of_clean_chain_leaves_channel_open() {
    let supervisor = Supervisor::default();
    supervisor.record("BOOT", json!({}), t0()).unwrap();
    assert!(supervisor.audit(t0()).valid);
    assert!(!supervisor.channel().state().is_silenced(t0()));
}
