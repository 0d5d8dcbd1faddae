use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use warden_types::{millis_between, saturating_millis, Operation};

use crate::axiom::AxiomId;
use crate::config::Config;
use crate::guard::GuardDecision;

/// One denial observed by the guard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEvent {
    pub at: DateTime<Utc>,
    pub op_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axiom: Option<AxiomId>,
}

impl BlockEvent {
    /// `None` when the decision allowed the operation.
    pub fn from_decision(
        operation: &Operation,
        decision: &GuardDecision,
        at: DateTime<Utc>,
    ) -> Option<Self> {
        if decision.allowed {
            return None;
        }
        Some(Self {
            at,
            op_type: operation.op_type.clone(),
            axiom: decision.denying_axiom(),
        })
    }

    /// Inside the window `(now - window, now]`, counting the boundary.
    fn within(&self, now: DateTime<Utc>, window_ms: u64) -> bool {
        let age = millis_between(self.at, now);
        age >= 0 && age as u64 <= window_ms
    }
}

/// Outcome of a repeated-block check. Advisory only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatedBlockReport {
    pub triggered: bool,
    pub count: u32,
    pub threshold: u32,
    /// Window length in milliseconds.
    pub window: u64,
    /// Denials in the window per axiom code.
    #[serde(default)]
    pub by_axiom: BTreeMap<String, u32>,
}

/// Count denials within the configured window ending at `now`.
///
/// Triggers when the count reaches `blockRepeatThreshold`. A threshold of 0
/// disables the check. Events stamped after `now` are ignored.
pub fn check_repeated_blocks(
    config: &Config,
    recent_block_events: &[BlockEvent],
    now: DateTime<Utc>,
) -> RepeatedBlockReport {
    let window = config.block_repeat_window_ms;
    let threshold = config.block_repeat_threshold;

    let mut count = 0u32;
    let mut by_axiom = BTreeMap::new();
    for event in recent_block_events.iter().filter(|e| e.within(now, window)) {
        count = count.saturating_add(1);
        let code = event
            .axiom
            .map(|a| a.code().to_string())
            .unwrap_or_else(|| "unattributed".to_string());
        *by_axiom.entry(code).or_insert(0u32) += 1;
    }

    let triggered = threshold > 0 && count >= threshold;
    if triggered {
        warn!(count, threshold, window_ms = window, "Repeated blocks detected");
    } else {
        debug!(count, threshold, "Repeated-block check below threshold");
    }

    RepeatedBlockReport {
        triggered,
        count,
        threshold,
        window,
        by_axiom,
    }
}

/// Stateful rolling window of denials.
#[derive(Clone, Debug)]
pub struct BlockMonitor {
    events: VecDeque<BlockEvent>,
    config: Config,
}

impl BlockMonitor {
    pub fn new(config: Config) -> Self {
        Self {
            events: VecDeque::new(),
            config,
        }
    }

    pub fn record(&mut self, event: BlockEvent) {
        self.events.push_back(event);
    }

    /// Record the decision if it was a denial. Returns whether it was.
    pub fn record_decision(
        &mut self,
        operation: &Operation,
        decision: &GuardDecision,
        at: DateTime<Utc>,
    ) -> bool {
        match BlockEvent::from_decision(operation, decision, at) {
            Some(event) => {
                self.record(event);
                true
            }
            None => false,
        }
    }

    /// Drop events that have aged out of the window.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let window = saturating_millis(self.config.block_repeat_window_ms);
        self.events.retain(|e| millis_between(e.at, now) <= window);
    }

    pub fn check(&mut self, now: DateTime<Utc>) -> RepeatedBlockReport {
        self.prune(now);
        let events: Vec<BlockEvent> = self.events.iter().cloned().collect();
        check_repeated_blocks(&self.config, &events, now)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
