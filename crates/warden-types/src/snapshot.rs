use serde::{Deserialize, Serialize};

use crate::state::State;

/// Flattened, comparable projection of [`State`] used for change detection.
///
/// Equality over every field decides whether an observer has anything new
/// to hear about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub energy: f64,
    #[serde(rename = "V")]
    pub v: f64,
    pub invariants_satisfied: u32,
    pub status: String,
    pub pending_couplings: u32,
}

impl StateSnapshot {
    /// Project a state. `invariants_total` is the number of invariants the
    /// host tracks; satisfied = total - violations, floored at zero.
    pub fn project(state: &State, invariants_total: u32, pending_couplings: u32) -> Self {
        Self {
            energy: state.energy.current,
            v: state.lyapunov.v,
            invariants_satisfied: invariants_total
                .saturating_sub(state.integrity.invariant_violations),
            status: state.integrity.status.clone(),
            pending_couplings,
        }
    }

    /// Equilibrium reached: `V` is exactly zero.
    pub fn at_rest(&self) -> bool {
        self.v == 0.0
    }
}
