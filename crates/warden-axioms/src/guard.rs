use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use warden_types::{Operation, State};

use crate::axiom::AxiomId;
use crate::config::Config;
use crate::validator::{validate, ValidationResult};

/// Binary decision with the underlying validation result attached unmodified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDecision {
    pub allowed: bool,
    pub result: ValidationResult,
}

impl GuardDecision {
    /// The axiom responsible for a denial. Unknown operations are denied
    /// under AXM-011.
    pub fn denying_axiom(&self) -> Option<AxiomId> {
        match &self.result {
            ValidationResult::Allow => None,
            ValidationResult::Block { axiom, .. } => Some(*axiom),
            ValidationResult::Unknown { .. } => Some(AxiomId::ConservativeDefault),
        }
    }
}

/// AXM-011 Conservative Default: only `Allow` is allowed.
pub fn guard(operation: &Operation, state: &State, config: &Config) -> GuardDecision {
    let result = validate(operation, state, config);
    let allowed = match &result {
        ValidationResult::Allow => true,
        ValidationResult::Block { .. } => false,
        ValidationResult::Unknown { .. } => false,
    };

    if allowed {
        debug!(op_type = %operation.op_type, "Operation allowed");
    } else {
        warn!(
            op_type = %operation.op_type,
            status = result.status(),
            axiom = ?result.axiom(),
            "Operation denied"
        );
    }

    GuardDecision { allowed, result }
}
