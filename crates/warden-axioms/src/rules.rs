use tracing::warn;
use warden_types::{Operation, State};

use crate::axiom::{Axiom, AxiomId, AxiomViolation};
use crate::config::Config;

// =========================================================================
// THE FOUR ORDERED AXIOMS
// =========================================================================

/// AXM-006: Conditioned Operation.
///
/// Without an active coupling the agent may only act on itself.
pub struct ConditionedOperationAxiom;

impl Axiom for ConditionedOperationAxiom {
    fn id(&self) -> AxiomId {
        AxiomId::ConditionedOperation
    }
    fn name(&self) -> &str {
        "Conditioned Operation"
    }
    fn check(
        &self,
        operation: &Operation,
        state: &State,
        config: &Config,
    ) -> Result<(), AxiomViolation> {
        if !state.coupling.active && !config.is_internal(operation) {
            return Err(AxiomViolation {
                axiom: self.id(),
                reason: format!(
                    "External operation '{}' requires an active coupling",
                    operation.op_type
                ),
            });
        }
        Ok(())
    }
}

/// AXM-008: Operational Boundedness.
///
/// Complexity must be a finite, non-negative number no larger than
/// `maxComplexity`. Absent complexity counts as 0.
pub struct OperationalBoundednessAxiom;

impl Axiom for OperationalBoundednessAxiom {
    fn id(&self) -> AxiomId {
        AxiomId::OperationalBoundedness
    }
    fn name(&self) -> &str {
        "Operational Boundedness"
    }
    fn check(
        &self,
        operation: &Operation,
        _state: &State,
        config: &Config,
    ) -> Result<(), AxiomViolation> {
        let complexity = operation.complexity_or_default();
        if !complexity.is_finite() || complexity < 0.0 {
            return Err(AxiomViolation {
                axiom: self.id(),
                reason: format!("Malformed complexity {}", complexity),
            });
        }
        if complexity > config.max_complexity {
            return Err(AxiomViolation {
                axiom: self.id(),
                reason: format!(
                    "Complexity {} exceeds maximum {}",
                    complexity, config.max_complexity
                ),
            });
        }
        Ok(())
    }
}

/// AXM-009: Possibility Preservation.
pub struct PossibilityPreservationAxiom;

impl Axiom for PossibilityPreservationAxiom {
    fn id(&self) -> AxiomId {
        AxiomId::PossibilityPreservation
    }
    fn name(&self) -> &str {
        "Possibility Preservation"
    }
    fn check(
        &self,
        operation: &Operation,
        _state: &State,
        config: &Config,
    ) -> Result<(), AxiomViolation> {
        if let Some(pattern) = config.harmful_match(&operation.op_type) {
            return Err(AxiomViolation {
                axiom: self.id(),
                reason: format!(
                    "Operation '{}' matches harmful pattern '{}'",
                    operation.op_type, pattern
                ),
            });
        }
        Ok(())
    }
}

/// AXM-015: Viability.
///
/// The projected energy after paying the operation's cost must stay at or
/// above the floor. Landing under the soft threshold is only logged.
pub struct ViabilityAxiom;

impl Axiom for ViabilityAxiom {
    fn id(&self) -> AxiomId {
        AxiomId::Viability
    }
    fn name(&self) -> &str {
        "Viability"
    }
    fn check(
        &self,
        operation: &Operation,
        state: &State,
        config: &Config,
    ) -> Result<(), AxiomViolation> {
        let cost = config.energy_cost.cost(operation.complexity_or_default());
        let projected = state.energy.current - cost;

        if projected < state.energy.min {
            return Err(AxiomViolation {
                axiom: self.id(),
                reason: format!(
                    "Projected energy {:.4} below floor {} (cost {:.4})",
                    projected, state.energy.min, cost
                ),
            });
        }

        if projected < state.energy.threshold {
            warn!(
                op_type = %operation.op_type,
                projected,
                threshold = state.energy.threshold,
                "Energy will fall below warning threshold"
            );
        }
        Ok(())
    }
}
