use serde::{Deserialize, Serialize};
use tracing::debug;
use warden_types::{Operation, State};

use crate::axiom::{Axiom, AxiomId};
use crate::config::Config;
use crate::rules::{
    ConditionedOperationAxiom, OperationalBoundednessAxiom, PossibilityPreservationAxiom,
    ViabilityAxiom,
};

/// Three-way validation outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResult {
    /// Recognised and violates nothing.
    Allow,
    /// An axiom was violated.
    Block { axiom: AxiomId, reason: String },
    /// Violates nothing but no rule recognises it.
    Unknown { reason: String },
}

impl ValidationResult {
    pub fn is_allow(&self) -> bool {
        matches!(self, ValidationResult::Allow)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, ValidationResult::Block { .. })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ValidationResult::Unknown { .. })
    }

    /// Wire status tag.
    pub fn status(&self) -> &'static str {
        match self {
            ValidationResult::Allow => "allow",
            ValidationResult::Block { .. } => "block",
            ValidationResult::Unknown { .. } => "unknown",
        }
    }

    /// The violated axiom, for `Block`.
    pub fn axiom(&self) -> Option<AxiomId> {
        match self {
            ValidationResult::Block { axiom, .. } => Some(*axiom),
            _ => None,
        }
    }
}

/// The ordered axiom list. First violation wins.
///
/// The set is fixed; there is no registration API.
pub struct AxiomValidator {
    axioms: Vec<Box<dyn Axiom>>,
}

impl AxiomValidator {
    /// AXM-006, AXM-008, AXM-009, AXM-015, in that order.
    pub fn standard() -> Self {
        Self {
            axioms: vec![
                Box::new(ConditionedOperationAxiom),
                Box::new(OperationalBoundednessAxiom),
                Box::new(PossibilityPreservationAxiom),
                Box::new(ViabilityAxiom),
            ],
        }
    }

    /// Evaluation order.
    pub fn axiom_ids(&self) -> Vec<AxiomId> {
        self.axioms.iter().map(|a| a.id()).collect()
    }

    pub fn validate(
        &self,
        operation: &Operation,
        state: &State,
        config: &Config,
    ) -> ValidationResult {
        for axiom in &self.axioms {
            if let Err(violation) = axiom.check(operation, state, config) {
                debug!(
                    axiom = %violation.axiom,
                    name = axiom.name(),
                    op_type = %operation.op_type,
                    reason = %violation.reason,
                    "Axiom violated"
                );
                return ValidationResult::Block {
                    axiom: violation.axiom,
                    reason: violation.reason,
                };
            }
        }

        if !config.is_known(operation) {
            return ValidationResult::Unknown {
                reason: format!("Unrecognised operation type '{}'", operation.op_type),
            };
        }

        ValidationResult::Allow
    }
}

impl Default for AxiomValidator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Validate against the standard axiom order.
pub fn validate(operation: &Operation, state: &State, config: &Config) -> ValidationResult {
    AxiomValidator::standard().validate(operation, state, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupled() -> State {
        State::nominal()
    }

    fn decoupled() -> State {
        let mut state = State::nominal();
        state.coupling.active = false;
        state
    }

    #[test]
    fn fixed_order() {
        assert_eq!(
            AxiomValidator::standard().axiom_ids(),
            vec![
                AxiomId::ConditionedOperation,
                AxiomId::OperationalBoundedness,
                AxiomId::PossibilityPreservation,
                AxiomId::Viability,
            ]
        );
    }

    #[test]
    fn coupling_rules() {
        let config = Config::default();
        let result = validate(&Operation::new("read"), &decoupled(), &config);
        assert_eq!(result.axiom(), Some(AxiomId::ConditionedOperation));
        assert_eq!(
            validate(&Operation::new("internal"), &decoupled(), &config),
            ValidationResult::Allow
        );
        assert_eq!(
            validate(&Operation::new("read"), &coupled(), &config),
            ValidationResult::Allow
        );
    }

    #[test]
    fn complexity_rules() {
        let config = Config::default();
        let heavy = Operation::new("read").with_complexity(2000.0);
        assert_eq!(
            validate(&heavy, &coupled(), &config).axiom(),
            Some(AxiomId::OperationalBoundedness)
        );
        let light = Operation::new("read").with_complexity(100.0);
        assert!(validate(&light, &coupled(), &config).is_allow());
    }

    #[test]
    fn every_harmful_pattern_blocks() {
        let config = Config::default();
        for pattern in &config.harmful_patterns {
            let result = validate(&Operation::new(pattern.as_str()), &coupled(), &config);
            assert_eq!(
                result.axiom(),
                Some(AxiomId::PossibilityPreservation),
                "{pattern}"
            );
        }
    }

    #[test]
    fn unrecognised_is_unknown() {
        let config = Config::default();
        let result = validate(&Operation::new("unknown"), &coupled(), &config);
        assert!(result.is_unknown());
        assert_eq!(result.status(), "unknown");
    }

    #[test]
    fn viability_rules() {
        let config = Config::default();
        let mut starving = coupled();
        starving.energy.current = 0.02;
        starving.energy.min = 0.01;
        starving.energy.threshold = 0.1;
        let op = Operation::new("compute").with_complexity(500.0);
        assert_eq!(
            validate(&op, &starving, &config).axiom(),
            Some(AxiomId::Viability)
        );

        let cheap = Operation::new("compute").with_complexity(1.0);
        assert!(validate(&cheap, &coupled(), &config).is_allow());
    }

    #[test]
    fn first_violation_wins() {
        let config = Config::default();
        // decoupled + too complex + harmful: coupling is checked first
        let op = Operation::new("force_overwrite").with_complexity(5000.0);
        assert_eq!(
            validate(&op, &decoupled(), &config).axiom(),
            Some(AxiomId::ConditionedOperation)
        );
        assert_eq!(
            validate(&op, &coupled(), &config).axiom(),
            Some(AxiomId::OperationalBoundedness)
        );
    }

    #[test]
    fn deterministic() {
        let config = Config::default();
        let op = Operation::new("query").with_complexity(10.0);
        let state = coupled();
        assert_eq!(
            validate(&op, &state, &config),
            validate(&op, &state, &config)
        );
    }

    #[test]
    fn result_wire_shape() {
        let block = ValidationResult::Block {
            axiom: AxiomId::Viability,
            reason: "low".into(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["status"], "block");
        assert_eq!(json["axiom"], "AXM-015");

        let allow = serde_json::to_value(ValidationResult::Allow).unwrap();
        assert_eq!(allow, serde_json::json!({"status": "allow"}));
    }
}
