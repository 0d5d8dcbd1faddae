use serde::{Deserialize, Serialize};
use warden_types::{Operation, State};

use crate::config::Config;

/// Axiom identifiers. Serialized as their `AXM-###` codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AxiomId {
    #[serde(rename = "AXM-006")]
    ConditionedOperation,
    #[serde(rename = "AXM-008")]
    OperationalBoundedness,
    #[serde(rename = "AXM-009")]
    PossibilityPreservation,
    /// Fail-closed treatment of unclassifiable operations (applied by the guard).
    #[serde(rename = "AXM-011")]
    ConservativeDefault,
    #[serde(rename = "AXM-015")]
    Viability,
}

impl AxiomId {
    pub fn code(&self) -> &'static str {
        match self {
            AxiomId::ConditionedOperation => "AXM-006",
            AxiomId::OperationalBoundedness => "AXM-008",
            AxiomId::PossibilityPreservation => "AXM-009",
            AxiomId::ConservativeDefault => "AXM-011",
            AxiomId::Viability => "AXM-015",
        }
    }
}

impl std::fmt::Display for AxiomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A violated axiom and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxiomViolation {
    pub axiom: AxiomId,
    pub reason: String,
}

/// One behavioral axiom.
///
/// Checks are pure: same operation, state and config, same answer.
pub trait Axiom: Send + Sync {
    fn id(&self) -> AxiomId;

    /// Human-readable name.
    fn name(&self) -> &str;

    fn check(
        &self,
        operation: &Operation,
        state: &State,
        config: &Config,
    ) -> Result<(), AxiomViolation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_codes() {
        assert_eq!(
            serde_json::to_string(&AxiomId::Viability).unwrap(),
            "\"AXM-015\""
        );
        let id: AxiomId = serde_json::from_str("\"AXM-006\"").unwrap();
        assert_eq!(id, AxiomId::ConditionedOperation);
        assert_eq!(AxiomId::PossibilityPreservation.to_string(), "AXM-009");
    }
}
