use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_types::Operation;

/// Validator tunables. Supplied by the caller; never mutated by validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Upper bound on operation complexity (AXM-008)
    #[serde(default = "default_max_complexity")]
    pub max_complexity: f64,

    /// Operation type patterns that destroy recoverability (AXM-009)
    #[serde(default = "default_harmful_patterns")]
    pub harmful_patterns: BTreeSet<String>,

    /// Denials within the window that trigger the monitor (0 disables it)
    #[serde(default = "default_block_repeat_threshold")]
    pub block_repeat_threshold: u32,

    /// Rolling window for the monitor, in milliseconds
    #[serde(rename = "blockRepeatWindow", default = "default_block_repeat_window_ms")]
    pub block_repeat_window_ms: u64,

    /// Operation types classified internal (unaffected by decoupling)
    #[serde(default = "default_internal_types")]
    pub internal_types: BTreeSet<String>,

    /// Operation types recognised as explicitly safe
    #[serde(default = "default_known_types")]
    pub known_types: BTreeSet<String>,

    /// Energy consumed as a function of complexity (AXM-015)
    #[serde(default)]
    pub energy_cost: EnergyCostModel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_complexity: default_max_complexity(),
            harmful_patterns: default_harmful_patterns(),
            block_repeat_threshold: default_block_repeat_threshold(),
            block_repeat_window_ms: default_block_repeat_window_ms(),
            internal_types: default_internal_types(),
            known_types: default_known_types(),
            energy_cost: EnergyCostModel::default(),
        }
    }
}

impl Config {
    /// Internal if its type is listed or the caller marked it `internal: true`.
    pub fn is_internal(&self, operation: &Operation) -> bool {
        operation.marked_internal() || self.internal_types.contains(&operation.op_type)
    }

    /// Recognised by a positive rule.
    pub fn is_known(&self, operation: &Operation) -> bool {
        self.is_internal(operation) || self.known_types.contains(&operation.op_type)
    }

    /// The first harmful pattern the operation type matches, if any.
    ///
    /// Case-insensitive; a type matches when it contains the pattern.
    pub fn harmful_match(&self, op_type: &str) -> Option<&str> {
        let op_type = op_type.to_lowercase();
        self.harmful_patterns
            .iter()
            .find(|p| !p.is_empty() && op_type.contains(&p.to_lowercase()))
            .map(String::as_str)
    }
}

/// Monotone cost model mapping complexity to energy consumption.
///
/// Negative parameters are clamped to zero so cost never decreases as
/// complexity grows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum EnergyCostModel {
    /// `base + per_unit * complexity`
    Linear { base: f64, per_unit: f64 },
    /// `base + coefficient * complexity^2`
    Quadratic { base: f64, coefficient: f64 },
}

impl Default for EnergyCostModel {
    fn default() -> Self {
        EnergyCostModel::Linear {
            base: 0.0,
            per_unit: 0.0001,
        }
    }
}

impl EnergyCostModel {
    pub fn cost(&self, complexity: f64) -> f64 {
        let c = complexity.max(0.0);
        match self {
            EnergyCostModel::Linear { base, per_unit } => base.max(0.0) + per_unit.max(0.0) * c,
            EnergyCostModel::Quadratic { base, coefficient } => {
                base.max(0.0) + coefficient.max(0.0) * c * c
            }
        }
    }
}

// Default value helpers
fn default_max_complexity() -> f64 {
    1000.0
}

fn default_harmful_patterns() -> BTreeSet<String> {
    [
        "delete_without_backup",
        "force_overwrite",
        "remove_permissions",
        "block_access",
        "reduce_options",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_block_repeat_threshold() -> u32 {
    5
}

fn default_block_repeat_window_ms() -> u64 {
    300_000
}

fn default_internal_types() -> BTreeSet<String> {
    ["internal"].into_iter().map(String::from).collect()
}

fn default_known_types() -> BTreeSet<String> {
    [
        "read", "query", "observe", "compute", "respond", "log", "write", "create", "update",
        "backup",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
