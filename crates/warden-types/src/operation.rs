use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A proposed state-changing operation.
///
/// `op_type` is an opaque tag matched against pattern lists. `complexity` is a
/// non-negative cost estimate; `None` means unspecified and is treated as 0.
/// Any other fields are carried through untouched in `extensions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub op_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<f64>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Operation {
    /// Create an operation with no complexity estimate.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            complexity: None,
            extensions: Map::new(),
        }
    }

    /// Set the complexity estimate.
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Attach an extension field.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Complexity with the absent case defaulted to 0.
    pub fn complexity_or_default(&self) -> f64 {
        self.complexity.unwrap_or(0.0)
    }

    /// Whether the caller explicitly marked this operation internal
    /// (`"internal": true`).
    pub fn marked_internal(&self) -> bool {
        matches!(self.extensions.get("internal"), Some(Value::Bool(true)))
    }
}
