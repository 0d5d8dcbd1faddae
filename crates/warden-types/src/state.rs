use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The agent's current condition. Read-only input to validation.
///
/// `identity`, `session`, `human`, `important` and any other top-level
/// fields are opaque passthrough context, kept in `context`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub coupling: Coupling,
    pub energy: Energy,
    pub lyapunov: Lyapunov,
    pub integrity: Integrity,
    pub memory: Memory,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

/// Whether the agent currently operates under supervision by a partner.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    pub active: bool,
    #[serde(default)]
    pub partner: Option<String>,
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
}

/// Depletable resource.
///
/// `min` is the absolute viability floor; `threshold` is a soft warning level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub current: f64,
    pub min: f64,
    pub threshold: f64,
}

/// Scalar distance-to-equilibrium measure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lyapunov {
    #[serde(rename = "V")]
    pub v: f64,
    #[serde(rename = "V_previous", default)]
    pub v_previous: Option<f64>,
}

impl Lyapunov {
    /// Monotone descent: `V` did not increase since the previous committed
    /// transition. Vacuously true with no previous value.
    pub fn is_descending(&self) -> bool {
        match self.v_previous {
            Some(prev) => self.v <= prev,
            None => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Integrity {
    pub invariant_violations: u32,
    pub status: String,
}

/// Chain tail pointer as seen by the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub event_count: u64,
    pub last_event_hash: String,
}

impl State {
    /// A healthy, coupled state with full energy at rest.
    pub fn nominal() -> Self {
        Self {
            coupling: Coupling {
                active: true,
                partner: None,
                since: None,
            },
            energy: Energy {
                current: 1.0,
                min: 0.01,
                threshold: 0.1,
            },
            lyapunov: Lyapunov {
                v: 0.0,
                v_previous: None,
            },
            integrity: Integrity {
                invariant_violations: 0,
                status: "ok".into(),
            },
            memory: Memory {
                event_count: 0,
                last_event_hash: String::new(),
            },
            context: Map::new(),
        }
    }
}
