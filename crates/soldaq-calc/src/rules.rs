//! ---
//! daq_section: "03-calculation"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "JSON flattening and rule-driven field calculation."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// Declarative instruction mapping a flattened source key to a named output
/// variable, with an optional numeric transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Key in the flattened payload map.
    pub source: String,
    /// Output variable name written into the cycle's variable map.
    pub target: String,
    /// Optional conversion applied on the way through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl FieldRule {
    /// Straight copy rule without a transform.
    pub fn copy(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transform: None,
        }
    }
}

/// Numeric conversions available to field rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Transform {
    /// Multiply by a fixed factor (unit conversion, e.g. Wh -> kWh).
    Scale { factor: f64 },
    /// Add a fixed amount (zero-point correction).
    Offset { amount: f64 },
    /// Round to the given number of decimal places.
    Round { decimals: u32 },
}

impl Transform {
    /// Apply the conversion to a numeric input.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Transform::Scale { factor } => value * factor,
            Transform::Offset { amount } => value + amount,
            Transform::Round { decimals } => {
                let scale = 10f64.powi(*decimals as i32);
                (value * scale).round() / scale
            }
        }
    }
}
