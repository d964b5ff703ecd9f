//! ---
//! daq_section: "03-calculation"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "JSON flattening and rule-driven field calculation."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-cycle accumulator of derived, named measurement values.
///
/// Created fresh by the caller for each polling cycle and threaded mutably
/// through the pipeline; insertion order is preserved for downstream
/// consumers.
pub type VariableMap = IndexMap<String, VariableValue>;

/// A typed measurement value produced by the calculation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl VariableValue {
    /// Numeric view of the value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VariableValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short description of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            VariableValue::Number(_) => "a number",
            VariableValue::Text(_) => "a string",
            VariableValue::Bool(_) => "a boolean",
        }
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Number(value)
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        VariableValue::Bool(value)
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Text(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_untagged_scalars() {
        let mut map = VariableMap::new();
        map.insert("power".into(), VariableValue::Number(123.4));
        map.insert("online".into(), VariableValue::Bool(true));
        map.insert("meter".into(), VariableValue::from("emlog"));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"power":123.4,"online":true,"meter":"emlog"}"#);
    }
}
