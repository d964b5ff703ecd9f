//! ---
//! daq_section: "03-calculation"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "JSON flattening and rule-driven field calculation."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use serde_json::Value;

use crate::errors::CalcError;
use crate::variables::{VariableMap, VariableValue};

/// Parse a JSON document and flatten it into a single-level key/value map.
///
/// Nested object keys are joined with `_`, array elements carry their index
/// (`readings_0`), and `null` entries are skipped. Scalars become typed
/// [`VariableValue`]s.
pub fn flatten_json(text: &str) -> Result<VariableMap, CalcError> {
    let document: Value = serde_json::from_str(text)?;
    let mut flat = VariableMap::new();
    flatten_value("", &document, &mut flat);
    Ok(flat)
}

fn flatten_value(prefix: &str, value: &Value, flat: &mut VariableMap) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = join_key(prefix, key);
                flatten_value(&path, child, flat);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let path = join_key(prefix, &index.to_string());
                flatten_value(&path, child, flat);
            }
        }
        Value::Null => {}
        Value::Bool(b) => {
            flat.insert(prefix.to_owned(), VariableValue::Bool(*b));
        }
        Value::Number(n) => {
            if let Some(n) = n.as_f64() {
                flat.insert(prefix.to_owned(), VariableValue::Number(n));
            }
        }
        Value::String(s) => {
            flat.insert(prefix.to_owned(), VariableValue::Text(s.clone()));
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}_{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_objects_with_underscore_keys() {
        let flat = flatten_json(r#"{"power": 123.4, "nested": {"a": 1}}"#).unwrap();
        assert_eq!(flat.get("power"), Some(&VariableValue::Number(123.4)));
        assert_eq!(flat.get("nested_a"), Some(&VariableValue::Number(1.0)));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn flattens_arrays_with_index_suffix() {
        let flat = flatten_json(r#"{"readings": [10, 20], "meta": {"ok": true}}"#).unwrap();
        assert_eq!(flat.get("readings_0"), Some(&VariableValue::Number(10.0)));
        assert_eq!(flat.get("readings_1"), Some(&VariableValue::Number(20.0)));
        assert_eq!(flat.get("meta_ok"), Some(&VariableValue::Bool(true)));
    }

    #[test]
    fn null_entries_are_skipped() {
        let flat = flatten_json(r#"{"a": null, "b": "x"}"#).unwrap();
        assert!(flat.get("a").is_none());
        assert_eq!(flat.get("b"), Some(&VariableValue::from("x")));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = flatten_json("not json").unwrap_err();
        assert!(matches!(err, CalcError::Parse(_)));
    }
}
