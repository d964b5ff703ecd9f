//! ---
//! daq_section: "03-calculation"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "JSON flattening and rule-driven field calculation."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use tracing::debug;

use crate::errors::CalcError;
use crate::rules::FieldRule;
use crate::variables::{VariableMap, VariableValue};

/// Applies an ordered list of field rules to a flattened payload map.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapCalculator;

impl MapCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Derive output variables from `flat` according to `rules` and merge
    /// them into `variables`.
    ///
    /// Commit is all-or-nothing: results are staged first and merged only
    /// when every rule succeeded, so a failing rule never corrupts entries
    /// written by earlier commands in the same cycle.
    pub fn calculate(
        &self,
        flat: &VariableMap,
        rules: &[FieldRule],
        variables: &mut VariableMap,
    ) -> Result<(), CalcError> {
        let mut staged = VariableMap::with_capacity(rules.len());
        for rule in rules {
            let value = flat
                .get(&rule.source)
                .ok_or_else(|| CalcError::MissingSource(rule.source.clone()))?;
            let derived = match rule.transform {
                None => value.clone(),
                Some(transform) => {
                    let number =
                        value
                            .as_number()
                            .ok_or_else(|| CalcError::TypeMismatch {
                                key: rule.source.clone(),
                                actual: value.kind().to_owned(),
                            })?;
                    VariableValue::Number(transform.apply(number))
                }
            };
            staged.insert(rule.target.clone(), derived);
        }
        debug!(derived = staged.len(), "field calculation complete");
        variables.extend(staged);
        Ok(())
    }
}
