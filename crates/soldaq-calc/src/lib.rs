//! ---
//! daq_section: "03-calculation"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "JSON flattening and rule-driven field calculation."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
//! Calculation layer: flattens device JSON payloads into a single-level
//! key/value map and applies declarative field rules to derive named output
//! variables for one polling cycle.

pub mod calculator;
pub mod errors;
pub mod flatten;
pub mod rules;
pub mod variables;

pub use calculator::MapCalculator;
pub use errors::CalcError;
pub use flatten::flatten_json;
pub use rules::{FieldRule, Transform};
pub use variables::{VariableMap, VariableValue};
