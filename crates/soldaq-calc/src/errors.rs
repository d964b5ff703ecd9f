//! ---
//! daq_section: "03-calculation"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "JSON flattening and rule-driven field calculation."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use thiserror::Error;

/// Errors raised while flattening a payload or applying field rules.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("response body is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("field rule references missing source key `{0}`")]
    MissingSource(String),
    #[error("source key `{key}` holds {actual}, expected a numeric value")]
    TypeMismatch { key: String, actual: String },
}
