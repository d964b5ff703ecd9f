//! ---
//! daq_section: "04-provider-orchestration"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Device providers and the poll-cycle orchestrator."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use soldaq_calc::CalcError;
use soldaq_device::{FetchError, TemplateError};
use thiserror::Error;

/// Errors surfaced by the provider layer.
///
/// Template and field-definition problems are configuration defects; fetch
/// and calculation failures are scoped to a single command within a cycle.
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("no registered provider for device type `{0}`")]
    UnknownDeviceType(String),
    #[error("embedded field definitions for `{device_type}` are invalid")]
    FieldDefinitions {
        device_type: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("device unreachable: all {attempted} commands failed at the transport level")]
    DeviceUnreachable { attempted: usize },
}

impl PollError {
    /// Whether this failure happened at the network transport level.
    pub fn is_connection(&self) -> bool {
        matches!(self, PollError::Fetch(FetchError::Connection { .. }))
    }
}
