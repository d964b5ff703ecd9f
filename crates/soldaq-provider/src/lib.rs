//! ---
//! daq_section: "04-provider-orchestration"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Device providers and the poll-cycle orchestrator."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
//! Provider layer: the capability trait implemented by device adapters, the
//! static adapter registry, and the orchestrator that drives one polling
//! cycle (resolve URL, fetch, flatten, calculate) per configured command.

use std::time::Duration;

use async_trait::async_trait;
use soldaq_calc::VariableMap;
use soldaq_common::config::ProviderConfig;

pub mod cycle;
pub mod emlog;
pub mod errors;
pub mod registry;

pub use cycle::{CommandFailure, CommandSpec, CycleReport, PollCycleOrchestrator};
pub use emlog::EmlogProvider;
pub use errors::PollError;
pub use registry::ProviderRegistry;

/// Connection settings for one device instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSetting {
    /// Hostname or address substituted into URL templates as `{host}`.
    pub host: String,
    /// Bound applied to every HTTP request against the device.
    pub request_timeout: Duration,
}

impl Default for ProviderSetting {
    fn default() -> Self {
        Self {
            host: "emlog".to_owned(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ProviderConfig> for ProviderSetting {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            host: config.host.clone(),
            request_timeout: config.request_timeout,
        }
    }
}

/// Default execution window and cadence for a provider's polling activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySchedule {
    /// First second of the day (inclusive) at which polling may run.
    pub start_second: u32,
    /// Last second of the day (inclusive) at which polling may run.
    pub end_second: u32,
    /// Interval between cycles.
    pub interval: Duration,
}

impl Default for ActivitySchedule {
    fn default() -> Self {
        // All day, every 20 seconds.
        Self {
            start_second: 0,
            end_second: 86_399,
            interval: Duration::from_secs(20),
        }
    }
}

/// Capability set implemented by device adapters.
///
/// The host lifecycle (scheduler, persistence, UI) stays external; it drives
/// an adapter through these entry points only.
#[async_trait]
pub trait DeviceProvider: Send + Sync {
    /// Stable identifier used for registry lookup and log scoping.
    fn device_type(&self) -> &'static str;

    /// Connection defaults for a freshly configured device of this type.
    fn default_setting(&self) -> ProviderSetting;

    /// Default polling window and cadence.
    fn default_activity(&self) -> ActivitySchedule;

    /// The configured command specs (URL pattern plus field rules).
    fn commands(&self) -> &[CommandSpec];

    /// One-shot connectivity check, returning a human-readable success
    /// message. Transport and protocol failures surface directly as the
    /// operation's outcome.
    async fn test_connection(&self) -> Result<String, PollError>;

    /// Run one polling cycle, accumulating derived variables into
    /// `variables`. Per-command failures are logged and reported, not
    /// propagated; an error is returned only when a cycle-level precondition
    /// (such as no reachable connection at all) cannot be established.
    async fn run_activity(&self, variables: &mut VariableMap) -> Result<bool, PollError>;
}
