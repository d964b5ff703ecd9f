//! ---
//! daq_section: "04-provider-orchestration"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Device providers and the poll-cycle orchestrator."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use soldaq_calc::{flatten_json, FieldRule, MapCalculator, VariableMap};
use soldaq_common::time::Clock;
use soldaq_device::{resolve_url, HttpFetcher, PlaceholderContext};
use tracing::{debug, warn};

use crate::errors::PollError;

/// One configured device request: a URL pattern template and the field rules
/// applied to its flattened response.
///
/// Loaded once from the provider's static field-definition resource and
/// immutable thereafter; the pattern string is the command's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// URL pattern with `{name}` placeholders (`{host}`, `{today}`).
    pub command: String,
    /// Ordered field rules consumed by the calculator.
    pub fields: Vec<FieldRule>,
}

/// Record of a single command's failure within an otherwise-continuing cycle.
#[derive(Debug)]
pub struct CommandFailure {
    /// The offending command's URL pattern.
    pub command: String,
    pub error: PollError,
}

/// Outcome of one polling cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Number of commands whose variables were merged into the shared map.
    pub succeeded: usize,
    /// Commands that failed, in execution order.
    pub failures: Vec<CommandFailure>,
}

impl CycleReport {
    /// True when every command contributed its variables.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when nothing succeeded and every failure was transport-level,
    /// i.e. the device looks unreachable as a whole.
    pub fn device_unreachable(&self) -> bool {
        self.succeeded == 0
            && !self.failures.is_empty()
            && self.failures.iter().all(|f| f.error.is_connection())
    }
}

/// Drives one polling cycle: per command, resolve the URL against the
/// current clock, fetch the JSON payload, flatten it, and apply the field
/// rules into the shared variable map.
pub struct PollCycleOrchestrator {
    fetcher: HttpFetcher,
    clock: Arc<dyn Clock>,
    host: String,
}

impl PollCycleOrchestrator {
    pub fn new(fetcher: HttpFetcher, clock: Arc<dyn Clock>, host: impl Into<String>) -> Self {
        Self {
            fetcher,
            clock,
            host: host.into(),
        }
    }

    /// Placeholder context for a resolution happening now. Built per call so
    /// the date token tracks the clock across midnight.
    pub fn placeholder_context(&self) -> PlaceholderContext {
        PlaceholderContext::standard(self.clock.as_ref(), &self.host)
    }

    /// Execute every command in order, continuing past per-command failures.
    ///
    /// Each command's rules see the variable map as it stood after the
    /// preceding commands; a failed command contributes nothing and never
    /// disturbs entries already written.
    pub async fn run_cycle(
        &self,
        commands: &[CommandSpec],
        variables: &mut VariableMap,
    ) -> CycleReport {
        let mut report = CycleReport::default();
        for spec in commands {
            match self.run_command(spec, variables).await {
                Ok(()) => report.succeeded += 1,
                Err(error) => {
                    warn!(command = %spec.command, error = %error, "command failed, continuing cycle");
                    report.failures.push(CommandFailure {
                        command: spec.command.clone(),
                        error,
                    });
                }
            }
        }
        debug!(
            succeeded = report.succeeded,
            failed = report.failures.len(),
            "polling cycle complete"
        );
        report
    }

    async fn run_command(
        &self,
        spec: &CommandSpec,
        variables: &mut VariableMap,
    ) -> Result<(), PollError> {
        let url = resolve_url(&spec.command, &self.placeholder_context())?;
        let body = self.fetcher.fetch(&url).await?;
        let flat = flatten_json(&body)?;
        MapCalculator::new().calculate(&flat, &spec.fields, variables)?;
        Ok(())
    }
}
