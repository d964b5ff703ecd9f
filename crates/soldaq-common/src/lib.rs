//! ---
//! daq_section: "01-core-functionality"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Shared primitives and utilities for the polling runtime."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
//! Core shared primitives for the SOLDAQ workspace.
//! This crate exposes configuration loading, logging bootstrap, and the
//! clock abstraction consumed across the workspace.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{AppConfig, LoadedAppConfig, LoggingConfig, ProviderConfig};
pub use logging::{init_tracing, LogFormat};
pub use time::{Clock, FixedClock, SystemClock};
