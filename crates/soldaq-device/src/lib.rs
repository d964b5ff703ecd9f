//! ---
//! daq_section: "02-device-access"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Device URL templating and HTTP access."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
//! Device access layer: resolves templated request URLs against the current
//! clock and configuration, and fetches JSON payloads from embedded device
//! web endpoints.

pub mod fetch;
pub mod template;

pub use fetch::{FetchError, HttpFetcher, CONTENT_TYPE_JSON};
pub use template::{resolve_url, PlaceholderContext, TemplateError};
