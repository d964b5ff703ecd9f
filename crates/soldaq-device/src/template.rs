//! ---
//! daq_section: "02-device-access"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Device URL templating and HTTP access."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use std::collections::HashMap;

use soldaq_common::time::Clock;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors raised while turning a URL pattern into a concrete URL.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A `{name}` token referenced a placeholder the context does not supply.
    #[error("unresolved placeholder `{{{name}}}` in pattern `{pattern}`")]
    UnresolvedPlaceholder { name: String, pattern: String },
    /// An opening brace without a matching closing brace.
    #[error("unbalanced placeholder braces in pattern `{pattern}`")]
    UnbalancedBraces { pattern: String },
    /// The substituted string is not a well-formed absolute URL.
    #[error("substituted pattern `{resolved}` is not a valid url")]
    MalformedUrl {
        resolved: String,
        #[source]
        source: url::ParseError,
    },
}

/// Named substitution values for one URL resolution.
///
/// Built fresh per resolution so the `today` token always reflects the date
/// in effect at call time, even for polls crossing midnight.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderContext {
    values: HashMap<String, String>,
}

impl PlaceholderContext {
    /// Empty context; mostly useful in tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard polling context: `today` from the clock (compact `yyyymmdd`)
    /// and `host` from the provider setting.
    pub fn standard(clock: &dyn Clock, host: &str) -> Self {
        let mut context = Self::new();
        context.insert("today", clock.today_compact());
        context.insert("host", host.to_owned());
        context
    }

    /// Register a substitution value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a substitution value by placeholder name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Substitute every `{name}` token in `pattern` and parse the result as an
/// absolute URL.
///
/// Resolution fails closed: a referenced-but-missing placeholder is an error,
/// never a literal `{name}` left in the emitted URL.
pub fn resolve_url(pattern: &str, context: &PlaceholderContext) -> Result<Url, TemplateError> {
    let mut resolved = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find('{') {
        resolved.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| TemplateError::UnbalancedBraces {
                pattern: pattern.to_owned(),
            })?;
        let name = &after[..end];
        let value = context
            .get(name)
            .ok_or_else(|| TemplateError::UnresolvedPlaceholder {
                name: name.to_owned(),
                pattern: pattern.to_owned(),
            })?;
        resolved.push_str(value);
        rest = &after[end + 1..];
    }
    resolved.push_str(rest);

    debug!(url = %resolved, "resolved request url");
    Url::parse(&resolved).map_err(|source| TemplateError::MalformedUrl { resolved, source })
}
