//! ---
//! daq_section: "04-provider-orchestration"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Device providers and the poll-cycle orchestrator."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use std::collections::HashMap;
use std::sync::Arc;

use soldaq_common::time::Clock;

use crate::emlog::EmlogProvider;
use crate::errors::PollError;
use crate::{DeviceProvider, ProviderSetting};

type ProviderBuilder =
    fn(ProviderSetting, Arc<dyn Clock>) -> Result<Box<dyn DeviceProvider>, PollError>;

/// Static registry mapping device-type identifiers to adapter constructors.
pub struct ProviderRegistry {
    builders: HashMap<&'static str, ProviderBuilder>,
}

impl ProviderRegistry {
    /// Registry preloaded with the adapters shipped in this workspace.
    pub fn with_builtin() -> Self {
        let mut registry = Self {
            builders: HashMap::new(),
        };
        registry.register("emlog", |setting, clock| {
            EmlogProvider::new(setting, clock).map(|p| Box::new(p) as Box<dyn DeviceProvider>)
        });
        registry
    }

    /// Register an adapter constructor under a device-type identifier.
    pub fn register(&mut self, device_type: &'static str, builder: ProviderBuilder) {
        self.builders.insert(device_type, builder);
    }

    /// Instantiate the adapter registered for `device_type`.
    pub fn build(
        &self,
        device_type: &str,
        setting: ProviderSetting,
        clock: Arc<dyn Clock>,
    ) -> Result<Box<dyn DeviceProvider>, PollError> {
        let builder = self
            .builders
            .get(device_type)
            .ok_or_else(|| PollError::UnknownDeviceType(device_type.to_owned()))?;
        builder(setting, clock)
    }

    /// Identifiers available in this registry, sorted for stable output.
    pub fn device_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.builders.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soldaq_common::time::SystemClock;

    #[test]
    fn builtin_registry_builds_the_emlog_adapter() {
        let registry = ProviderRegistry::with_builtin();
        assert_eq!(registry.device_types(), vec!["emlog"]);
        let provider = registry
            .build("emlog", ProviderSetting::default(), Arc::new(SystemClock))
            .unwrap();
        assert_eq!(provider.device_type(), "emlog");
    }

    #[test]
    fn unknown_device_type_is_rejected() {
        let registry = ProviderRegistry::with_builtin();
        let Err(err) =
            registry.build("fronius", ProviderSetting::default(), Arc::new(SystemClock))
        else {
            panic!("expected an error for an unknown device type");
        };
        assert!(matches!(err, PollError::UnknownDeviceType(name) if name == "fronius"));
    }
}
