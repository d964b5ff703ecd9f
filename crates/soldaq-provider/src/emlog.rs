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

use async_trait::async_trait;
use soldaq_calc::VariableMap;
use soldaq_common::time::Clock;
use soldaq_device::{resolve_url, HttpFetcher, CONTENT_TYPE_JSON};
use tracing::{debug, info};

use crate::cycle::{CommandSpec, PollCycleOrchestrator};
use crate::errors::PollError;
use crate::{ActivitySchedule, DeviceProvider, ProviderSetting};

const EMLOG_DEVICE_TYPE: &str = "emlog";
const EMLOG_BASE_URL: &str =
    "http://{host}/pages/getinformation.php?heute&datum={today}&meterindex=1";
const EMLOG_FIELDS: &str = include_str!("../resources/emlog_fields.json");
const CONNECTION_SUCCESSFUL: &str = "emlog connection successful";

/// HTTP provider for EMLOG energy-metering devices.
///
/// Polls the device's `getinformation.php` endpoint with a date-templated
/// query and derives power and energy-total variables from the JSON answer.
pub struct EmlogProvider {
    setting: ProviderSetting,
    commands: Vec<CommandSpec>,
    orchestrator: PollCycleOrchestrator,
}

impl EmlogProvider {
    /// Build a provider for the given connection setting and clock.
    pub fn new(setting: ProviderSetting, clock: Arc<dyn Clock>) -> Result<Self, PollError> {
        let commands = serde_json::from_str::<Vec<CommandSpec>>(EMLOG_FIELDS).map_err(
            |source| PollError::FieldDefinitions {
                device_type: EMLOG_DEVICE_TYPE,
                source,
            },
        )?;
        Self::with_commands(setting, clock, commands)
    }

    /// Build a provider with explicit command specs; the seam used by tests
    /// and by hosts that override the shipped field definitions.
    pub fn with_commands(
        setting: ProviderSetting,
        clock: Arc<dyn Clock>,
        commands: Vec<CommandSpec>,
    ) -> Result<Self, PollError> {
        let fetcher = HttpFetcher::new(setting.request_timeout)?;
        let orchestrator = PollCycleOrchestrator::new(fetcher, clock, setting.host.clone());
        debug!(device_type = EMLOG_DEVICE_TYPE, host = %setting.host, commands = commands.len(), "provider instantiated");
        Ok(Self {
            setting,
            commands,
            orchestrator,
        })
    }
}

#[async_trait]
impl DeviceProvider for EmlogProvider {
    fn device_type(&self) -> &'static str {
        EMLOG_DEVICE_TYPE
    }

    fn default_setting(&self) -> ProviderSetting {
        ProviderSetting::default()
    }

    fn default_activity(&self) -> ActivitySchedule {
        ActivitySchedule::default()
    }

    fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    async fn test_connection(&self) -> Result<String, PollError> {
        let url = resolve_url(EMLOG_BASE_URL, &self.orchestrator.placeholder_context())?;
        let fetcher = HttpFetcher::new(self.setting.request_timeout)?;
        fetcher.probe(&url, CONTENT_TYPE_JSON).await?;
        info!(device_type = EMLOG_DEVICE_TYPE, url = %url, "connectivity test passed");
        Ok(CONNECTION_SUCCESSFUL.to_owned())
    }

    async fn run_activity(&self, variables: &mut VariableMap) -> Result<bool, PollError> {
        let report = self.orchestrator.run_cycle(&self.commands, variables).await;
        if report.device_unreachable() {
            return Err(PollError::DeviceUnreachable {
                attempted: report.failures.len(),
            });
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::{FixedOffset, TimeZone};
    use soldaq_common::time::FixedClock;
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2025, 1, 15, 8, 0, 0)
                .unwrap(),
        ))
    }

    async fn spawn_emlog_device() -> String {
        let router = Router::new().route(
            "/pages/getinformation.php",
            get(|| async {
                Json(serde_json::json!({
                    "Leistung170": 412.5,
                    "Leistung270": 0.0,
                    "ZaehlerstandHT": 8_421_337.0,
                    "TagesverbrauchHeute": 6_540.0
                }))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr.to_string()
    }

    fn setting_for(host: String) -> ProviderSetting {
        ProviderSetting {
            host,
            request_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn embedded_field_definitions_parse() {
        let provider =
            EmlogProvider::new(ProviderSetting::default(), fixed_clock()).unwrap();
        assert_eq!(provider.device_type(), "emlog");
        assert_eq!(provider.commands().len(), 1);
        assert!(provider.commands()[0].command.contains("{today}"));
        assert_eq!(provider.default_setting().host, "emlog");
        assert_eq!(
            provider.default_activity().interval,
            Duration::from_secs(20)
        );
    }

    #[tokio::test]
    async fn run_activity_derives_emlog_variables() {
        let host = spawn_emlog_device().await;
        let provider = EmlogProvider::new(setting_for(host), fixed_clock()).unwrap();

        let mut variables = VariableMap::new();
        let completed = provider.run_activity(&mut variables).await.unwrap();

        assert!(completed);
        assert_eq!(
            variables.get("currentPowerWatts").and_then(|v| v.as_number()),
            Some(412.5)
        );
        let total = variables
            .get("energyTotalKwh")
            .and_then(|v| v.as_number())
            .unwrap();
        assert!((total - 8_421.337).abs() < 1e-6);
        let today = variables
            .get("energyTodayKwh")
            .and_then(|v| v.as_number())
            .unwrap();
        assert!((today - 6.54).abs() < 1e-9);
    }

    #[tokio::test]
    async fn run_activity_fails_when_the_device_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = listener.local_addr().unwrap().to_string();
        drop(listener);

        let provider = EmlogProvider::new(setting_for(dead), fixed_clock()).unwrap();
        let mut variables = VariableMap::new();
        let err = provider.run_activity(&mut variables).await.unwrap_err();
        assert!(matches!(err, PollError::DeviceUnreachable { .. }));
        assert!(variables.is_empty());
    }

    #[tokio::test]
    async fn test_connection_reports_success_against_a_json_endpoint() {
        let host = spawn_emlog_device().await;
        let provider = EmlogProvider::new(setting_for(host), fixed_clock()).unwrap();
        let message = provider.test_connection().await.unwrap();
        assert_eq!(message, "emlog connection successful");
    }

    #[tokio::test]
    async fn test_connection_surfaces_connection_errors() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = listener.local_addr().unwrap().to_string();
        drop(listener);

        let provider = EmlogProvider::new(setting_for(dead), fixed_clock()).unwrap();
        let err = provider.test_connection().await.unwrap_err();
        assert!(err.is_connection());
    }
}
