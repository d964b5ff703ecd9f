//! ---
//! daq_section: "05-testing-qa"
//! daq_subsection: "integration-tests"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Integration and validation tests for the SOLDAQ stack."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
//! End-to-end polling cycles against a fake emlog device served by axum.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::RawQuery;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{FixedOffset, TimeZone};
use soldaq_calc::{FieldRule, VariableMap, VariableValue};
use soldaq_common::time::{Clock, FixedClock};
use soldaq_provider::{
    CommandSpec, DeviceProvider, EmlogProvider, ProviderRegistry, ProviderSetting,
};
use tokio::net::TcpListener;

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
            .unwrap(),
    ))
}

fn setting_for(host: String) -> ProviderSetting {
    ProviderSetting {
        host,
        request_timeout: Duration::from_secs(2),
    }
}

static SEEN_DATUM: AtomicUsize = AtomicUsize::new(0);

async fn spawn_fake_emlog() -> String {
    let router = Router::new()
        .route(
            "/pages/getinformation.php",
            get(|RawQuery(query): RawQuery| async move {
                // The daemon must send the compact current date, not the
                // literal placeholder.
                let query = query.unwrap_or_default();
                assert!(!query.contains('{'), "unresolved placeholder in {query}");
                if query.contains("datum=20250115") {
                    SEEN_DATUM.fetch_add(1, Ordering::SeqCst);
                }
                Json(serde_json::json!({
                    "Leistung170": 412.5,
                    "Leistung270": 0.0,
                    "ZaehlerstandHT": 8421337.0,
                    "TagesverbrauchHeute": 6540.0,
                    "Zaehler": { "Index": 1 }
                }))
            }),
        )
        .route(
            "/pages/garbage.php",
            get(|| async { "<html>not json</html>" }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr.to_string()
}

#[tokio::test]
async fn registry_built_provider_runs_a_full_cycle() {
    let host = spawn_fake_emlog().await;
    let registry = ProviderRegistry::with_builtin();
    let provider = registry
        .build("emlog", setting_for(host), fixed_clock())
        .unwrap();

    let mut variables = VariableMap::new();
    variables.insert("unrelated".into(), VariableValue::from("kept"));

    let completed = provider.run_activity(&mut variables).await.unwrap();
    assert!(completed);
    assert!(SEEN_DATUM.load(Ordering::SeqCst) >= 1);

    assert_eq!(
        variables.get("currentPowerWatts"),
        Some(&VariableValue::Number(412.5))
    );
    let total = variables
        .get("energyTotalKwh")
        .and_then(|v| v.as_number())
        .unwrap();
    assert!((total - 8421.337).abs() < 1e-6);
    assert_eq!(variables.get("unrelated"), Some(&VariableValue::from("kept")));
}

#[tokio::test]
async fn parse_failure_in_one_command_spares_the_others() {
    let host = spawn_fake_emlog().await;
    let commands = vec![
        CommandSpec {
            command: "http://{host}/pages/garbage.php?datum={today}".into(),
            fields: vec![FieldRule::copy("anything", "neverWritten")],
        },
        CommandSpec {
            command: "http://{host}/pages/getinformation.php?heute&datum={today}&meterindex=1"
                .into(),
            fields: vec![FieldRule::copy("Leistung170", "currentPowerWatts")],
        },
    ];
    let provider =
        EmlogProvider::with_commands(setting_for(host), fixed_clock(), commands).unwrap();

    let mut variables = VariableMap::new();
    let completed = provider.run_activity(&mut variables).await.unwrap();

    assert!(completed);
    assert!(variables.get("neverWritten").is_none());
    assert_eq!(
        variables.get("currentPowerWatts"),
        Some(&VariableValue::Number(412.5))
    );
}

#[tokio::test]
async fn connectivity_test_round_trip() {
    let host = spawn_fake_emlog().await;
    let provider = EmlogProvider::new(setting_for(host), fixed_clock()).unwrap();
    let message = provider.test_connection().await.unwrap();
    assert!(message.contains("successful"));
}
