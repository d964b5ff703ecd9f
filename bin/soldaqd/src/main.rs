//! ---
//! daq_section: "01-core-functionality"
//! daq_subsection: "binary"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Binary entrypoint for the SOLDAQ daemon."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soldaq_calc::VariableMap;
use soldaq_common::config::AppConfig;
use soldaq_common::logging::init_tracing;
use soldaq_common::time::SystemClock;
use soldaq_provider::{DeviceProvider, ProviderRegistry, ProviderSetting};
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "SOLDAQ polling daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "HOST", help = "Override the configured device host")]
    host: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the polling scheduler")]
    Run,
    #[command(about = "Probe the device once and report reachability")]
    TestConnection,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/soldaq.toml"));
    candidates.push(PathBuf::from("configs/example.dev.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(host) = cli.host {
        config.provider.host = host;
    }
    init_tracing("soldaqd", &config.logging)?;
    info!(config_path = %loaded.source.display(), device_type = %config.provider.device_type, "configuration loaded");

    let registry = ProviderRegistry::with_builtin();
    let provider = registry
        .build(
            &config.provider.device_type,
            ProviderSetting::from(&config.provider),
            Arc::new(SystemClock),
        )
        .with_context(|| {
            format!(
                "unable to initialise provider `{}` (available: {})",
                config.provider.device_type,
                registry.device_types().join(", ")
            )
        })?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_scheduler(&config, provider.as_ref()).await,
        Commands::TestConnection => {
            let message = provider
                .test_connection()
                .await
                .context("connectivity test failed")?;
            println!("{message}");
            Ok(())
        }
    }
}

/// Drive the provider's polling activity until ctrl-c.
///
/// Each tick owns a fresh variable map; what downstream consumers do with it
/// is outside this daemon, so for now the derived variables are logged.
async fn run_scheduler(config: &AppConfig, provider: &dyn DeviceProvider) -> Result<()> {
    let interval = config
        .provider
        .poll_interval
        .unwrap_or(provider.default_activity().interval);
    info!(device_type = provider.device_type(), interval_secs = interval.as_secs(), "scheduler started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut variables = VariableMap::new();
                match provider.run_activity(&mut variables).await {
                    Ok(_) => {
                        info!(variables = variables.len(), "polling cycle finished");
                        for (name, value) in &variables {
                            info!(variable = %name, value = ?value, "derived variable");
                        }
                    }
                    Err(err) => error!(error = %err, "polling cycle failed"),
                }
            }
            _ = signal::ctrl_c() => {
                warn!("shutdown signal received, stopping scheduler");
                break;
            }
        }
    }
    Ok(())
}
