//! Burn engine monitoring service entry point.
//!
//! Loads the settings file, connects to the chain node, wires the notification
//! channels and runs the block watcher until Ctrl+C. The query flags print a
//! single aggregate report and exit without starting the watcher.
//!
//! # Flow
//! 1. Loads environment variables and applies CLI overrides
//! 2. Loads and validates the settings file
//! 3. Initializes the chain client and services
//! 4. Runs a one-shot query, or starts the watcher and the metrics server
//! 5. Handles graceful shutdown on Ctrl+C

use burn_monitor::{
	bootstrap::{create_block_watcher, initialize_services, Result},
	models::{ConfigLoader, MonitorSettings},
	services::blockchain::{BlockChainClient, EvmClient},
	utils::{
		constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH},
		logging::setup_logging,
		metrics::server::create_metrics_server,
	},
};

use clap::{Arg, ArgMatches, Command};
use dotenvy::dotenv;
use std::env::{set_var, var};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// One-shot aggregate reports selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Query {
	TotalBurned,
	LastBurns,
	EngineBalance,
}

fn requested_query(matches: &ArgMatches) -> Option<Query> {
	if matches.get_flag("total-burned") {
		Some(Query::TotalBurned)
	} else if matches.get_flag("last-burns") {
		Some(Query::LastBurns)
	} else if matches.get_flag("engine-balance") {
		Some(Query::EngineBalance)
	} else {
		None
	}
}

/// Resolves the settings path: CLI flag, then environment, then default
fn config_path(matches: &ArgMatches) -> PathBuf {
	matches
		.get_one::<String>("config")
		.cloned()
		.or_else(|| var(CONFIG_PATH_ENV).ok())
		.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
		.into()
}

fn build_cli() -> Command {
	Command::new("burn-monitor")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Watches a token's burn engine for deposits and burns and broadcasts each event to \
			 the configured messaging channels.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the settings file (default: config/burn_monitor.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("log-file")
				.long("log-file")
				.help("Write logs to file instead of stdout")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("log-path")
				.long("log-path")
				.help("Path to store log files (default: logs/)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("metrics-address")
				.long("metrics-address")
				.help("Address to start the metrics server on (default: 127.0.0.1:8081)")
				.value_name("HOST:PORT"),
		)
		.arg(
			Arg::new("metrics")
				.long("metrics")
				.help("Enable metrics server")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("total-burned")
				.long("total-burned")
				.help("Print the burn totals and exit")
				.action(clap::ArgAction::SetTrue)
				.conflicts_with_all(["last-burns", "engine-balance"]),
		)
		.arg(
			Arg::new("last-burns")
				.long("last-burns")
				.help("Print the five most recent burns and exit")
				.action(clap::ArgAction::SetTrue)
				.conflicts_with("engine-balance"),
		)
		.arg(
			Arg::new("engine-balance")
				.long("engine-balance")
				.help("Print the current burn engine balance and exit")
				.action(clap::ArgAction::SetTrue),
		)
}

/// Main entry point for the burn monitoring service.
///
/// # Errors
/// Returns an error if the settings cannot be loaded or service initialization fails.
#[tokio::main]
async fn main() -> Result<()> {
	let matches = build_cli().get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if matches.get_flag("log-file") && var("LOG_MODE").is_err() {
		set_var("LOG_MODE", "file");
	}

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}

	if let Some(path) = matches.get_one::<String>("log-path") {
		if var("LOG_DATA_DIR").is_err() {
			set_var("LOG_DATA_DIR", path);
		}
	}

	let _log_guard = setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
		None
	});

	let path = config_path(&matches);
	let settings = MonitorSettings::load_from_path(&path).map_err(|e| {
		anyhow::anyhow!("Failed to load settings from {}: {}", path.display(), e)
	})?;

	let client: Arc<dyn BlockChainClient> =
		Arc::new(EvmClient::new(&settings.chain, settings.token.token_address)?);
	let services = initialize_services(&settings, client.clone(), None)
		.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	if let Some(query) = requested_query(&matches) {
		let report = match query {
			Query::TotalBurned => services.aggregate.total_burned().await,
			Query::LastBurns => services.aggregate.last_five_burns().await,
			Query::EngineBalance => services.aggregate.current_engine_balance().await,
		};
		println!("{}", report);
		return Ok(());
	}

	let block_watcher = create_block_watcher(&settings, client, &services)?;

	// Check if metrics should be enabled from either CLI flag or env var
	let metrics_enabled =
		matches.get_flag("metrics") || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);

	let metrics_address = if var("IN_DOCKER").unwrap_or_default() == "true" {
		var("METRICS_PORT")
			.map(|port| format!("0.0.0.0:{}", port))
			.unwrap_or_else(|_| "0.0.0.0:8081".to_string())
	} else {
		matches
			.get_one::<String>("metrics-address")
			.map(|s| s.to_string())
			.unwrap_or_else(|| "127.0.0.1:8081".to_string())
	};

	let metrics_server = if metrics_enabled {
		info!("Metrics server enabled, starting on {}", metrics_address);
		match create_metrics_server(metrics_address) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let watcher = tokio::spawn(block_watcher.run(shutdown_rx));

	info!(
		symbol = %settings.token.symbol,
		channels = services.router.len(),
		"Service started. Press Ctrl+C to shutdown"
	);

	let ctrl_c = tokio::signal::ctrl_c();

	if let Some(metrics_future) = metrics_server {
		tokio::select! {
			result = ctrl_c => {
				if let Err(e) = result {
					error!("Error waiting for Ctrl+C: {}", e);
				}
				info!("Shutdown signal received, stopping services...");
			}
			result = metrics_future => {
				if let Err(e) = result {
					error!("Metrics server error: {}", e);
				}
				info!("Metrics server stopped, shutting down services...");
			}
		}
	} else {
		let _ = ctrl_c.await;
		info!("Shutdown signal received, stopping services...");
	}

	let _ = shutdown_tx.send(true);

	match watcher.await {
		Ok(state) => info!(cursor = ?state.cursor(), "Shutdown complete"),
		Err(e) => error!("Block watcher task failed: {}", e),
	}

	Ok(())
}
