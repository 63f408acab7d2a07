//! Logging utilities for the application
//!
//! This module provides utilities for setting up and configuring logging for the application.
//! It uses the `tracing_subscriber` crate to configure the logging.
//!
//! Output goes to stdout unless `LOG_MODE=file`, in which case a daily rolling
//! file is written under `LOG_DATA_DIR` (default `logs/`). The level comes from
//! `RUST_LOG`, then `LOG_LEVEL`, then defaults to `info`.

use std::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

type SetupError = Box<dyn std::error::Error + Send + Sync + 'static>;

const DEFAULT_LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "burn-monitor.log";

fn build_filter() -> EnvFilter {
	if let Ok(filter) = EnvFilter::try_from_default_env() {
		return filter;
	}

	match env::var("LOG_LEVEL") {
		Ok(level) if !level.trim().is_empty() => {
			EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
		}
		_ => EnvFilter::new("info"),
	}
}

/// Setup logging for the application
///
/// Returns the worker guard of the file appender when logging to a file; it
/// must be kept alive for buffered lines to be flushed.
pub fn setup_logging() -> Result<Option<WorkerGuard>, SetupError> {
	if env::var("LOG_MODE").map(|m| m == "file").unwrap_or(false) {
		let dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
		let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
		let (writer, guard) = tracing_appender::non_blocking(appender);
		setup_logging_with_writer(writer, false)?;
		return Ok(Some(guard));
	}

	setup_logging_with_writer(std::io::stdout, true)?;
	Ok(None)
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(writer: W, ansi: bool) -> Result<(), SetupError>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry()
		.with(build_filter())
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(ansi)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
