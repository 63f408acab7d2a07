//! Tick scheduling.
//!
//! The delay before the next tick depends on how the previous one ended:
//! nominal interval after success, backoff interval after a failed fetch.

use std::time::Duration;

use async_trait::async_trait;

use crate::{models::PollingSettings, services::blockwatcher::ProcessingOutcome};

/// Timer used between ticks
#[async_trait]
pub trait Sleeper: Send + Sync {
	async fn sleep(&self, duration: Duration);
}

/// `Sleeper` backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
	async fn sleep(&self, duration: Duration) {
		tokio::time::sleep(duration).await;
	}
}

/// Delay policy between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingSchedule {
	pub interval: Duration,
	pub error_backoff: Duration,
}

impl PollingSchedule {
	pub fn new(interval: Duration, error_backoff: Duration) -> Self {
		Self {
			interval,
			error_backoff,
		}
	}

	pub fn from_settings(settings: &PollingSettings) -> Self {
		Self::new(settings.interval(), settings.error_backoff())
	}

	/// Returns the delay to wait after `outcome`
	pub fn next_delay(&self, outcome: &ProcessingOutcome) -> Duration {
		match outcome {
			ProcessingOutcome::FetchFailed(_) => self.error_backoff,
			_ => self.interval,
		}
	}
}
