//! Chain polling and the watcher loop.
//!
//! `ChainPoller::tick` performs one fetch-classify-dispatch cycle over the
//! blocks after the cursor. `BlockWatcherService` drives ticks on a timer until
//! the shutdown signal fires; an in-flight tick always runs to completion.

use std::{collections::HashSet, sync::Arc};

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
	models::{ChainEvent, StartPolicy, TokenSettings},
	services::{
		blockchain::BlockChainClient,
		blockwatcher::{BlockWatcherError, PollingSchedule, Sleeper, TokioSleeper},
		filter::EventClassifier,
		notification::ErrorSink,
	},
	utils::metrics::{
		BLOCK_CURSOR, CHAIN_HEAD, CLASSIFICATION_ANOMALIES, EVENTS_PROCESSED, FETCH_FAILURES,
	},
};

/// Receives every classified event, in chain order
#[async_trait]
pub trait EventHandler: Send + Sync {
	async fn handle(&self, event: &ChainEvent) -> Result<(), BlockWatcherError>;
}

/// Poller progress
///
/// The cursor is the highest block fully processed. It is unset until the
/// first successful tick and never moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerState {
	cursor: Option<u64>,
}

impl PollerState {
	pub fn with_cursor(cursor: u64) -> Self {
		Self {
			cursor: Some(cursor),
		}
	}

	pub fn cursor(&self) -> Option<u64> {
		self.cursor
	}

	/// Moves the cursor to `block` unless that would move it backwards
	///
	/// # Returns
	/// * `bool` - Whether the cursor changed
	pub fn advance_to(&mut self, block: u64) -> bool {
		match self.cursor {
			Some(current) if current >= block => false,
			_ => {
				self.cursor = Some(block);
				true
			}
		}
	}
}

/// Counters for a tick that processed a block range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
	pub from_block: u64,
	pub to_block: u64,
	/// Events delivered to the handler without error
	pub dispatched: usize,
	/// Events whose handler returned an error
	pub failed_dispatches: usize,
	/// Logs dropped as malformed
	pub anomalies: usize,
}

/// How a tick ended
#[derive(Debug)]
pub enum ProcessingOutcome {
	/// Cold start with the `latest` policy: the cursor was set to the chain head
	/// and no history was processed
	Initialized { cursor: u64 },
	/// No new blocks since the cursor
	Idle { cursor: u64, head: u64 },
	/// A block range was fetched and dispatched; the cursor now sits at its end
	Processed(TickSummary),
	/// The chain could not be read; the cursor is unchanged
	FetchFailed(BlockWatcherError),
}

/// Fetches, classifies and dispatches new events
pub struct ChainPoller {
	client: Arc<dyn BlockChainClient>,
	classifier: EventClassifier,
	handler: Arc<dyn EventHandler>,
	error_sink: Arc<ErrorSink>,
	burn_engine: Address,
	null_address: Address,
	start: StartPolicy,
	state: PollerState,
}

impl ChainPoller {
	/// Creates a new poller with an unset cursor
	///
	/// # Arguments
	/// * `client` - Chain client
	/// * `handler` - Receiver of classified events
	/// * `error_sink` - Destination for failure reports
	/// * `token` - Token and burn engine addresses
	/// * `start` - Where the cursor starts on the first tick
	pub fn new(
		client: Arc<dyn BlockChainClient>,
		handler: Arc<dyn EventHandler>,
		error_sink: Arc<ErrorSink>,
		token: &TokenSettings,
		start: StartPolicy,
	) -> Self {
		Self {
			client,
			classifier: EventClassifier::from_settings(token),
			handler,
			error_sink,
			burn_engine: token.burn_engine_address,
			null_address: token.null_address,
			start,
			state: PollerState::default(),
		}
	}

	/// Replaces the initial state
	pub fn with_state(mut self, state: PollerState) -> Self {
		self.state = state;
		self
	}

	pub fn state(&self) -> PollerState {
		self.state
	}

	/// Runs one poll cycle
	///
	/// The range is `cursor + 1` (or the start block) up to the current head.
	/// Every event in the range is handed to the handler before the cursor
	/// moves to the head. Handler failures are reported and do not hold the
	/// cursor back; fetch failures leave it untouched.
	pub async fn tick(&mut self) -> ProcessingOutcome {
		let head = match self.client.get_latest_block_number().await {
			Ok(head) => head,
			Err(e) => return self.fetch_failed("Error reading chain height", e.into()).await,
		};
		CHAIN_HEAD.set(head as f64);

		let from_block = match (self.state.cursor(), &self.start) {
			(Some(cursor), _) => cursor.saturating_add(1),
			(None, StartPolicy::Block { number }) => *number,
			(None, StartPolicy::Latest) => {
				self.state.advance_to(head);
				BLOCK_CURSOR.set(head as f64);
				info!(cursor = head, "cursor initialized at chain head");
				return ProcessingOutcome::Initialized { cursor: head };
			}
		};

		if from_block > head {
			debug!(from_block, head, "no new blocks");
			return ProcessingOutcome::Idle {
				cursor: self.state.cursor().unwrap_or(from_block.saturating_sub(1)),
				head,
			};
		}

		let fetched = tokio::try_join!(
			self.client
				.get_transfer_logs(self.burn_engine, from_block, head),
			self.client
				.get_transfer_logs(self.null_address, from_block, head),
		);
		let (deposit_logs, burn_logs) = match fetched {
			Ok(logs) => logs,
			Err(e) => return self.fetch_failed("Error in event monitoring", e.into()).await,
		};

		let mut anomalies = 0;
		let mut seen = HashSet::new();
		let mut events = Vec::new();
		for log in deposit_logs.iter().chain(burn_logs.iter()) {
			match self.classifier.classify(log) {
				Ok(Some(event)) => {
					let block = event.block_number();
					if block < from_block || block > head {
						warn!(block, from_block, head, "ignoring log outside requested range");
						continue;
					}
					if seen.insert(event.id()) {
						events.push(event);
					}
				}
				Ok(None) => {}
				Err(e) => {
					anomalies += 1;
					CLASSIFICATION_ANOMALIES.inc();
					self.error_sink
						.report("Dropped malformed transfer log", &e)
						.await;
				}
			}
		}
		events.sort_by_key(|event| event.position());

		let mut dispatched = 0;
		let mut failed_dispatches = 0;
		for event in &events {
			match self.handler.handle(event).await {
				Ok(()) => {
					dispatched += 1;
					EVENTS_PROCESSED
						.with_label_values(&[event.kind().as_str()])
						.inc();
				}
				Err(e) => {
					failed_dispatches += 1;
					self.error_sink
						.report(
							&format!("Error dispatching {} in tx {}", event.kind(), event.tx_hash()),
							&e,
						)
						.await;
				}
			}
		}

		self.state.advance_to(head);
		BLOCK_CURSOR.set(head as f64);

		let summary = TickSummary {
			from_block,
			to_block: head,
			dispatched,
			failed_dispatches,
			anomalies,
		};
		info!(
			from_block,
			to_block = head,
			dispatched,
			failed_dispatches,
			anomalies,
			"processed block range"
		);
		ProcessingOutcome::Processed(summary)
	}

	async fn fetch_failed(&self, context: &str, error: BlockWatcherError) -> ProcessingOutcome {
		FETCH_FAILURES.inc();
		self.error_sink.report(context, &error).await;
		ProcessingOutcome::FetchFailed(error)
	}
}

/// Drives the poller on a timer until shutdown
pub struct BlockWatcherService<S: Sleeper = TokioSleeper> {
	poller: ChainPoller,
	schedule: PollingSchedule,
	sleeper: S,
}

impl BlockWatcherService<TokioSleeper> {
	pub fn new(poller: ChainPoller, schedule: PollingSchedule) -> Self {
		Self::with_sleeper(poller, schedule, TokioSleeper)
	}
}

impl<S: Sleeper> BlockWatcherService<S> {
	pub fn with_sleeper(poller: ChainPoller, schedule: PollingSchedule, sleeper: S) -> Self {
		Self {
			poller,
			schedule,
			sleeper,
		}
	}

	/// Runs ticks until `shutdown` turns `true` or its sender is dropped
	///
	/// The signal is checked between ticks and while sleeping, so a tick that
	/// has started always completes.
	///
	/// # Returns
	/// * `PollerState` - Final poller state
	pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> PollerState {
		info!(
			interval = ?self.schedule.interval,
			backoff = ?self.schedule.error_backoff,
			"block watcher started"
		);

		loop {
			if *shutdown.borrow() {
				break;
			}

			let outcome = self.poller.tick().await;
			let delay = self.schedule.next_delay(&outcome);
			if let ProcessingOutcome::FetchFailed(e) = &outcome {
				warn!(error = %e, delay = ?delay, "tick failed, backing off");
			}

			let sender_dropped = tokio::select! {
				_ = self.sleeper.sleep(delay) => false,
				changed = shutdown.changed() => changed.is_err(),
			};
			if sender_dropped {
				break;
			}
		}

		let state = self.poller.state();
		info!(cursor = ?state.cursor(), "block watcher stopped");
		state
	}
}
