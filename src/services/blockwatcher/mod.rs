//! Block watcher service implementation.
//!
//! Polls the chain for new deposit and burn events:
//! - A single-owner block cursor that only moves forward
//! - Per-tick fetch, classification, deduplication and dispatch
//! - Timer-driven loop with backoff after failed fetches and graceful shutdown

mod error;
mod scheduler;
mod service;

pub use error::BlockWatcherError;
pub use scheduler::{PollingSchedule, Sleeper, TokioSleeper};
pub use service::{
	BlockWatcherService, ChainPoller, EventHandler, PollerState, ProcessingOutcome, TickSummary,
};
