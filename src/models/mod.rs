//! Domain models and data structures.
//!
//! - `core`: events, messages, price and aggregate snapshots, settings
//! - `config`: configuration loading and validation

mod config;
mod core;

pub use config::{ConfigError, ConfigLoader};

pub use core::{
	AggregateSnapshot, BlockRange, BurnRecord, ChainEvent, ChainSettings, ChannelConfig,
	ChannelOutcome, ChannelResult, EventId, EventKind, MessageSettings, MonitorSettings,
	NotificationMessage, PollingSettings, PriceSettings, PriceSnapshot, SecretValue, StartPolicy,
	TokenSettings, TransferEvent,
};
