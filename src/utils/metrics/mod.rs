//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines specific metrics for the application.

pub mod server;
use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	// Gauge for the highest block fully processed by the poller.
	pub static ref BLOCK_CURSOR: Gauge = {
		let gauge = Gauge::new("block_cursor", "Highest block fully processed").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Gauge for the chain head observed on the last tick.
	pub static ref CHAIN_HEAD: Gauge = {
		let gauge = Gauge::new("chain_head", "Latest block height reported by the RPC node").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Counter of dispatched events per kind.
	pub static ref EVENTS_PROCESSED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("events_processed_total", "Events dispatched to the notification pipeline"),
			&["kind"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter of delivery attempts per channel and outcome.
	pub static ref NOTIFICATIONS: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("notifications_total", "Notification delivery attempts"),
			&["channel", "outcome"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter of ticks whose range fetch failed.
	pub static ref FETCH_FAILURES: IntCounter = {
		let counter = IntCounter::new("fetch_failures_total", "Ticks aborted by a failed chain fetch").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter of logs dropped as malformed.
	pub static ref CLASSIFICATION_ANOMALIES: IntCounter = {
		let counter = IntCounter::new("classification_anomalies_total", "Logs dropped as malformed").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter of operator alerts per outcome.
	pub static ref OPERATOR_ALERTS: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("operator_alerts_total", "Alerts sent to the operator channel"),
			&["outcome"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Gauge Vector for the last known market data.
	pub static ref PRICE: GaugeVec = {
		let gauge = GaugeVec::new(
			Opts::new("token_market_data", "Last known token market data"),
			&["field"]
		).unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}
