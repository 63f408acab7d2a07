//! Price oracle client.
//!
//! Market data is fetched from HTTP endpoints through a `PriceSource` and
//! cached in a shared `PriceSnapshot`. A failed refresh leaves the previous
//! values in place; the failure is logged and reported to the operator.

use std::{str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
	models::{PriceSettings, PriceSnapshot},
	services::{notification::ErrorSink, price::PriceError},
	utils::metrics::PRICE,
};

/// Upstream provider of market data
#[async_trait]
pub trait PriceSource: Send + Sync {
	/// USD value of one whole token
	async fn fetch_rate(&self) -> Result<Decimal, PriceError>;

	/// Circulating supply in whole tokens
	async fn fetch_circulating_supply(&self) -> Result<Decimal, PriceError>;
}

/// `PriceSource` backed by the configured HTTP endpoints
pub struct HttpPriceSource {
	client: ClientWithMiddleware,
	rate_url: String,
	rate_currency: String,
	circulating_supply_url: String,
	timeout: Duration,
}

impl HttpPriceSource {
	pub fn new(client: ClientWithMiddleware, settings: &PriceSettings) -> Self {
		Self {
			client,
			rate_url: settings.rate_url.clone(),
			rate_currency: settings.rate_currency.clone(),
			circulating_supply_url: settings.circulating_supply_url.clone(),
			timeout: Duration::from_millis(settings.timeout_ms),
		}
	}

	async fn get_text(&self, url: &str) -> Result<String, PriceError> {
		let response = self
			.client
			.get(url)
			.timeout(self.timeout)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(PriceError::request_error(format!(
				"{} returned status {}",
				url, status
			)));
		}

		Ok(response.text().await?)
	}
}

#[async_trait]
impl PriceSource for HttpPriceSource {
	async fn fetch_rate(&self) -> Result<Decimal, PriceError> {
		let body = self.get_text(&self.rate_url).await?;
		parse_rate(&body, &self.rate_currency)
	}

	async fn fetch_circulating_supply(&self) -> Result<Decimal, PriceError> {
		let body = self.get_text(&self.circulating_supply_url).await?;
		parse_decimal(&body)
	}
}

/// Parses a non-negative decimal from plain or scientific notation
///
/// Surrounding whitespace and JSON string quotes are ignored.
pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, PriceError> {
	let trimmed = raw.trim().trim_matches('"');
	let value = Decimal::from_str(trimmed)
		.or_else(|_| Decimal::from_scientific(trimmed))
		.map_err(|e| PriceError::parse_error(format!("'{}' is not a number: {}", trimmed, e)))?;

	if value.is_sign_negative() && !value.is_zero() {
		return Err(PriceError::parse_error(format!(
			"negative value {} rejected",
			value
		)));
	}
	Ok(value)
}

/// Extracts `body[currency].rate` from a rate endpoint response
pub(crate) fn parse_rate(body: &str, currency: &str) -> Result<Decimal, PriceError> {
	let json: Value = serde_json::from_str(body)
		.map_err(|e| PriceError::parse_error(format!("invalid rate response: {}", e)))?;

	match json.get(currency).and_then(|entry| entry.get("rate")) {
		Some(Value::Number(number)) => parse_decimal(&number.to_string()),
		Some(Value::String(text)) => parse_decimal(text),
		_ => Err(PriceError::parse_error(format!(
			"rate response has no {}.rate field",
			currency
		))),
	}
}

/// Caches the last known market data
pub struct PriceOracleClient {
	source: Arc<dyn PriceSource>,
	snapshot: RwLock<PriceSnapshot>,
	error_sink: Arc<ErrorSink>,
}

impl PriceOracleClient {
	pub fn new(source: Arc<dyn PriceSource>, error_sink: Arc<ErrorSink>) -> Self {
		Self {
			source,
			snapshot: RwLock::new(PriceSnapshot::default()),
			error_sink,
		}
	}

	/// Returns a copy of the current snapshot
	pub async fn snapshot(&self) -> PriceSnapshot {
		self.snapshot.read().await.clone()
	}

	/// Refreshes the USD rate
	///
	/// # Returns
	/// * `Ok(rate)` - The new rate, now stored in the snapshot
	/// * `Err(PriceError)` - The snapshot is unchanged; the failure has already
	///   been reported
	pub async fn refresh_rate(&self) -> Result<Decimal, PriceError> {
		match self.source.fetch_rate().await {
			Ok(rate) => {
				let mut snapshot = self.snapshot.write().await;
				snapshot.rate_usd_per_token = Some(rate);
				snapshot.fetched_at = Some(Utc::now());
				PRICE
					.with_label_values(&["rate_usd"])
					.set(rate.to_f64().unwrap_or_default());
				debug!(%rate, "refreshed token rate");
				Ok(rate)
			}
			Err(e) => {
				self.error_sink.report("Error fetching token rate", &e).await;
				Err(e)
			}
		}
	}

	/// Refreshes the circulating supply
	///
	/// Same contract as `refresh_rate`.
	pub async fn refresh_circulating_supply(&self) -> Result<Decimal, PriceError> {
		match self.source.fetch_circulating_supply().await {
			Ok(supply) => {
				let mut snapshot = self.snapshot.write().await;
				snapshot.circulating_supply = Some(supply);
				snapshot.fetched_at = Some(Utc::now());
				PRICE
					.with_label_values(&["circulating_supply"])
					.set(supply.to_f64().unwrap_or_default());
				info!(%supply, "refreshed circulating supply");
				Ok(supply)
			}
			Err(e) => {
				self.error_sink
					.report("Error fetching circulating supply", &e)
					.await;
				Err(e)
			}
		}
	}
}
