use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Last known market data for the monitored token.
///
/// Fields stay `None` until the first successful fetch and keep their previous
/// value when a later refresh fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSnapshot {
	/// USD value of one whole token
	pub rate_usd_per_token: Option<Decimal>,
	/// Circulating supply in whole tokens
	pub circulating_supply: Option<Decimal>,
	/// Time of the most recent successful update of either field
	pub fetched_at: Option<DateTime<Utc>>,
}

impl PriceSnapshot {
	pub fn with_rate(rate: Decimal) -> Self {
		Self {
			rate_usd_per_token: Some(rate),
			circulating_supply: None,
			fetched_at: Some(Utc::now()),
		}
	}
}
