//! Settings configuration loading and validation.
//!
//! Implements the ConfigLoader trait for the top-level monitor settings.

use alloy::primitives::Address;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::warn;

use crate::models::{config::error::ConfigError, ConfigLoader, MonitorSettings};

fn is_http_url(url: &str) -> bool {
	url.starts_with("http://") || url.starts_with("https://")
}

impl ConfigLoader for MonitorSettings {
	/// Load settings from a JSON file and validate them
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::file_error(format!(
				"configuration file not found: {}",
				path.display()
			)));
		}

		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(format!(
				"configuration file must be a .json file: {}",
				path.display()
			)));
		}

		let file = std::fs::File::open(path)?;
		let config: MonitorSettings = serde_json::from_reader(file)?;

		config.validate()?;

		Ok(config)
	}

	/// Validate the settings
	///
	/// Rejects anything that would leave addresses, endpoints or the cold-start
	/// policy undefined at runtime.
	fn validate(&self) -> Result<(), ConfigError> {
		if !is_http_url(&self.chain.rpc_url) {
			return Err(ConfigError::validation_error(
				"chain.rpc_url must start with http:// or https://",
			));
		}

		if self.chain.request_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"chain.request_timeout_ms must be greater than 0",
			));
		}

		if self.chain.max_block_range == 0 {
			return Err(ConfigError::validation_error(
				"chain.max_block_range must be greater than 0",
			));
		}

		if self.token.symbol.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"token.symbol must not be empty",
			));
		}

		if self.token.token_address == Address::ZERO {
			return Err(ConfigError::validation_error(
				"token.token_address must be set",
			));
		}

		if self.token.burn_engine_address == Address::ZERO {
			return Err(ConfigError::validation_error(
				"token.burn_engine_address must be set",
			));
		}

		if self.token.burn_engine_address == self.token.null_address {
			return Err(ConfigError::validation_error(
				"token.burn_engine_address and token.null_address must differ",
			));
		}

		// 10^77 is the largest power of ten representable in 256 bits
		if self.token.decimals > 77 {
			return Err(ConfigError::validation_error(
				"token.decimals must be at most 77",
			));
		}

		if self.token.total_supply <= Decimal::ZERO {
			return Err(ConfigError::validation_error(
				"token.total_supply must be greater than 0",
			));
		}

		if self.polling.start.is_none() {
			return Err(ConfigError::validation_error(
				"polling.start is required: use {\"type\": \"latest\"} or {\"type\": \"block\", \
				 \"number\": <height>}",
			));
		}

		if self.polling.interval_ms == 0 || self.polling.error_backoff_ms == 0 {
			return Err(ConfigError::validation_error(
				"polling.interval_ms and polling.error_backoff_ms must be greater than 0",
			));
		}

		if !is_http_url(&self.price.rate_url) || !is_http_url(&self.price.circulating_supply_url) {
			return Err(ConfigError::validation_error(
				"price endpoints must start with http:// or https://",
			));
		}

		if self.price.timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"price.timeout_ms must be greater than 0",
			));
		}

		for (index, channel) in self.channels.iter().enumerate() {
			channel.validate().map_err(|e| {
				ConfigError::validation_error(format!("channels[{}]: {}", index, e))
			})?;
		}

		if let Some(operator) = &self.operator_channel {
			operator
				.validate()
				.map_err(|e| ConfigError::validation_error(format!("operator_channel: {}", e)))?;
		}

		if self.channels.is_empty() {
			warn!("No notification channels configured, events will only be logged");
		}

		Ok(())
	}
}
