//! Service settings as read from the configuration file.

use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{collections::HashMap, time::Duration};
use zeroize::Zeroizing;

use crate::{
	models::ConfigError,
	utils::constants::{
		DEFAULT_BURN_PREFIX, DEFAULT_CIRCULATING_SUPPLY_URL, DEFAULT_DEPOSIT_PREFIX,
		DEFAULT_ERROR_BACKOFF_MS, DEFAULT_EXPLORER_TX_URL, DEFAULT_HTTP_TIMEOUT_MS,
		DEFAULT_MAX_BLOCK_RANGE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RATE_URL,
		DEFAULT_TOKEN_DECIMALS,
	},
};

/// Root of the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
	pub chain: ChainSettings,
	pub token: TokenSettings,
	pub polling: PollingSettings,
	#[serde(default)]
	pub price: PriceSettings,
	#[serde(default)]
	pub messages: MessageSettings,
	/// Broadcast destinations, delivered in order
	#[serde(default)]
	pub channels: Vec<ChannelConfig>,
	/// Dedicated destination for operator alerts
	#[serde(default)]
	pub operator_channel: Option<ChannelConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainSettings {
	/// JSON-RPC endpoint of the chain node
	pub rpc_url: String,
	/// Upper bound for a single RPC call
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	/// Largest block span requested in one `eth_getLogs` call
	#[serde(default = "default_max_block_range")]
	pub max_block_range: u64,
	/// Prefix a transaction hash is appended to for explorer links
	#[serde(default = "default_explorer_tx_url")]
	pub explorer_tx_url: String,
}

impl ChainSettings {
	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
	/// Display symbol, e.g. `$VERSE`
	pub symbol: String,
	/// ERC-20 contract emitting the `Transfer` logs
	pub token_address: Address,
	/// Burn engine contract receiving deposits
	pub burn_engine_address: Address,
	/// Destination that counts as a burn
	#[serde(default)]
	pub null_address: Address,
	#[serde(default = "default_decimals")]
	pub decimals: u8,
	/// First block aggregate queries scan from
	pub launch_block: u64,
	/// Total supply in whole tokens
	pub total_supply: Decimal,
}

/// Where the block cursor starts when the process has no prior state.
///
/// There is intentionally no default: replaying from a fixed block re-delivers
/// every historical event, starting from the head skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StartPolicy {
	/// Start at the chain head observed on the first tick
	Latest,
	/// Start at a fixed genesis block (inclusive)
	Block { number: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
	/// Required cold-start policy, validated at load time
	#[serde(default)]
	pub start: Option<StartPolicy>,
	#[serde(default = "default_poll_interval_ms")]
	pub interval_ms: u64,
	#[serde(default = "default_error_backoff_ms")]
	pub error_backoff_ms: u64,
}

impl PollingSettings {
	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms)
	}

	pub fn error_backoff(&self) -> Duration {
		Duration::from_millis(self.error_backoff_ms)
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceSettings {
	/// Endpoint returning `{"<currency>": {"rate": <number>}}`
	#[serde(default = "default_rate_url")]
	pub rate_url: String,
	#[serde(default = "default_rate_currency")]
	pub rate_currency: String,
	/// Endpoint returning the circulating supply as a bare number
	#[serde(default = "default_circulating_supply_url")]
	pub circulating_supply_url: String,
	#[serde(default = "default_request_timeout_ms")]
	pub timeout_ms: u64,
}

impl Default for PriceSettings {
	fn default() -> Self {
		Self {
			rate_url: default_rate_url(),
			rate_currency: default_rate_currency(),
			circulating_supply_url: default_circulating_supply_url(),
			timeout_ms: default_request_timeout_ms(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSettings {
	#[serde(default = "default_deposit_prefix")]
	pub deposit_prefix: String,
	#[serde(default = "default_burn_prefix")]
	pub burn_prefix: String,
	/// Animation attached to burn notifications
	#[serde(default)]
	pub burn_media_url: Option<String>,
	/// Follow each burn notification with the running total
	#[serde(default = "default_true")]
	pub announce_totals_after_burn: bool,
	/// Append the burn engine balance to deposit notifications
	#[serde(default = "default_true")]
	pub include_engine_balance: bool,
}

impl Default for MessageSettings {
	fn default() -> Self {
		Self {
			deposit_prefix: default_deposit_prefix(),
			burn_prefix: default_burn_prefix(),
			burn_media_url: None,
			announce_totals_after_burn: true,
			include_engine_balance: true,
		}
	}
}

/// A secret that is either written inline or read from the environment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SecretValue {
	Plain(String),
	Environment(String),
}

impl SecretValue {
	/// Resolves the secret, failing if a referenced variable is unset or empty
	pub fn resolve(&self) -> Result<Zeroizing<String>, ConfigError> {
		match self {
			Self::Plain(value) => Ok(Zeroizing::new(value.clone())),
			Self::Environment(name) => match std::env::var(name) {
				Ok(value) if !value.is_empty() => Ok(Zeroizing::new(value)),
				_ => Err(ConfigError::missing_secret(name.as_str())),
			},
		}
	}

	fn is_blank(&self) -> bool {
		match self {
			Self::Plain(value) | Self::Environment(value) => value.trim().is_empty(),
		}
	}
}

/// Configuration of one broadcast channel
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelConfig {
	Telegram {
		token: SecretValue,
		chat_ids: Vec<String>,
		#[serde(default)]
		base_url: Option<String>,
		#[serde(default)]
		disable_web_preview: Option<bool>,
		/// Bot API `parse_mode`; messages go out as plain text when unset
		#[serde(default)]
		parse_mode: Option<String>,
	},
	Slack {
		token: SecretValue,
		channels: Vec<String>,
		#[serde(default)]
		base_url: Option<String>,
	},
	Discord {
		webhook_urls: Vec<SecretValue>,
	},
	Twitter {
		bearer_token: SecretValue,
		#[serde(default)]
		base_url: Option<String>,
	},
	Facebook {
		page_id: String,
		access_token: SecretValue,
		#[serde(default)]
		base_url: Option<String>,
	},
	Webhook {
		url: String,
		#[serde(default)]
		method: Option<String>,
		#[serde(default)]
		secret: Option<SecretValue>,
		#[serde(default)]
		headers: Option<HashMap<String, String>>,
	},
}

impl ChannelConfig {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Telegram { .. } => "telegram",
			Self::Slack { .. } => "slack",
			Self::Discord { .. } => "discord",
			Self::Twitter { .. } => "twitter",
			Self::Facebook { .. } => "facebook",
			Self::Webhook { .. } => "webhook",
		}
	}

	/// Checks that the channel has at least one usable destination
	pub fn validate(&self) -> Result<(), String> {
		let kind = self.kind();
		match self {
			Self::Telegram {
				token, chat_ids, ..
			} => {
				if token.is_blank() {
					return Err(format!("{} token must not be empty", kind));
				}
				if chat_ids.is_empty() || chat_ids.iter().any(|id| id.trim().is_empty()) {
					return Err(format!("{} requires at least one non-empty chat id", kind));
				}
			}
			Self::Slack {
				token, channels, ..
			} => {
				if token.is_blank() {
					return Err(format!("{} token must not be empty", kind));
				}
				if channels.is_empty() || channels.iter().any(|c| c.trim().is_empty()) {
					return Err(format!("{} requires at least one non-empty channel", kind));
				}
			}
			Self::Discord { webhook_urls } => {
				if webhook_urls.is_empty() || webhook_urls.iter().any(SecretValue::is_blank) {
					return Err(format!("{} requires at least one webhook url", kind));
				}
			}
			Self::Twitter { bearer_token, .. } => {
				if bearer_token.is_blank() {
					return Err(format!("{} bearer token must not be empty", kind));
				}
			}
			Self::Facebook {
				page_id,
				access_token,
				..
			} => {
				if page_id.trim().is_empty() || access_token.is_blank() {
					return Err(format!("{} requires a page id and an access token", kind));
				}
			}
			Self::Webhook { url, method, .. } => {
				if !(url.starts_with("http://") || url.starts_with("https://")) {
					return Err(format!("{} url must start with http:// or https://", kind));
				}
				if let Some(method) = method {
					if !matches!(method.to_uppercase().as_str(), "POST" | "PUT" | "PATCH") {
						return Err(format!("{} method must be POST, PUT or PATCH", kind));
					}
				}
			}
		}
		Ok(())
	}
}

fn default_request_timeout_ms() -> u64 {
	DEFAULT_HTTP_TIMEOUT_MS
}

fn default_max_block_range() -> u64 {
	DEFAULT_MAX_BLOCK_RANGE
}

fn default_explorer_tx_url() -> String {
	DEFAULT_EXPLORER_TX_URL.to_string()
}

fn default_decimals() -> u8 {
	DEFAULT_TOKEN_DECIMALS
}

fn default_poll_interval_ms() -> u64 {
	DEFAULT_POLL_INTERVAL_MS
}

fn default_error_backoff_ms() -> u64 {
	DEFAULT_ERROR_BACKOFF_MS
}

fn default_rate_url() -> String {
	DEFAULT_RATE_URL.to_string()
}

fn default_rate_currency() -> String {
	"USD".to_string()
}

fn default_circulating_supply_url() -> String {
	DEFAULT_CIRCULATING_SUPPLY_URL.to_string()
}

fn default_deposit_prefix() -> String {
	DEFAULT_DEPOSIT_PREFIX.to_string()
}

fn default_burn_prefix() -> String {
	DEFAULT_BURN_PREFIX.to_string()
}

fn default_true() -> bool {
	true
}
