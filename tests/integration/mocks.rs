//! Mock implementations and fixtures.
//!
//! - [`MockChainClient`] - Mock implementation of the chain client
//! - [`MockPriceSource`] - Mock implementation of the market data source
//! - [`MockEventHandler`] - Mock implementation of the poller's event sink
//! - [`RecordingNotifier`] - Channel that records every delivery
//!
//! These allow exercising the services without network connections.

use std::sync::{Arc, Mutex};

use alloy::{
	primitives::{Address, LogData, TxHash, U256},
	rpc::types::Log,
	sol_types::SolEvent,
};
use async_trait::async_trait;
use burn_monitor::{
	models::{ChainEvent, TokenSettings},
	services::{
		blockchain::{BlockChainClient, BlockChainError, IERC20},
		blockwatcher::{BlockWatcherError, EventHandler},
		notification::{NotificationError, Notifier},
		price::{PriceError, PriceSource},
	},
	utils::{create_retryable_http_client, HttpRetryConfig},
};
use mockall::mock;
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::Decimal;

pub const TOKEN: Address = Address::repeat_byte(0x24);
pub const ENGINE: Address = Address::repeat_byte(0x6b);
pub const SENDER: Address = Address::repeat_byte(0x01);
pub const NULL: Address = Address::ZERO;

mock! {
	/// Mock implementation of the chain client.
	pub ChainClient {}

	#[async_trait]
	impl BlockChainClient for ChainClient {
		async fn get_latest_block_number(&self) -> Result<u64, BlockChainError>;
		async fn get_transfer_logs(
			&self,
			recipient: Address,
			from_block: u64,
			to_block: u64,
		) -> Result<Vec<Log>, BlockChainError>;
		async fn get_token_balance(&self, holder: Address) -> Result<U256, BlockChainError>;
	}
}

mock! {
	pub PriceSource {}

	#[async_trait]
	impl PriceSource for PriceSource {
		async fn fetch_rate(&self) -> Result<Decimal, PriceError>;
		async fn fetch_circulating_supply(&self) -> Result<Decimal, PriceError>;
	}
}

mock! {
	pub EventHandler {}

	#[async_trait]
	impl EventHandler for EventHandler {
		async fn handle(&self, event: &ChainEvent) -> Result<(), BlockWatcherError>;
	}
}

/// Delivery recorded by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
	Text(String),
	Media(String),
}

/// Channel that records deliveries and optionally fails them
pub struct RecordingNotifier {
	name: String,
	fail_text: bool,
	supports_media: bool,
	deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingNotifier {
	pub fn new(name: &str) -> Arc<Self> {
		Arc::new(Self {
			name: name.to_string(),
			fail_text: false,
			supports_media: true,
			deliveries: Mutex::new(Vec::new()),
		})
	}

	pub fn failing(name: &str) -> Arc<Self> {
		Arc::new(Self {
			name: name.to_string(),
			fail_text: true,
			supports_media: true,
			deliveries: Mutex::new(Vec::new()),
		})
	}

	pub fn text_only(name: &str) -> Arc<Self> {
		Arc::new(Self {
			name: name.to_string(),
			fail_text: false,
			supports_media: false,
			deliveries: Mutex::new(Vec::new()),
		})
	}

	pub fn deliveries(&self) -> Vec<Delivery> {
		self.deliveries.lock().unwrap().clone()
	}

	pub fn texts(&self) -> Vec<String> {
		self.deliveries()
			.into_iter()
			.filter_map(|delivery| match delivery {
				Delivery::Text(text) => Some(text),
				Delivery::Media(_) => None,
			})
			.collect()
	}
}

#[async_trait]
impl Notifier for RecordingNotifier {
	fn channel(&self) -> &str {
		&self.name
	}

	async fn notify(&self, message: &str) -> Result<(), NotificationError> {
		if self.fail_text {
			return Err(NotificationError::network_error(format!(
				"{} unreachable",
				self.name
			)));
		}
		self.deliveries
			.lock()
			.unwrap()
			.push(Delivery::Text(message.to_string()));
		Ok(())
	}

	async fn notify_media(&self, media_url: &str) -> Result<(), NotificationError> {
		if !self.supports_media {
			return Err(NotificationError::unsupported("no media"));
		}
		self.deliveries
			.lock()
			.unwrap()
			.push(Delivery::Media(media_url.to_string()));
		Ok(())
	}
}

/// Whole tokens in the smallest unit of an 18-decimal token
pub fn tokens(n: u64) -> U256 {
	U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

pub fn tx(byte: u8) -> TxHash {
	TxHash::repeat_byte(byte)
}

/// Builds a token `Transfer` log at a chain position
pub fn transfer_log(to: Address, value: U256, block: u64, log_index: u64, tx_byte: u8) -> Log {
	let data = IERC20::Transfer {
		from: SENDER,
		to,
		value,
	}
	.encode_log_data();

	Log {
		inner: alloy::primitives::Log {
			address: TOKEN,
			data,
		},
		block_number: Some(block),
		transaction_hash: Some(tx(tx_byte)),
		log_index: Some(log_index),
		..Default::default()
	}
}

/// A log from the token contract whose data cannot be decoded as a transfer
pub fn malformed_log(block: u64, log_index: u64, tx_byte: u8) -> Log {
	Log {
		inner: alloy::primitives::Log {
			address: TOKEN,
			data: LogData::new_unchecked(
				vec![IERC20::Transfer::SIGNATURE_HASH],
				Default::default(),
			),
		},
		block_number: Some(block),
		transaction_hash: Some(tx(tx_byte)),
		log_index: Some(log_index),
		..Default::default()
	}
}

pub fn token_settings() -> TokenSettings {
	TokenSettings {
		symbol: "$VERSE".to_string(),
		token_address: TOKEN,
		burn_engine_address: ENGINE,
		null_address: NULL,
		decimals: 18,
		launch_block: 100,
		total_supply: Decimal::from(1_000_000u64),
	}
}

pub fn test_http_client() -> ClientWithMiddleware {
	let config = HttpRetryConfig {
		max_retries: 0,
		..HttpRetryConfig::default()
	};
	create_retryable_http_client(&config).unwrap()
}
