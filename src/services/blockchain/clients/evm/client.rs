//! EVM-compatible blockchain client implementation.
//!
//! This module reads the monitored ERC-20 token through an alloy provider:
//! chain height, `Transfer` logs filtered by recipient and `balanceOf`. Log
//! queries are split into windows of at most `max_block_range` blocks, and every
//! RPC call is bounded by the configured request timeout.

use std::{fmt::Display, future::IntoFuture, time::Duration};

use alloy::{
	primitives::{Address, U256},
	providers::{DynProvider, Provider, ProviderBuilder},
	rpc::types::{Filter, Log},
	sol_types::SolEvent,
};
use async_trait::async_trait;
use tracing::debug;

use crate::{
	models::ChainSettings,
	services::blockchain::{BlockChainClient, BlockChainError, IERC20},
};

/// Client implementation for Ethereum Virtual Machine (EVM) compatible blockchains
///
/// Scoped to a single token contract; every log and balance query targets it.
#[derive(Clone)]
pub struct EvmClient {
	/// Type-erased alloy provider used for all RPC traffic
	provider: DynProvider,
	/// Token contract whose `Transfer` events and balances are read
	token: Address,
	/// Deadline applied to each individual RPC call
	request_timeout: Duration,
	/// Largest block window requested in a single `eth_getLogs` call
	max_block_range: u64,
}

impl EvmClient {
	/// Creates a new EVM client connected over HTTP
	///
	/// # Arguments
	/// * `settings` - Chain settings containing the RPC endpoint and limits
	/// * `token` - Address of the monitored token contract
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - New client instance or connection error
	pub fn new(settings: &ChainSettings, token: Address) -> Result<Self, BlockChainError> {
		let url = settings.rpc_url.parse::<url::Url>().map_err(|e| {
			BlockChainError::connection_error(format!(
				"Invalid RPC URL {}: {}",
				settings.rpc_url, e
			))
		})?;
		let provider = ProviderBuilder::new().connect_http(url).erased();

		Ok(Self::new_with_provider(
			provider,
			token,
			settings.request_timeout(),
			settings.max_block_range,
		))
	}

	/// Creates a new EVM client instance with a specific provider
	pub fn new_with_provider(
		provider: DynProvider,
		token: Address,
		request_timeout: Duration,
		max_block_range: u64,
	) -> Self {
		Self {
			provider,
			token,
			request_timeout,
			max_block_range: max_block_range.max(1),
		}
	}

	/// Awaits an RPC call under the configured deadline
	///
	/// Accepts anything awaitable, including alloy's lazy `EthCall` builders.
	async fn with_deadline<T, E, F>(&self, operation: &str, future: F) -> Result<T, BlockChainError>
	where
		E: Display,
		F: IntoFuture<Output = Result<T, E>>,
	{
		match tokio::time::timeout(self.request_timeout, future).await {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(e)) => Err(BlockChainError::request_error(format!(
				"{} failed: {}",
				operation, e
			))),
			Err(_) => Err(BlockChainError::timeout(operation, self.request_timeout)),
		}
	}
}

/// Splits an inclusive block range into windows no wider than `max_range`
///
/// Returns an empty list when `from_block > to_block`.
pub(crate) fn block_windows(from_block: u64, to_block: u64, max_range: u64) -> Vec<(u64, u64)> {
	let max_range = max_range.max(1);
	let mut windows = Vec::new();
	let mut start = from_block;

	while start <= to_block {
		let end = start.saturating_add(max_range - 1).min(to_block);
		windows.push((start, end));
		if end == u64::MAX {
			break;
		}
		start = end + 1;
	}

	windows
}

#[async_trait]
impl BlockChainClient for EvmClient {
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError> {
		self.with_deadline("eth_blockNumber", self.provider.get_block_number())
			.await
	}

	async fn get_transfer_logs(
		&self,
		recipient: Address,
		from_block: u64,
		to_block: u64,
	) -> Result<Vec<Log>, BlockChainError> {
		let mut logs = Vec::new();

		for (start, end) in block_windows(from_block, to_block, self.max_block_range) {
			let filter = Filter::new()
				.address(self.token)
				.event_signature(IERC20::Transfer::SIGNATURE_HASH)
				.topic2(recipient.into_word())
				.from_block(start)
				.to_block(end);

			let chunk = self
				.with_deadline("eth_getLogs", self.provider.get_logs(&filter))
				.await?;
			debug!(
				recipient = %recipient,
				from_block = start,
				to_block = end,
				count = chunk.len(),
				"fetched transfer logs"
			);
			logs.extend(chunk);
		}

		Ok(logs)
	}

	async fn get_token_balance(&self, holder: Address) -> Result<U256, BlockChainError> {
		let contract = IERC20::new(self.token, &self.provider);
		self.with_deadline("balanceOf", contract.balanceOf(holder).call())
			.await
	}
}
