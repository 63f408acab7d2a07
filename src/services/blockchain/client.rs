//! Core blockchain client interface.
//!
//! This module defines the capability the rest of the service relies on to read
//! the chain: the current height, token transfer logs by recipient, and token
//! balances.

use alloy::{
	primitives::{Address, U256},
	rpc::types::Log,
};
use async_trait::async_trait;

use crate::services::blockchain::BlockChainError;

/// Defines the chain query interface
///
/// Every call must complete within a bounded time; implementations are expected
/// to fail with a `BlockChainError` rather than block indefinitely.
#[async_trait]
pub trait BlockChainClient: Send + Sync {
	/// Retrieves the latest block number from the blockchain
	///
	/// # Returns
	/// * `Result<u64, BlockChainError>` - The latest block number or an error
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError>;

	/// Retrieves the token's `Transfer` logs sent to `recipient`
	///
	/// # Arguments
	/// * `recipient` - Address matched against the indexed `to` topic
	/// * `from_block` - First block of the range (inclusive)
	/// * `to_block` - Last block of the range (inclusive)
	///
	/// # Returns
	/// * `Result<Vec<Log>, BlockChainError>` - Raw logs in chain order or an error
	async fn get_transfer_logs(
		&self,
		recipient: Address,
		from_block: u64,
		to_block: u64,
	) -> Result<Vec<Log>, BlockChainError>;

	/// Retrieves the token balance held by `holder`
	async fn get_token_balance(&self, holder: Address) -> Result<U256, BlockChainError>;
}
