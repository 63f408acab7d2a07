use alloy::primitives::{TxHash, U256};
use rust_decimal::Decimal;
use serde::Serialize;

/// Inclusive block interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRange {
	pub from_block: u64,
	pub to_block: u64,
}

impl BlockRange {
	pub fn new(from_block: u64, to_block: u64) -> Self {
		Self {
			from_block,
			to_block,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.from_block > self.to_block
	}
}

/// A single burn as stored by the aggregate ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurnRecord {
	pub amount: U256,
	pub tx_hash: TxHash,
	pub block_number: u64,
	pub log_index: u64,
}

/// Point-in-time burn statistics folded from the event history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSnapshot {
	/// Sum of burned amounts in the token's smallest unit
	pub total_burned: U256,
	/// `total_burned` converted to whole tokens
	pub total_burned_tokens: Decimal,
	pub event_count: u64,
	pub percent_of_total_supply: Decimal,
	pub percent_of_circulating_supply: Decimal,
}

impl AggregateSnapshot {
	pub fn empty() -> Self {
		Self {
			total_burned: U256::ZERO,
			total_burned_tokens: Decimal::ZERO,
			event_count: 0,
			percent_of_total_supply: Decimal::ZERO,
			percent_of_circulating_supply: Decimal::ZERO,
		}
	}
}
