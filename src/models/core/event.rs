//! Typed token-transfer events observed on chain.

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use std::fmt;

/// The two transfer categories the monitor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	/// Transfer into the burn engine contract
	Deposit,
	/// Transfer to the null address
	Burn,
}

impl EventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Deposit => "deposit",
			Self::Burn => "burn",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Unique identity of a log on chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId {
	pub tx_hash: TxHash,
	pub log_index: u64,
}

/// Decoded transfer details shared by both event kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEvent {
	/// Amount in the token's smallest unit
	pub amount: U256,
	/// Sender of the transfer
	pub from: Address,
	/// Transaction that emitted the log
	pub tx_hash: TxHash,
	/// Block the log was included in
	pub block_number: u64,
	/// Position of the log inside its block
	pub log_index: u64,
}

/// A classified chain event. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChainEvent {
	Deposit(TransferEvent),
	Burn(TransferEvent),
}

impl ChainEvent {
	pub fn kind(&self) -> EventKind {
		match self {
			Self::Deposit(_) => EventKind::Deposit,
			Self::Burn(_) => EventKind::Burn,
		}
	}

	pub fn transfer(&self) -> &TransferEvent {
		match self {
			Self::Deposit(transfer) | Self::Burn(transfer) => transfer,
		}
	}

	pub fn amount(&self) -> U256 {
		self.transfer().amount
	}

	pub fn tx_hash(&self) -> TxHash {
		self.transfer().tx_hash
	}

	pub fn block_number(&self) -> u64 {
		self.transfer().block_number
	}

	pub fn id(&self) -> EventId {
		let transfer = self.transfer();
		EventId {
			tx_hash: transfer.tx_hash,
			log_index: transfer.log_index,
		}
	}

	/// Ordering key used to dispatch events in chain order
	pub fn position(&self) -> (u64, u64) {
		let transfer = self.transfer();
		(transfer.block_number, transfer.log_index)
	}
}
