//! Maps raw `Transfer` logs to deposit and burn events.

use alloy::{primitives::Address, rpc::types::Log, sol_types::SolEvent};

use crate::{
	models::{ChainEvent, TokenSettings, TransferEvent},
	services::{blockchain::IERC20, filter::ClassificationError},
};

/// Pure classifier for token transfers touching the burn engine
///
/// Deposits are transfers whose recipient is the burn engine; burns are
/// transfers whose recipient is the null address. Logs from other contracts or
/// to other recipients yield `Ok(None)`.
#[derive(Debug, Clone, Copy)]
pub struct EventClassifier {
	token: Address,
	burn_engine: Address,
	null_address: Address,
}

impl EventClassifier {
	pub fn new(token: Address, burn_engine: Address, null_address: Address) -> Self {
		Self {
			token,
			burn_engine,
			null_address,
		}
	}

	pub fn from_settings(settings: &TokenSettings) -> Self {
		Self::new(
			settings.token_address,
			settings.burn_engine_address,
			settings.null_address,
		)
	}

	/// Classifies a single log
	///
	/// # Returns
	/// * `Ok(Some(event))` - The log is a deposit or a burn
	/// * `Ok(None)` - The log is unrelated and is dropped silently
	/// * `Err(ClassificationError)` - The log is malformed and must be reported
	pub fn classify(&self, log: &Log) -> Result<Option<ChainEvent>, ClassificationError> {
		if log.address() != self.token {
			return Ok(None);
		}
		if log.topic0() != Some(&IERC20::Transfer::SIGNATURE_HASH) {
			return Ok(None);
		}

		let transfer = IERC20::Transfer::decode_log_data(log.data())
			.map_err(|e| ClassificationError::decode_error(e.to_string()))?;

		let kind = if transfer.to == self.burn_engine {
			ChainEvent::Deposit
		} else if transfer.to == self.null_address {
			ChainEvent::Burn
		} else {
			return Ok(None);
		};

		let tx_hash = log
			.transaction_hash
			.ok_or_else(|| ClassificationError::missing_field("transaction hash"))?;
		if log.removed {
			return Err(ClassificationError::removed_log(tx_hash.to_string()));
		}
		let block_number = log
			.block_number
			.ok_or_else(|| ClassificationError::missing_field("block number"))?;
		let log_index = log
			.log_index
			.ok_or_else(|| ClassificationError::missing_field("log index"))?;

		Ok(Some(kind(TransferEvent {
			amount: transfer.value,
			from: transfer.from,
			tx_hash,
			block_number,
			log_index,
		})))
	}
}
