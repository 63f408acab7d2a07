//! Aggregate query error types and handling.

use log::error;
use std::{error::Error, fmt};

use crate::services::blockchain::BlockChainError;

/// Represents possible errors while computing burn statistics
#[derive(Debug)]
pub enum AggregateError {
	/// The historical scan could not read the chain
	ScanError(String),
	/// The token balance could not be read
	BalanceError(String),
}

impl AggregateError {
	fn format_message(&self) -> String {
		match self {
			Self::ScanError(msg) => format!("Burn scan error: {}", msg),
			Self::BalanceError(msg) => format!("Balance query error: {}", msg),
		}
	}

	/// Creates a new scan error with logging
	pub fn scan_error(msg: impl Into<String>) -> Self {
		let error = Self::ScanError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new balance error with logging
	pub fn balance_error(msg: impl Into<String>) -> Self {
		let error = Self::BalanceError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<BlockChainError> for AggregateError {
	fn from(err: BlockChainError) -> Self {
		Self::scan_error(err.to_string())
	}
}

impl fmt::Display for AggregateError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for AggregateError {}
