//! Blockchain error types and handling.
//!
//! Errors raised while talking to the JSON-RPC node: connectivity, malformed
//! requests or responses, and calls that exceed the configured deadline.

use std::time::Duration;

use log::error;

use crate::services::blockwatcher::BlockWatcherError;

/// Represents possible errors that can occur during blockchain operations
#[derive(Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	ConnectionError(String),

	/// Errors related to malformed requests or invalid responses
	RequestError(String),

	/// A call did not complete within the configured deadline
	///
	/// Contains the operation name and the deadline that elapsed
	Timeout(String, Duration),

	/// Internal errors within the blockchain client
	InternalError(String),
}

impl BlockChainError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::ConnectionError(msg) => format!("Connection error: {}", msg),
			Self::RequestError(msg) => format!("Request error: {}", msg),
			Self::Timeout(operation, limit) => {
				format!("Timeout: {} did not complete within {:?}", operation, limit)
			}
			Self::InternalError(msg) => format!("Internal error: {}", msg),
		}
	}

	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new timeout error with logging
	pub fn timeout(operation: impl Into<String>, limit: Duration) -> Self {
		let error = Self::Timeout(operation.into(), limit);
		error!("{}", error.format_message());
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl std::fmt::Display for BlockChainError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for BlockChainError {}

/// Conversion from BlockChainError to BlockWatcherError
impl From<BlockChainError> for BlockWatcherError {
	fn from(err: BlockChainError) -> Self {
		BlockWatcherError::network_error(err.to_string())
	}
}
