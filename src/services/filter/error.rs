//! Classification error types.
//!
//! A classification error marks one log as unusable. The log is dropped and
//! the rest of the batch continues.

use std::error::Error;
use std::fmt;

use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
	/// The log data or topics do not decode as an ERC-20 `Transfer`
	DecodeError(String),
	/// The log lacks a field every mined log carries
	MissingField(&'static str),
	/// The node flagged the log as removed by a reorganization
	RemovedLog(String),
}

impl ClassificationError {
	fn format_message(&self) -> String {
		match self {
			ClassificationError::DecodeError(msg) => format!("Decode error: {}", msg),
			ClassificationError::MissingField(field) => {
				format!("Malformed log: missing {}", field)
			}
			ClassificationError::RemovedLog(tx) => format!("Removed log in transaction {}", tx),
		}
	}

	pub fn decode_error(msg: impl Into<String>) -> Self {
		let error = ClassificationError::DecodeError(msg.into());
		warn!("{}", error.format_message());
		error
	}

	pub fn missing_field(field: &'static str) -> Self {
		let error = ClassificationError::MissingField(field);
		warn!("{}", error.format_message());
		error
	}

	pub fn removed_log(tx: impl Into<String>) -> Self {
		let error = ClassificationError::RemovedLog(tx.into());
		warn!("{}", error.format_message());
		error
	}
}

impl fmt::Display for ClassificationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ClassificationError {}
