//! Price oracle error types and handling.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors while fetching market data
#[derive(Debug)]
pub enum PriceError {
	/// The upstream endpoint could not be reached or answered with an error
	RequestError(String),
	/// The upstream response did not contain a usable number
	ParseError(String),
}

impl PriceError {
	fn format_message(&self) -> String {
		match self {
			Self::RequestError(msg) => format!("Price request error: {}", msg),
			Self::ParseError(msg) => format!("Price parse error: {}", msg),
		}
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new parse error with logging
	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<reqwest::Error> for PriceError {
	fn from(error: reqwest::Error) -> Self {
		Self::request_error(error.to_string())
	}
}

impl From<reqwest_middleware::Error> for PriceError {
	fn from(error: reqwest_middleware::Error) -> Self {
		Self::request_error(error.to_string())
	}
}

impl fmt::Display for PriceError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for PriceError {}
