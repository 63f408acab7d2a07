//! Settings loading errors.
//!
//! Everything that can go wrong between reading `burn_monitor.json` and
//! handing validated settings to bootstrap. None of these are recoverable: the
//! monitor refuses to start.

use log::error;
use std::{error::Error, fmt};

/// Errors raised while loading or validating monitor settings
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
	/// A settings value is out of range or inconsistent with another
	ValidationError(String),

	/// The settings file is not valid JSON for the expected shape
	ParseError(String),

	/// The settings file could not be read
	FileError(String),

	/// A channel secret references an environment variable that is unset or empty
	///
	/// Holds the variable name, never its value.
	MissingSecret(String),
}

impl ConfigError {
	fn format_message(&self) -> String {
		match self {
			Self::ValidationError(msg) => format!("Invalid settings: {}", msg),
			Self::ParseError(msg) => format!("Malformed settings: {}", msg),
			Self::FileError(msg) => format!("Settings file error: {}", msg),
			Self::MissingSecret(name) => {
				format!("Secret environment variable '{}' is not set", name)
			}
		}
	}

	pub fn validation_error(msg: impl Into<String>) -> Self {
		let error = Self::ValidationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn file_error(msg: impl Into<String>) -> Self {
		let error = Self::FileError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a missing secret error for the environment variable `name`
	pub fn missing_secret(name: impl Into<String>) -> Self {
		let error = Self::MissingSecret(name.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
	fn from(err: std::io::Error) -> Self {
		Self::file_error(err.to_string())
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string())
	}
}
