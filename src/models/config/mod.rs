//! Configuration loading and validation.
//!
//! The service reads a single JSON document describing the chain, the token,
//! the polling schedule and the notification channels. Loading fails fast: a
//! configuration that does not validate never produces running services.

use std::path::Path;

mod error;
mod settings_config;

pub use error::ConfigError;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	/// Load and validate a configuration from a specific file
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validate the loaded configuration
	fn validate(&self) -> Result<(), ConfigError>;

	/// Check if a file is a JSON file based on its extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
