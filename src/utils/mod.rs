//! Utility modules for common functionality.
//!
//! - constants: Defaults shared by settings and services
//! - format: Token amount formatting
//! - http: Retryable HTTP client construction
//! - logging: Logging setup
//! - metrics: Prometheus metrics and the scrape server

mod format;
mod http;

pub mod constants;
pub mod logging;
pub mod metrics;

pub use format::{format_decimal, to_decimal, AmountFormatter};
pub use http::{create_retryable_http_client, HttpRetryConfig};
