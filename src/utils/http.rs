use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use std::time::Duration;

/// Configuration for HTTP retry policies
#[derive(Debug, Clone)]
pub struct HttpRetryConfig {
	/// Maximum number of retries for transient errors
	pub max_retries: u32,
	/// Base duration for exponential backoff calculations
	pub base_for_backoff: u32,
	/// Initial backoff duration before the first retry
	pub initial_backoff: Duration,
	/// Maximum backoff duration for retries
	pub max_backoff: Duration,
	/// Jitter to apply to the backoff duration
	pub jitter: Jitter,
	/// Timeout applied to every individual request
	pub request_timeout: Duration,
}

impl Default for HttpRetryConfig {
	/// Creates a default configuration with reasonable retry settings
	fn default() -> Self {
		Self {
			max_retries: 2,
			base_for_backoff: 2,
			initial_backoff: Duration::from_millis(250),
			max_backoff: Duration::from_secs(5),
			jitter: Jitter::Full,
			request_timeout: Duration::from_secs(10),
		}
	}
}

impl HttpRetryConfig {
	pub fn with_timeout(timeout: Duration) -> Self {
		Self {
			request_timeout: timeout,
			..Self::default()
		}
	}
}

/// Creates a retryable HTTP client with a bounded request timeout
///
/// # Parameters:
/// - `config`: Configuration for retry policies and timeouts
///
/// # Returns
/// A `ClientWithMiddleware` that retries transient failures, or the error
/// raised while building the underlying client
pub fn create_retryable_http_client(
	config: &HttpRetryConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
	let base_client = reqwest::Client::builder()
		.pool_max_idle_per_host(10)
		.pool_idle_timeout(Some(Duration::from_secs(90)))
		.connect_timeout(config.request_timeout.min(Duration::from_secs(10)))
		.timeout(config.request_timeout)
		.build()?;

	let retry_policy = ExponentialBackoff::builder()
		.base(config.base_for_backoff)
		.retry_bounds(config.initial_backoff, config.max_backoff)
		.jitter(config.jitter)
		.build_with_max_retries(config.max_retries);

	Ok(ClientBuilder::new(base_client)
		.with(RetryTransientMiddleware::new_with_policy(retry_policy))
		.build())
}
