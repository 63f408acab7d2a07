//! Bootstrap module for wiring the monitor's services together.
//!
//! # Services
//! - `ErrorSink`: Operator alerts
//! - `NotificationRouter`: Fan-out to every configured channel
//! - `PriceOracleClient`: Cached market data
//! - `AggregateComputer`: Burn totals and history queries
//! - `NotificationDispatcher`: Renders chain events and hands them to the router
//!
//! # Watcher
//! - `create_block_watcher`: Builds the polling loop around a chain client and
//!   the dispatcher

use std::{error::Error, sync::Arc, time::Duration};

use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;
use tracing::info;

use crate::{
	models::{ChannelConfig, MonitorSettings},
	services::{
		aggregate::AggregateComputer,
		blockchain::BlockChainClient,
		blockwatcher::{BlockWatcherService, ChainPoller, PollingSchedule},
		notification::{
			create_notifier, ErrorSink, NotificationDispatcher, NotificationError,
			NotificationRouter, Notifier,
		},
		price::{HttpPriceSource, PriceOracleClient, PriceSource},
	},
	utils::{
		constants::DEFAULT_HTTP_TIMEOUT_MS, create_retryable_http_client, HttpRetryConfig,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Debug, Error)]
pub enum BootstrapError {
	#[error("Failed to create HTTP client: {0}")]
	HttpClientBuildError(#[from] reqwest::Error),

	#[error("Failed to create notifier for channel {index}: {source}")]
	NotifierBuildError {
		index: usize,
		#[source]
		source: NotificationError,
	},

	#[error("Failed to create operator notifier: {0}")]
	OperatorChannelError(#[source] NotificationError),

	#[error("polling.start must be configured (\"latest\" or a block number)")]
	MissingStartPolicy,
}

/// Every long-lived service shared by the watcher and the query entry points
#[derive(Clone)]
pub struct MonitorServices {
	pub error_sink: Arc<ErrorSink>,
	pub router: Arc<NotificationRouter>,
	pub oracle: Arc<PriceOracleClient>,
	pub aggregate: Arc<AggregateComputer>,
	pub dispatcher: Arc<NotificationDispatcher>,
}

/// Creates the shared HTTP client used by channel adapters and the price source
pub fn create_http_client() -> std::result::Result<ClientWithMiddleware, BootstrapError> {
	let config = HttpRetryConfig::with_timeout(Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS));
	Ok(create_retryable_http_client(&config)?)
}

/// Builds one notifier per channel configuration
///
/// # Errors
/// Returns an error when a channel's secret cannot be resolved or its
/// configuration is rejected by the adapter
pub fn create_notifiers(
	channels: &[ChannelConfig],
	client: &ClientWithMiddleware,
) -> std::result::Result<Vec<Arc<dyn Notifier>>, BootstrapError> {
	channels
		.iter()
		.enumerate()
		.map(|(index, channel)| {
			create_notifier(channel, client.clone())
				.map_err(|source| BootstrapError::NotifierBuildError { index, source })
		})
		.collect()
}

/// Initializes all services for the monitor
///
/// # Arguments
/// * `settings` - Validated monitor settings
/// * `client` - Chain client shared by the poller and the aggregate queries
/// * `price_source` - Market data source; `None` uses the configured HTTP endpoints
///
/// # Errors
/// Returns an error if a channel cannot be built
pub fn initialize_services(
	settings: &MonitorSettings,
	client: Arc<dyn BlockChainClient>,
	price_source: Option<Arc<dyn PriceSource>>,
) -> std::result::Result<MonitorServices, BootstrapError> {
	let http_client = create_http_client()?;

	let operator = settings
		.operator_channel
		.as_ref()
		.map(|channel| create_notifier(channel, http_client.clone()))
		.transpose()
		.map_err(BootstrapError::OperatorChannelError)?;
	let error_sink = Arc::new(ErrorSink::new(operator));

	let notifiers = create_notifiers(&settings.channels, &http_client)?;
	info!(
		channels = notifiers.len(),
		operator_channel = settings.operator_channel.is_some(),
		"notification channels configured"
	);
	let router = Arc::new(NotificationRouter::new(notifiers, error_sink.clone()));

	let price_source: Arc<dyn PriceSource> = match price_source {
		Some(source) => source,
		None => Arc::new(HttpPriceSource::new(http_client.clone(), &settings.price)),
	};
	let oracle = Arc::new(PriceOracleClient::new(price_source, error_sink.clone()));

	let aggregate = Arc::new(AggregateComputer::new(
		client,
		oracle.clone(),
		error_sink.clone(),
		&settings.token,
		settings.chain.explorer_tx_url.clone(),
	));

	let dispatcher = Arc::new(NotificationDispatcher::new(
		router.clone(),
		oracle.clone(),
		aggregate.clone(),
		error_sink.clone(),
		settings.messages.clone(),
	));

	Ok(MonitorServices {
		error_sink,
		router,
		oracle,
		aggregate,
		dispatcher,
	})
}

/// Creates the block watcher for the configured start policy and schedule
///
/// # Errors
/// Returns an error when no start policy is configured
pub fn create_block_watcher(
	settings: &MonitorSettings,
	client: Arc<dyn BlockChainClient>,
	services: &MonitorServices,
) -> std::result::Result<BlockWatcherService, BootstrapError> {
	let start = settings
		.polling
		.start
		.ok_or(BootstrapError::MissingStartPolicy)?;

	let poller = ChainPoller::new(
		client,
		services.dispatcher.clone(),
		services.error_sink.clone(),
		&settings.token,
		start,
	);

	Ok(BlockWatcherService::new(
		poller,
		PollingSchedule::from_settings(&settings.polling),
	))
}
