//! Notification service implementation.
//!
//! This module provides functionality to deliver messages through the
//! configured broadcast channels:
//! - Channel adapters (Telegram, Slack, Discord, Twitter, Facebook, webhooks)
//! - Fan-out with per-channel failure isolation
//! - Operator alerts through a dedicated channel
//! - Rendering of chain events into messages

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;

mod discord;
mod dispatcher;
mod error;
mod error_sink;
mod facebook;
mod router;
mod slack;
mod telegram;
mod twitter;
mod webhook;

pub use discord::DiscordNotifier;
pub use dispatcher::NotificationDispatcher;
pub use error::NotificationError;
pub use error_sink::ErrorSink;
pub use facebook::FacebookNotifier;
pub use router::NotificationRouter;
pub use slack::SlackNotifier;
pub use telegram::TelegramNotifier;
pub use twitter::TwitterNotifier;
pub use webhook::{WebhookMessage, WebhookNotifier};

use crate::models::{ChannelConfig, ConfigError, SecretValue};

/// Interface for a single broadcast channel
#[async_trait]
pub trait Notifier: Send + Sync {
	/// Stable identifier used in logs, metrics and operator alerts
	fn channel(&self) -> &str;

	/// Sends a text message
	///
	/// # Arguments
	/// * `message` - The rendered message to send
	///
	/// # Returns
	/// * `Result<(), NotificationError>` - Success or the first delivery error
	async fn notify(&self, message: &str) -> Result<(), NotificationError>;

	/// Sends a media reference (an image or animation URL)
	///
	/// Channels without media support return `NotificationError::Unsupported`.
	async fn notify_media(&self, media_url: &str) -> Result<(), NotificationError> {
		Err(NotificationError::unsupported(format!(
			"{} does not deliver media ({})",
			self.channel(),
			media_url
		)))
	}
}

/// Builds the notifier described by a channel configuration
///
/// Secrets are resolved here, so a missing environment variable fails at
/// startup rather than on first delivery.
pub fn create_notifier(
	config: &ChannelConfig,
	client: ClientWithMiddleware,
) -> Result<Arc<dyn Notifier>, NotificationError> {
	let notifier: Arc<dyn Notifier> = match config {
		ChannelConfig::Telegram {
			token,
			chat_ids,
			base_url,
			disable_web_preview,
			parse_mode,
		} => Arc::new(TelegramNotifier::new(
			client,
			base_url.clone(),
			resolve(token)?,
			chat_ids.clone(),
			*disable_web_preview,
			parse_mode.clone(),
		)),
		ChannelConfig::Slack {
			token,
			channels,
			base_url,
		} => Arc::new(SlackNotifier::new(
			client,
			base_url.clone(),
			resolve(token)?,
			channels.clone(),
		)),
		ChannelConfig::Discord { webhook_urls } => {
			let urls = webhook_urls
				.iter()
				.map(resolve)
				.collect::<Result<Vec<_>, _>>()?;
			Arc::new(DiscordNotifier::new(client, urls))
		}
		ChannelConfig::Twitter {
			bearer_token,
			base_url,
		} => Arc::new(TwitterNotifier::new(
			client,
			base_url.clone(),
			resolve(bearer_token)?,
		)),
		ChannelConfig::Facebook {
			page_id,
			access_token,
			base_url,
		} => Arc::new(FacebookNotifier::new(
			client,
			base_url.clone(),
			page_id.clone(),
			resolve(access_token)?,
		)),
		ChannelConfig::Webhook {
			url,
			method,
			secret,
			headers,
		} => {
			let secret = secret.as_ref().map(resolve).transpose()?;
			Arc::new(WebhookNotifier::new(
				client,
				url.clone(),
				method.clone(),
				secret,
				headers.clone(),
			)?)
		}
	};

	Ok(notifier)
}

fn resolve(secret: &SecretValue) -> Result<zeroize::Zeroizing<String>, NotificationError> {
	secret
		.resolve()
		.map_err(|e: ConfigError| NotificationError::config_error(e.to_string()))
}

/// Fails the whole delivery when any destination failed
///
/// Every destination has already been attempted by the caller; the error
/// lists each failed destination with its cause.
pub(crate) fn combine_deliveries(
	channel: &str,
	results: Vec<(String, Result<(), NotificationError>)>,
) -> Result<(), NotificationError> {
	let failures: Vec<String> = results
		.into_iter()
		.filter_map(|(destination, result)| {
			result
				.err()
				.map(|e| format!("{} -> {}", destination, e))
		})
		.collect();

	if failures.is_empty() {
		Ok(())
	} else {
		Err(NotificationError::network_error(format!(
			"{} failed for {} destination(s): {}",
			channel,
			failures.len(),
			failures.join("; ")
		)))
	}
}

/// Sends a prepared request and maps a non-2xx status to an API error
///
/// Transport errors are stripped of the request URL, which may embed a secret.
pub(crate) async fn send_checked(
	channel: &str,
	request: reqwest_middleware::RequestBuilder,
) -> Result<reqwest::Response, NotificationError> {
	let response = request.send().await.map_err(|e| {
		let e = match e {
			reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
			reqwest_middleware::Error::Middleware(e) => e.to_string(),
		};
		NotificationError::network_error(format!("Failed to send {} notification: {}", channel, e))
	})?;

	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let body = response.text().await.unwrap_or_default();
	Err(NotificationError::api_error(format!(
		"{} returned error status {}: {}",
		channel, status, body
	)))
}
