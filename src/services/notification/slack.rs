//! Slack notification implementation.
//!
//! Posts messages to Slack channels through the Web API `chat.postMessage`
//! method using a bot token.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::services::notification::{combine_deliveries, send_checked, NotificationError, Notifier};

const DEFAULT_BASE_URL: &str = "https://slack.com";

/// Implementation of Slack notifications via the Web API
pub struct SlackNotifier {
	/// HTTP client with retry middleware
	client: ClientWithMiddleware,
	/// Web API base URL
	base_url: String,
	/// Bot token sent as a bearer credential
	token: Zeroizing<String>,
	/// Channels the message is posted to
	channels: Vec<String>,
}

/// Represents a formatted Slack message
#[derive(Serialize)]
struct SlackMessage<'a> {
	channel: &'a str,
	text: &'a str,
}

/// Envelope returned by every Web API method
#[derive(Deserialize)]
struct SlackResponse {
	ok: bool,
	#[serde(default)]
	error: Option<String>,
}

impl SlackNotifier {
	/// Creates a new Slack notifier instance
	///
	/// # Arguments
	/// * `client` - HTTP client used for every request
	/// * `base_url` - Web API base URL, defaults to `https://slack.com`
	/// * `token` - Bot token
	/// * `channels` - Channel names or IDs
	pub fn new(
		client: ClientWithMiddleware,
		base_url: Option<String>,
		token: Zeroizing<String>,
		channels: Vec<String>,
	) -> Self {
		Self {
			client,
			base_url: base_url
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
				.trim_end_matches('/')
				.to_string(),
			token,
			channels,
		}
	}

	async fn post_message(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
		let request = self
			.client
			.post(format!("{}/api/chat.postMessage", self.base_url))
			.bearer_auth(self.token.as_str())
			.json(&SlackMessage { channel, text });

		let response = send_checked(self.channel(), request).await?;
		let body: SlackResponse = response.json().await?;
		if body.ok {
			Ok(())
		} else {
			Err(NotificationError::api_error(format!(
				"Slack rejected message: {}",
				body.error.unwrap_or_else(|| "unknown error".to_string())
			)))
		}
	}
}

#[async_trait]
impl Notifier for SlackNotifier {
	fn channel(&self) -> &str {
		"slack"
	}

	async fn notify(&self, message: &str) -> Result<(), NotificationError> {
		let mut results = Vec::with_capacity(self.channels.len());
		for channel in &self.channels {
			results.push((channel.clone(), self.post_message(channel, message).await));
		}
		combine_deliveries(self.channel(), results)
	}

	/// Slack unfurls a bare media URL posted as message text
	async fn notify_media(&self, media_url: &str) -> Result<(), NotificationError> {
		self.notify(media_url).await
	}
}
