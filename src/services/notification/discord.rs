//! Discord notification implementation.
//!
//! Delivers messages to Discord channels through incoming webhooks.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::services::notification::{combine_deliveries, send_checked, NotificationError, Notifier};

/// Discord rejects content longer than this
const MAX_CONTENT_LENGTH: usize = 2000;

/// Implementation of Discord notifications via webhooks
pub struct DiscordNotifier {
	/// HTTP client with retry middleware
	client: ClientWithMiddleware,
	/// Webhook URLs; each embeds its own credential
	webhook_urls: Vec<Zeroizing<String>>,
}

/// Represents a formatted Discord message
#[derive(Serialize)]
struct DiscordMessage<'a> {
	content: &'a str,
}

impl DiscordNotifier {
	pub fn new(client: ClientWithMiddleware, webhook_urls: Vec<Zeroizing<String>>) -> Self {
		Self {
			client,
			webhook_urls,
		}
	}

	async fn post_all(&self, content: &str) -> Result<(), NotificationError> {
		let content = truncate(content, MAX_CONTENT_LENGTH);
		let mut results = Vec::with_capacity(self.webhook_urls.len());

		for (index, url) in self.webhook_urls.iter().enumerate() {
			let request = self
				.client
				.post(url.as_str())
				.json(&DiscordMessage { content });
			let result = send_checked(self.channel(), request).await.map(|_| ());
			// Label by position; the URL is a credential.
			results.push((format!("webhook #{}", index + 1), result));
		}

		combine_deliveries(self.channel(), results)
	}
}

fn truncate(content: &str, max_chars: usize) -> &str {
	match content.char_indices().nth(max_chars) {
		Some((index, _)) => &content[..index],
		None => content,
	}
}

#[async_trait]
impl Notifier for DiscordNotifier {
	fn channel(&self) -> &str {
		"discord"
	}

	async fn notify(&self, message: &str) -> Result<(), NotificationError> {
		self.post_all(message).await
	}

	async fn notify_media(&self, media_url: &str) -> Result<(), NotificationError> {
		self.post_all(media_url).await
	}
}
