//! Twitter/X notification implementation.
//!
//! Publishes a tweet through the v2 `POST /2/tweets` endpoint using a user
//! context bearer token.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::services::notification::{send_checked, NotificationError, Notifier};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

pub struct TwitterNotifier {
	client: ClientWithMiddleware,
	base_url: String,
	bearer_token: Zeroizing<String>,
}

#[derive(Serialize)]
struct Tweet<'a> {
	text: &'a str,
}

impl TwitterNotifier {
	pub fn new(
		client: ClientWithMiddleware,
		base_url: Option<String>,
		bearer_token: Zeroizing<String>,
	) -> Self {
		Self {
			client,
			base_url: base_url
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
				.trim_end_matches('/')
				.to_string(),
			bearer_token,
		}
	}
}

#[async_trait]
impl Notifier for TwitterNotifier {
	fn channel(&self) -> &str {
		"twitter"
	}

	async fn notify(&self, message: &str) -> Result<(), NotificationError> {
		let request = self
			.client
			.post(format!("{}/2/tweets", self.base_url))
			.bearer_auth(self.bearer_token.as_str())
			.json(&Tweet { text: message });

		send_checked(self.channel(), request).await.map(|_| ())
	}
}
