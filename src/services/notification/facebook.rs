//! Facebook page notification implementation.
//!
//! Publishes a post to a page feed through the Graph API.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::services::notification::{send_checked, NotificationError, Notifier};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

pub struct FacebookNotifier {
	client: ClientWithMiddleware,
	base_url: String,
	page_id: String,
	access_token: Zeroizing<String>,
}

#[derive(Serialize)]
struct FeedPost<'a> {
	message: &'a str,
	access_token: &'a str,
}

impl FacebookNotifier {
	pub fn new(
		client: ClientWithMiddleware,
		base_url: Option<String>,
		page_id: String,
		access_token: Zeroizing<String>,
	) -> Self {
		Self {
			client,
			base_url: base_url
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
				.trim_end_matches('/')
				.to_string(),
			page_id,
			access_token,
		}
	}
}

#[async_trait]
impl Notifier for FacebookNotifier {
	fn channel(&self) -> &str {
		"facebook"
	}

	async fn notify(&self, message: &str) -> Result<(), NotificationError> {
		let request = self
			.client
			.post(format!("{}/{}/feed", self.base_url, self.page_id))
			.json(&FeedPost {
				message,
				access_token: self.access_token.as_str(),
			});

		send_checked(self.channel(), request).await.map(|_| ())
	}
}
