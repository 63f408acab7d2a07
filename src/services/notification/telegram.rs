//! Telegram notification implementation.
//!
//! Sends messages through the Bot API to one or more chats: text with
//! `sendMessage` and media with `sendDocument`.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::services::notification::{combine_deliveries, send_checked, NotificationError, Notifier};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Implementation of Telegram notifications via the Bot API
pub struct TelegramNotifier {
	/// HTTP client with retry middleware
	client: ClientWithMiddleware,
	/// Bot API base URL
	base_url: String,
	/// Telegram bot token
	token: Zeroizing<String>,
	/// Target chat IDs
	chat_ids: Vec<String>,
	/// Disable web preview
	disable_web_preview: bool,
	/// Optional Bot API formatting mode, `None` sends plain text
	parse_mode: Option<String>,
}

#[derive(Serialize)]
struct SendMessage<'a> {
	chat_id: &'a str,
	text: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	parse_mode: Option<&'a str>,
	disable_web_page_preview: bool,
}

#[derive(Serialize)]
struct SendDocument<'a> {
	chat_id: &'a str,
	document: &'a str,
}

impl TelegramNotifier {
	/// Creates a new Telegram notifier instance
	///
	/// # Arguments
	/// * `client` - HTTP client used for every request
	/// * `base_url` - Bot API base URL, defaults to `https://api.telegram.org`
	/// * `token` - Telegram bot token
	/// * `chat_ids` - Telegram chat IDs
	/// * `disable_web_preview` - Disable web preview
	/// * `parse_mode` - `Markdown`, `MarkdownV2` or `HTML`; plain text when `None`
	pub fn new(
		client: ClientWithMiddleware,
		base_url: Option<String>,
		token: Zeroizing<String>,
		chat_ids: Vec<String>,
		disable_web_preview: Option<bool>,
		parse_mode: Option<String>,
	) -> Self {
		Self {
			client,
			base_url: base_url
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
				.trim_end_matches('/')
				.to_string(),
			token,
			chat_ids,
			disable_web_preview: disable_web_preview.unwrap_or(false),
			parse_mode,
		}
	}

	pub fn construct_url(&self, method: &str) -> String {
		format!("{}/bot{}/{}", self.base_url, self.token.as_str(), method)
	}

	async fn post<T: Serialize>(&self, method: &str, body: &T) -> Result<(), NotificationError> {
		let request = self.client.post(self.construct_url(method)).json(body);
		send_checked(self.channel(), request).await.map(|_| ())
	}
}

#[async_trait]
impl Notifier for TelegramNotifier {
	fn channel(&self) -> &str {
		"telegram"
	}

	async fn notify(&self, message: &str) -> Result<(), NotificationError> {
		let mut results = Vec::with_capacity(self.chat_ids.len());
		for chat_id in &self.chat_ids {
			let body = SendMessage {
				chat_id,
				text: message,
				parse_mode: self.parse_mode.as_deref(),
				disable_web_page_preview: self.disable_web_preview,
			};
			results.push((chat_id.clone(), self.post("sendMessage", &body).await));
		}
		combine_deliveries(self.channel(), results)
	}

	async fn notify_media(&self, media_url: &str) -> Result<(), NotificationError> {
		let mut results = Vec::with_capacity(self.chat_ids.len());
		for chat_id in &self.chat_ids {
			let body = SendDocument {
				chat_id,
				document: media_url,
			};
			results.push((chat_id.clone(), self.post("sendDocument", &body).await));
		}
		combine_deliveries(self.channel(), results)
	}
}
