//! Webhook notification implementation.
//!
//! Delivers messages as JSON to an arbitrary HTTP endpoint, optionally signed
//! with an HMAC-SHA256 over the payload and a millisecond timestamp.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{
	header::{HeaderMap, HeaderName, HeaderValue},
	Method,
};
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::services::notification::{send_checked, NotificationError, Notifier};

/// HMAC SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Implementation of notifications via generic webhooks
pub struct WebhookNotifier {
	/// HTTP client with retry middleware
	client: ClientWithMiddleware,
	/// Webhook URL for message delivery
	url: String,
	/// HTTP method to use for the webhook request
	method: Method,
	/// Secret used to sign the request
	secret: Option<Zeroizing<String>>,
	/// Static headers added to every request
	headers: HeaderMap,
}

/// Represents a formatted webhook message
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WebhookMessage {
	/// The rendered message text
	pub text: String,
	/// Attached media reference
	#[serde(skip_serializing_if = "Option::is_none")]
	pub media_url: Option<String>,
}

impl WebhookNotifier {
	/// Creates a new Webhook notifier instance
	///
	/// # Arguments
	/// * `client` - HTTP client used for every request
	/// * `url` - Webhook URL
	/// * `method` - HTTP method to use for the webhook request (optional, defaults to POST)
	/// * `secret` - Secret to use for the webhook request (optional)
	/// * `headers` - Headers to use for the webhook request (optional)
	///
	/// # Returns
	/// * `Result<Self, NotificationError>` - Notifier, or a config error for an
	///   invalid method or header
	pub fn new(
		client: ClientWithMiddleware,
		url: String,
		method: Option<String>,
		secret: Option<Zeroizing<String>>,
		headers: Option<HashMap<String, String>>,
	) -> Result<Self, NotificationError> {
		let method = match method {
			Some(m) => Method::from_bytes(m.to_uppercase().as_bytes()).map_err(|_| {
				NotificationError::config_error(format!("Invalid HTTP method: {}", m))
			})?,
			None => Method::POST,
		};

		let mut header_map = HeaderMap::new();
		for (key, value) in headers.unwrap_or_default() {
			let Ok(header_name) = HeaderName::from_bytes(key.as_bytes()) else {
				return Err(NotificationError::config_error(format!(
					"Invalid header name: {}",
					key
				)));
			};
			let Ok(header_value) = HeaderValue::from_str(&value) else {
				return Err(NotificationError::config_error(format!(
					"Invalid header value for key: {}",
					key
				)));
			};
			header_map.insert(header_name, header_value);
		}

		Ok(Self {
			client,
			url,
			method,
			secret,
			headers: header_map,
		})
	}

	/// Signs a payload for the `X-Signature` / `X-Timestamp` headers
	///
	/// # Returns
	/// * `(signature, timestamp)` - Hex HMAC of `payload_json || timestamp` and the
	///   millisecond timestamp it covers
	pub fn sign_payload(
		secret: &str,
		payload_json: &str,
		timestamp: i64,
	) -> Result<String, NotificationError> {
		let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
			.map_err(|e| NotificationError::config_error(format!("Invalid secret: {}", e)))?;
		mac.update(payload_json.as_bytes());
		mac.update(timestamp.to_string().as_bytes());
		Ok(hex::encode(mac.finalize().into_bytes()))
	}

	async fn deliver(&self, payload: &WebhookMessage) -> Result<(), NotificationError> {
		let body = serde_json::to_string(payload).map_err(|e| {
			NotificationError::internal_error(format!("Failed to serialize payload: {}", e))
		})?;

		let mut headers = self.headers.clone();
		headers.insert(
			reqwest::header::CONTENT_TYPE,
			HeaderValue::from_static("application/json"),
		);

		if let Some(secret) = &self.secret {
			let timestamp = Utc::now().timestamp_millis();
			let signature = Self::sign_payload(secret, &body, timestamp)?;
			let signature = HeaderValue::from_str(&signature).map_err(|_| {
				NotificationError::internal_error("Invalid signature value")
			})?;
			headers.insert(HeaderName::from_static("x-signature"), signature);
			headers.insert(
				HeaderName::from_static("x-timestamp"),
				HeaderValue::from(timestamp),
			);
		}

		let request = self
			.client
			.request(self.method.clone(), self.url.as_str())
			.headers(headers)
			.body(body);

		send_checked(self.channel(), request).await.map(|_| ())
	}
}

#[async_trait]
impl Notifier for WebhookNotifier {
	fn channel(&self) -> &str {
		"webhook"
	}

	async fn notify(&self, message: &str) -> Result<(), NotificationError> {
		self.deliver(&WebhookMessage {
			text: message.to_string(),
			media_url: None,
		})
		.await
	}

	async fn notify_media(&self, media_url: &str) -> Result<(), NotificationError> {
		self.deliver(&WebhookMessage {
			text: String::new(),
			media_url: Some(media_url.to_string()),
		})
		.await
	}
}
