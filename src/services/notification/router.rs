//! Fan-out of messages to every configured channel.
//!
//! Each channel is attempted independently and concurrently. A failing channel
//! is reported to the operator and recorded in the results; it never prevents
//! delivery to the others and never raises to the caller.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::{
	models::{ChannelOutcome, ChannelResult, NotificationMessage},
	services::notification::{ErrorSink, NotificationError, Notifier},
	utils::metrics::NOTIFICATIONS,
};

/// Delivers messages to an ordered list of channel adapters
pub struct NotificationRouter {
	notifiers: Vec<Arc<dyn Notifier>>,
	error_sink: Arc<ErrorSink>,
}

impl NotificationRouter {
	pub fn new(notifiers: Vec<Arc<dyn Notifier>>, error_sink: Arc<ErrorSink>) -> Self {
		Self {
			notifiers,
			error_sink,
		}
	}

	/// Number of configured channels
	pub fn len(&self) -> usize {
		self.notifiers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.notifiers.is_empty()
	}

	/// Sends a message to every channel
	///
	/// The text goes first; an attached media reference follows on the same
	/// channel. Channels that cannot carry media still count as delivered when
	/// the text went through.
	///
	/// # Returns
	/// * `Vec<ChannelResult>` - One result per channel, in configuration order
	pub async fn broadcast(&self, message: &NotificationMessage) -> Vec<ChannelResult> {
		let deliveries = self.notifiers.iter().map(|notifier| async move {
			let mut result = notifier.notify(&message.text).await;
			if result.is_ok() {
				if let Some(media_url) = &message.media_url {
					result = match notifier.notify_media(media_url).await {
						Err(NotificationError::Unsupported(reason)) => {
							debug!(channel = notifier.channel(), %reason, "media skipped");
							Ok(())
						}
						other => other,
					};
				}
			}
			self.settle(notifier.as_ref(), result).await
		});

		let results = join_all(deliveries).await;
		self.log_summary("message", &results);
		results
	}

	/// Sends a media reference to every channel
	///
	/// # Returns
	/// * `Vec<ChannelResult>` - One result per channel; channels without media
	///   support are `Skipped`
	pub async fn broadcast_media(&self, media_url: &str) -> Vec<ChannelResult> {
		let deliveries = self.notifiers.iter().map(|notifier| async move {
			let result = notifier.notify_media(media_url).await;
			self.settle(notifier.as_ref(), result).await
		});

		let results = join_all(deliveries).await;
		self.log_summary("media", &results);
		results
	}

	/// Converts a delivery result into a `ChannelResult`, reporting failures
	async fn settle(
		&self,
		notifier: &dyn Notifier,
		result: Result<(), NotificationError>,
	) -> ChannelResult {
		let channel = notifier.channel().to_string();
		let outcome = match result {
			Ok(()) => ChannelOutcome::Delivered,
			Err(NotificationError::Unsupported(reason)) => ChannelOutcome::Skipped(reason),
			Err(e) => {
				self.error_sink
					.report(&format!("Error posting to {}", channel), &e)
					.await;
				ChannelOutcome::Failed(e.to_string())
			}
		};

		let result = ChannelResult { channel, outcome };
		NOTIFICATIONS
			.with_label_values(&[&result.channel, result.outcome_label()])
			.inc();
		result
	}

	fn log_summary(&self, kind: &str, results: &[ChannelResult]) {
		let delivered = results.iter().filter(|r| r.is_delivered()).count();
		let failed = results.iter().filter(|r| r.is_failed()).count();
		info!(
			kind,
			delivered,
			failed,
			skipped = results.len() - delivered - failed,
			"broadcast finished"
		);
	}
}
