use serde::Serialize;

/// A rendered notification. Value type with no identity beyond its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
	/// Plain text payload
	pub text: String,
	/// Optional image or animation URL delivered after the text
	pub media_url: Option<String>,
}

impl NotificationMessage {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			media_url: None,
		}
	}

	pub fn with_media(mut self, media_url: Option<String>) -> Self {
		self.media_url = media_url;
		self
	}
}

/// Outcome of a delivery attempt on a single channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ChannelOutcome {
	Delivered,
	/// The channel does not support the requested payload kind
	Skipped(String),
	Failed(String),
}

/// Per-channel result of a broadcast, used for logging and metrics only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelResult {
	pub channel: String,
	pub outcome: ChannelOutcome,
}

impl ChannelResult {
	pub fn is_delivered(&self) -> bool {
		matches!(self.outcome, ChannelOutcome::Delivered)
	}

	pub fn is_failed(&self) -> bool {
		matches!(self.outcome, ChannelOutcome::Failed(_))
	}

	pub fn outcome_label(&self) -> &'static str {
		match self.outcome {
			ChannelOutcome::Delivered => "delivered",
			ChannelOutcome::Skipped(_) => "skipped",
			ChannelOutcome::Failed(_) => "failed",
		}
	}
}
