//! Operator alert channel.
//!
//! Failures anywhere in the pipeline are forwarded here. Delivery is best
//! effort: a failed alert is logged and never propagated.

use std::{fmt::Display, sync::Arc};

use tracing::{error, warn};

use crate::{
	services::notification::Notifier,
	utils::{constants::ALERT_PREFIX, metrics::OPERATOR_ALERTS},
};

/// Forwards failure reports to a dedicated operator channel
#[derive(Clone, Default)]
pub struct ErrorSink {
	notifier: Option<Arc<dyn Notifier>>,
}

impl ErrorSink {
	/// Creates a sink delivering through `notifier`, or a log-only sink for `None`
	pub fn new(notifier: Option<Arc<dyn Notifier>>) -> Self {
		Self { notifier }
	}

	/// Renders the alert text for a failure
	pub fn format_alert(context: &str, error: impl Display) -> String {
		format!("{}{}: {}", ALERT_PREFIX, context, error)
	}

	/// Reports a failure to the operator
	///
	/// # Arguments
	/// * `context` - What was being attempted when the failure happened
	/// * `error` - The failure itself
	pub async fn report(&self, context: &str, error: impl Display) {
		let alert = Self::format_alert(context, error);
		warn!(alert = %alert, "reporting failure to operator");

		let Some(notifier) = &self.notifier else {
			OPERATOR_ALERTS.with_label_values(&["skipped"]).inc();
			return;
		};

		match notifier.notify(&alert).await {
			Ok(()) => {
				OPERATOR_ALERTS.with_label_values(&["delivered"]).inc();
			}
			Err(e) => {
				OPERATOR_ALERTS.with_label_values(&["failed"]).inc();
				error!(
					channel = notifier.channel(),
					error = %e,
					"failed to deliver operator alert"
				);
			}
		}
	}
}
