//! Event rendering and delivery.
//!
//! Turns each classified chain event into a message, refreshing the price
//! first, and hands it to the router. After a burn the running total is
//! announced as well.

use std::sync::Arc;

use alloy::primitives::U256;
use async_trait::async_trait;
use tracing::warn;

use crate::{
	models::{ChainEvent, MessageSettings, NotificationMessage, PriceSnapshot, TransferEvent},
	services::{
		aggregate::AggregateComputer,
		blockwatcher::{BlockWatcherError, EventHandler},
		notification::{ErrorSink, NotificationRouter},
		price::PriceOracleClient,
	},
	utils::AmountFormatter,
};

/// `EventHandler` that broadcasts every event to the configured channels
pub struct NotificationDispatcher {
	router: Arc<NotificationRouter>,
	oracle: Arc<PriceOracleClient>,
	aggregate: Arc<AggregateComputer>,
	error_sink: Arc<ErrorSink>,
	formatter: AmountFormatter,
	messages: MessageSettings,
}

impl NotificationDispatcher {
	pub fn new(
		router: Arc<NotificationRouter>,
		oracle: Arc<PriceOracleClient>,
		aggregate: Arc<AggregateComputer>,
		error_sink: Arc<ErrorSink>,
		messages: MessageSettings,
	) -> Self {
		let formatter = aggregate.formatter().clone();
		Self {
			router,
			oracle,
			aggregate,
			error_sink,
			formatter,
			messages,
		}
	}

	/// Renders a deposit, optionally followed by the engine balance
	pub fn render_deposit(
		&self,
		deposit: &TransferEvent,
		prices: &PriceSnapshot,
		engine_balance: Option<U256>,
	) -> NotificationMessage {
		let mut text = format!(
			"{}: {}",
			self.messages.deposit_prefix,
			self.formatter.format(deposit.amount, prices)
		);
		if let Some(balance) = engine_balance {
			text.push_str(&format!(
				"\nBurn Engine Balance: {}",
				self.formatter.format(balance, prices)
			));
		}
		NotificationMessage::new(text)
	}

	/// Renders a burn with the configured media attachment
	pub fn render_burn(&self, burn: &TransferEvent, prices: &PriceSnapshot) -> NotificationMessage {
		NotificationMessage::new(format!(
			"{}: {}",
			self.messages.burn_prefix,
			self.formatter.format(burn.amount, prices)
		))
		.with_media(self.messages.burn_media_url.clone())
	}
}

#[async_trait]
impl EventHandler for NotificationDispatcher {
	/// Broadcasts one event
	///
	/// # Returns
	/// * `Err(BlockWatcherError)` - Only when every configured channel failed
	async fn handle(&self, event: &ChainEvent) -> Result<(), BlockWatcherError> {
		// A failed refresh keeps the last known rate.
		let _ = self.oracle.refresh_rate().await;
		let prices = self.oracle.snapshot().await;

		let message = match event {
			ChainEvent::Deposit(deposit) => {
				let balance = if self.messages.include_engine_balance {
					match self.aggregate.engine_balance().await {
						Ok(balance) => Some(balance),
						Err(e) => {
							warn!(error = %e, "sending deposit without engine balance");
							self.error_sink
								.report("Error fetching burn engine balance", &e)
								.await;
							None
						}
					}
				} else {
					None
				};
				self.render_deposit(deposit, &prices, balance)
			}
			ChainEvent::Burn(burn) => self.render_burn(burn, &prices),
		};

		let results = self.router.broadcast(&message).await;
		if !results.is_empty() && results.iter().all(|result| result.is_failed()) {
			return Err(BlockWatcherError::processing_error(format!(
				"every channel failed to deliver {} in tx {}",
				event.kind(),
				event.tx_hash()
			)));
		}

		if matches!(event, ChainEvent::Burn(_)) && self.messages.announce_totals_after_burn {
			// The rate was refreshed above.
			let summary = self.aggregate.total_burned_summary().await;
			self.router
				.broadcast(&NotificationMessage::new(summary))
				.await;
		}

		Ok(())
	}
}
