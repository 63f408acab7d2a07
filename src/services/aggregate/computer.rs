//! Aggregate computation over historical burns.
//!
//! Default-range queries (launch block to chain head) go through an in-memory
//! ledger that remembers the last scanned block and only scans the new suffix.
//! A failed scan leaves the ledger untouched, so the next query retries the
//! same suffix.

use std::{collections::HashSet, sync::Arc};

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
	models::{
		AggregateSnapshot, BlockRange, BurnRecord, ChainEvent, EventId, PriceSnapshot,
		TokenSettings,
	},
	services::{
		aggregate::AggregateError,
		blockchain::BlockChainClient,
		filter::EventClassifier,
		notification::ErrorSink,
		price::PriceOracleClient,
	},
	utils::{constants::LAST_BURNS_COUNT, metrics::CLASSIFICATION_ANOMALIES, AmountFormatter},
};

/// Burns already scanned for the default range
#[derive(Debug, Default)]
struct BurnLedger {
	/// Highest block included in `burns`
	scanned_to: Option<u64>,
	/// Burns in chain order
	burns: Vec<BurnRecord>,
}

/// Sums burn amounts
///
/// # Returns
/// * `(total, count)` - Total in the smallest unit and number of burns
pub fn fold_burns(burns: &[BurnRecord]) -> (U256, u64) {
	burns.iter().fold((U256::ZERO, 0u64), |(total, count), burn| {
		(total.saturating_add(burn.amount), count + 1)
	})
}

/// Builds a snapshot from folded totals
///
/// Percentages are zero when the reference supply is zero. The circulating
/// supply falls back to `total_supply` when unknown or zero.
pub fn build_snapshot(
	total_burned: U256,
	event_count: u64,
	decimals: u8,
	total_supply: Decimal,
	circulating_supply: Option<Decimal>,
) -> AggregateSnapshot {
	let tokens = crate::utils::to_decimal(total_burned, decimals);
	let circulating = circulating_supply
		.filter(|supply| *supply > Decimal::ZERO)
		.unwrap_or(total_supply);

	AggregateSnapshot {
		total_burned,
		total_burned_tokens: tokens,
		event_count,
		percent_of_total_supply: percent_of(tokens, total_supply),
		percent_of_circulating_supply: percent_of(tokens, circulating),
	}
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
	if whole <= Decimal::ZERO {
		return Decimal::ZERO;
	}
	part.checked_div(whole)
		.and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
		.unwrap_or(Decimal::ZERO)
}

/// Renders the total-burned summary
pub fn render_totals(
	snapshot: &AggregateSnapshot,
	formatter: &AmountFormatter,
	prices: &PriceSnapshot,
) -> String {
	format!(
		"🔥 Total Burned: {}\nBurn events: {}\nShare of total supply: {:.4}%\nShare of circulating supply: {:.4}%",
		formatter.format_tokens(snapshot.total_burned_tokens, prices),
		snapshot.event_count,
		snapshot.percent_of_total_supply,
		snapshot.percent_of_circulating_supply
	)
}

/// Renders the most recent burns with explorer links
pub fn render_last_burns(
	burns: &[BurnRecord],
	formatter: &AmountFormatter,
	prices: &PriceSnapshot,
	explorer_tx_url: &str,
) -> String {
	let mut response = format!("Last {} 🔥Burns:\n", LAST_BURNS_COUNT);
	if burns.is_empty() {
		response.push_str("No burns recorded yet.\n");
	}
	for burn in burns {
		response.push_str(&format!(
			"Amount: {}, Tx: [Etherscan]({})\n",
			formatter.format(burn.amount, prices),
			explorer_link(explorer_tx_url, &burn.tx_hash.to_string())
		));
	}
	response
}

fn explorer_link(prefix: &str, tx_hash: &str) -> String {
	if prefix.ends_with('/') {
		format!("{}{}", prefix, tx_hash)
	} else {
		format!("{}/{}", prefix, tx_hash)
	}
}

/// Computes burn statistics and answers the on-demand queries
pub struct AggregateComputer {
	client: Arc<dyn BlockChainClient>,
	classifier: EventClassifier,
	formatter: AmountFormatter,
	oracle: Arc<PriceOracleClient>,
	error_sink: Arc<ErrorSink>,
	null_address: Address,
	burn_engine: Address,
	launch_block: u64,
	total_supply: Decimal,
	explorer_tx_url: String,
	ledger: Mutex<BurnLedger>,
}

impl AggregateComputer {
	/// Creates a new aggregate computer
	///
	/// # Arguments
	/// * `client` - Chain client used for scans and balance reads
	/// * `oracle` - Source of rate and circulating supply
	/// * `error_sink` - Destination for failure reports
	/// * `token` - Token addresses, decimals, launch block and total supply
	/// * `explorer_tx_url` - Transaction link prefix
	pub fn new(
		client: Arc<dyn BlockChainClient>,
		oracle: Arc<PriceOracleClient>,
		error_sink: Arc<ErrorSink>,
		token: &TokenSettings,
		explorer_tx_url: impl Into<String>,
	) -> Self {
		Self {
			client,
			classifier: EventClassifier::from_settings(token),
			formatter: AmountFormatter::new(token.decimals, token.symbol.clone()),
			oracle,
			error_sink,
			null_address: token.null_address,
			burn_engine: token.burn_engine_address,
			launch_block: token.launch_block,
			total_supply: token.total_supply,
			explorer_tx_url: explorer_tx_url.into(),
			ledger: Mutex::new(BurnLedger::default()),
		}
	}

	pub fn formatter(&self) -> &AmountFormatter {
		&self.formatter
	}

	/// Computes totals over `range`, or over launch block to head when `None`
	///
	/// # Returns
	/// * `Result<AggregateSnapshot, AggregateError>` - Totals and percentages,
	///   or the scan error
	pub async fn compute_burn_totals(
		&self,
		range: Option<BlockRange>,
	) -> Result<AggregateSnapshot, AggregateError> {
		let burns = match range {
			Some(range) => self.scan_burns(range).await?,
			None => self.ledger_burns().await?,
		};

		// Failure keeps the previous supply, which the snapshot falls back from.
		let _ = self.oracle.refresh_circulating_supply().await;
		let prices = self.oracle.snapshot().await;

		let (total, count) = fold_burns(&burns);
		let snapshot = build_snapshot(
			total,
			count,
			self.formatter.decimals(),
			self.total_supply,
			prices.circulating_supply,
		);
		info!(
			total_burned = %snapshot.total_burned_tokens,
			events = snapshot.event_count,
			"computed burn totals"
		);
		Ok(snapshot)
	}

	/// Returns the `n` most recent burns, newest first
	pub async fn last_n_burns(&self, n: usize) -> Result<Vec<BurnRecord>, AggregateError> {
		let mut burns = self.ledger_burns().await?;
		burns.sort_by(|a, b| {
			(b.block_number, b.log_index).cmp(&(a.block_number, a.log_index))
		});
		burns.truncate(n);
		Ok(burns)
	}

	/// Reads the burn engine's token balance in the smallest unit
	pub async fn engine_balance(&self) -> Result<U256, AggregateError> {
		self.client
			.get_token_balance(self.burn_engine)
			.await
			.map_err(|e| AggregateError::balance_error(e.to_string()))
	}

	/// Total-burned summary text; failures are reported and rendered as a
	/// short apology
	pub async fn total_burned(&self) -> String {
		let _ = self.oracle.refresh_rate().await;
		self.total_burned_summary().await
	}

	/// Same as [`Self::total_burned`] but priced at the rate already held by
	/// the oracle, for callers that refreshed it moments ago
	pub async fn total_burned_summary(&self) -> String {
		match self.compute_burn_totals(None).await {
			Ok(snapshot) => {
				let prices = self.oracle.snapshot().await;
				render_totals(&snapshot, &self.formatter, &prices)
			}
			Err(e) => {
				self.error_sink
					.report("Error computing total burned", &e)
					.await;
				"Unable to compute the total burned right now. Please try again later.".to_string()
			}
		}
	}

	/// Last five burns with explorer links
	pub async fn last_five_burns(&self) -> String {
		let _ = self.oracle.refresh_rate().await;
		match self.last_n_burns(LAST_BURNS_COUNT).await {
			Ok(burns) => {
				let prices = self.oracle.snapshot().await;
				render_last_burns(&burns, &self.formatter, &prices, &self.explorer_tx_url)
			}
			Err(e) => {
				self.error_sink
					.report("Error fetching recent burns", &e)
					.await;
				"Unable to fetch recent burns right now. Please try again later.".to_string()
			}
		}
	}

	/// Current burn engine balance text
	pub async fn current_engine_balance(&self) -> String {
		let _ = self.oracle.refresh_rate().await;
		match self.engine_balance().await {
			Ok(balance) => {
				let prices = self.oracle.snapshot().await;
				format!(
					"Current Burn Engine Balance: {}",
					self.formatter.format(balance, &prices)
				)
			}
			Err(e) => {
				self.error_sink
					.report("Error fetching burn engine balance", &e)
					.await;
				"Unable to read the burn engine balance right now. Please try again later."
					.to_string()
			}
		}
	}

	/// Returns every burn from the launch block to head, scanning only blocks
	/// the ledger has not seen
	async fn ledger_burns(&self) -> Result<Vec<BurnRecord>, AggregateError> {
		let head = self.client.get_latest_block_number().await?;
		let mut ledger = self.ledger.lock().await;

		let from_block = ledger
			.scanned_to
			.map(|scanned| scanned + 1)
			.unwrap_or(self.launch_block);

		if from_block <= head {
			let fresh = self.scan_burns(BlockRange::new(from_block, head)).await?;
			debug!(from_block, to_block = head, found = fresh.len(), "extended burn ledger");
			ledger.burns.extend(fresh);
			ledger.scanned_to = Some(head);
		}

		Ok(ledger.burns.clone())
	}

	/// Scans a block range for burns, in chain order
	async fn scan_burns(&self, range: BlockRange) -> Result<Vec<BurnRecord>, AggregateError> {
		if range.is_empty() {
			return Ok(Vec::new());
		}

		let logs = self
			.client
			.get_transfer_logs(self.null_address, range.from_block, range.to_block)
			.await?;

		let mut seen: HashSet<EventId> = HashSet::new();
		let mut burns = Vec::new();
		for log in &logs {
			match self.classifier.classify(log) {
				Ok(Some(event @ ChainEvent::Burn(_))) => {
					if !seen.insert(event.id()) {
						continue;
					}
					if event.block_number() < range.from_block
						|| event.block_number() > range.to_block
					{
						continue;
					}
					let transfer = event.transfer();
					burns.push(BurnRecord {
						amount: transfer.amount,
						tx_hash: transfer.tx_hash,
						block_number: transfer.block_number,
						log_index: transfer.log_index,
					});
				}
				Ok(_) => {}
				Err(e) => {
					CLASSIFICATION_ANOMALIES.inc();
					self.error_sink
						.report("Dropped malformed burn log during scan", &e)
						.await;
				}
			}
		}

		burns.sort_by_key(|burn| (burn.block_number, burn.log_index));
		Ok(burns)
	}
}
