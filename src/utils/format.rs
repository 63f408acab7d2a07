//! Token amount formatting.
//!
//! Raw amounts arrive as 256-bit integers in the token's smallest unit. They are
//! split into whole and fractional parts with integer arithmetic before being
//! turned into a `Decimal`, so the only precision lost is the final display
//! rounding.

use alloy::primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PriceSnapshot;

/// Largest scale a `Decimal` can carry
const MAX_DECIMAL_SCALE: u8 = 28;

/// Display precision of every formatted amount
const DISPLAY_DECIMALS: u32 = 2;

/// Converts a raw amount into whole tokens using exact integer scaling
///
/// Amounts whose whole part does not fit in a `Decimal` saturate at
/// `Decimal::MAX`. Fractional digits beyond 28 places are truncated.
pub fn to_decimal(raw: U256, decimals: u8) -> Decimal {
	let scale = U256::from(10u64).pow(U256::from(decimals));
	let whole = raw / scale;
	let fraction = raw % scale;

	let whole = match u128::try_from(whole)
		.ok()
		.and_then(|w| i128::try_from(w).ok())
		.and_then(|w| Decimal::try_from_i128_with_scale(w, 0).ok())
	{
		Some(value) => value,
		None => return Decimal::MAX,
	};

	let (fraction, fraction_scale) = if decimals > MAX_DECIMAL_SCALE {
		let excess = U256::from(10u64).pow(U256::from(decimals - MAX_DECIMAL_SCALE));
		(fraction / excess, MAX_DECIMAL_SCALE)
	} else {
		(fraction, decimals)
	};

	// fraction < 10^28 here, which always fits the 96-bit mantissa
	let fraction = u128::try_from(fraction)
		.ok()
		.and_then(|f| i128::try_from(f).ok())
		.and_then(|f| Decimal::try_from_i128_with_scale(f, fraction_scale as u32).ok())
		.unwrap_or(Decimal::ZERO);

	whole.checked_add(fraction).unwrap_or(whole)
}

/// Formats a decimal with thousands separators and exactly two decimals
pub fn format_decimal(value: Decimal) -> String {
	let rounded =
		value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
	let text = format!("{:.2}", rounded);

	let (sign, unsigned) = match text.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", text.as_str()),
	};
	let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

	let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
	for (i, digit) in integer.chars().enumerate() {
		if i > 0 && (integer.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}

	format!("{}{}.{}", sign, grouped, fraction)
}

/// Renders raw token amounts for notifications
#[derive(Debug, Clone)]
pub struct AmountFormatter {
	decimals: u8,
	symbol: String,
}

impl AmountFormatter {
	/// Creates a formatter for a token
	///
	/// # Arguments
	/// * `decimals` - Decimal scale of the token (18 for standard ERC-20 tokens)
	/// * `symbol` - Symbol appended after the amount
	pub fn new(decimals: u8, symbol: impl Into<String>) -> Self {
		Self {
			decimals,
			symbol: symbol.into(),
		}
	}

	pub fn decimals(&self) -> u8 {
		self.decimals
	}

	/// Converts a raw amount to whole tokens
	pub fn to_tokens(&self, raw: U256) -> Decimal {
		to_decimal(raw, self.decimals)
	}

	/// Formats an amount with its USD equivalent
	///
	/// The USD clause is omitted when the snapshot carries no rate.
	///
	/// # Returns
	/// * `String` - e.g. `1,234.50 $VERSE (~$2.47 USD)`
	pub fn format(&self, raw: U256, snapshot: &PriceSnapshot) -> String {
		self.format_tokens(self.to_tokens(raw), snapshot)
	}

	/// Formats an amount already expressed in whole tokens
	pub fn format_tokens(&self, amount: Decimal, snapshot: &PriceSnapshot) -> String {
		let mut text = format!("{} {}", format_decimal(amount), self.symbol);

		if let Some(usd) = snapshot
			.rate_usd_per_token
			.and_then(|rate| amount.checked_mul(rate))
		{
			text.push_str(&format!(" (~${} USD)", format_decimal(usd)));
		}

		text
	}
}
