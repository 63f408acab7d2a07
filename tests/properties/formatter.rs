use std::str::FromStr;

use alloy::primitives::U256;
use burn_monitor::{
	models::PriceSnapshot,
	utils::{format_decimal, to_decimal, AmountFormatter},
};
use proptest::{prelude::*, test_runner::Config};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::properties::strategies::raw_amount_strategy;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_whole_tokens_convert_exactly(whole in 0u64..10_000_000_000) {
		let raw = U256::from(whole) * U256::from(10u64).pow(U256::from(18u64));
		prop_assert_eq!(to_decimal(raw, 18), Decimal::from(whole));
	}

	#[test]
	fn test_conversion_is_monotonic(a in raw_amount_strategy(), b in raw_amount_strategy()) {
		let (low, high) = if a <= b { (a, b) } else { (b, a) };
		prop_assert!(to_decimal(low, 18) <= to_decimal(high, 18));
	}

	#[test]
	fn test_format_decimal_round_trips_to_two_places(raw in raw_amount_strategy()) {
		let value = to_decimal(raw, 18);
		let text = format_decimal(value);

		let (integer, fraction) = text.split_once('.').unwrap();
		prop_assert_eq!(fraction.len(), 2);
		for (i, group) in integer.split(',').enumerate() {
			if i == 0 {
				prop_assert!(!group.is_empty() && group.len() <= 3);
			} else {
				prop_assert_eq!(group.len(), 3);
			}
		}

		let parsed = Decimal::from_str(&text.replace(',', "")).unwrap();
		let expected = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
		prop_assert_eq!(parsed, expected);
	}

	#[test]
	fn test_usd_clause_present_only_with_rate(
		raw in raw_amount_strategy(),
		rate_millis in prop::option::of(0u32..10_000)
	) {
		let formatter = AmountFormatter::new(18, "$VERSE");
		let snapshot = PriceSnapshot {
			rate_usd_per_token: rate_millis.map(|r| Decimal::new(i64::from(r), 3)),
			..Default::default()
		};

		let text = formatter.format(raw, &snapshot);
		prop_assert!(text.contains(" $VERSE"));
		prop_assert_eq!(text.ends_with(" USD)"), rate_millis.is_some());
	}
}
