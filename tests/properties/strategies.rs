use alloy::primitives::{TxHash, U256};
use burn_monitor::models::BurnRecord;
use proptest::prelude::*;

/// Raw amounts whose 18-decimal value fits a `Decimal` mantissa exactly
pub fn raw_amount_strategy() -> impl Strategy<Value = U256> {
	(0u64..10_000_000_000, 0u64..1_000_000_000_000_000_000u64)
		.prop_map(|(whole, fraction)| {
			U256::from(whole) * U256::from(10u64).pow(U256::from(18u64)) + U256::from(fraction)
		})
}

pub fn burn_records_strategy() -> impl Strategy<Value = Vec<BurnRecord>> {
	prop::collection::vec((any::<u64>(), 0u64..1_000_000, any::<u8>()), 0..40).prop_map(
		|entries| {
			entries
				.into_iter()
				.enumerate()
				.map(|(index, (amount, block_number, tx_byte))| BurnRecord {
					amount: U256::from(amount),
					tx_hash: TxHash::repeat_byte(tx_byte),
					block_number,
					log_index: index as u64,
				})
				.collect()
		},
	)
}
