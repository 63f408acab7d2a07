use burn_monitor::services::blockwatcher::PollerState;
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_cursor_tracks_highest_advance(blocks in prop::collection::vec(any::<u64>(), 1..50)) {
		let mut state = PollerState::default();
		let mut previous = None;

		for block in &blocks {
			state.advance_to(*block);
			let cursor = state.cursor();
			if let (Some(before), Some(after)) = (previous, cursor) {
				prop_assert!(after >= before);
			}
			previous = cursor;
		}

		prop_assert_eq!(state.cursor(), blocks.iter().copied().max());
	}

	#[test]
	fn test_advance_reports_change_only_when_moving_forward(start in any::<u64>(), next in any::<u64>()) {
		let mut state = PollerState::with_cursor(start);
		prop_assert_eq!(state.advance_to(next), next > start);
	}
}
