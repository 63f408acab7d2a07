use std::{
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};

use async_trait::async_trait;
use burn_monitor::{
	models::StartPolicy,
	services::{
		blockchain::BlockChainError,
		blockwatcher::{BlockWatcherService, ChainPoller, PollingSchedule, Sleeper},
		notification::ErrorSink,
	},
};
use tokio::sync::watch;

use crate::integration::mocks::{token_settings, MockChainClient, MockEventHandler};

/// Sleeper that records every requested delay and returns immediately
#[derive(Clone, Default)]
struct CountingSleeper {
	nominal: Arc<AtomicUsize>,
	backoff: Arc<AtomicUsize>,
}

#[async_trait]
impl Sleeper for CountingSleeper {
	async fn sleep(&self, duration: Duration) {
		if duration == Duration::from_millis(50) {
			self.backoff.fetch_add(1, Ordering::SeqCst);
		} else {
			self.nominal.fetch_add(1, Ordering::SeqCst);
		}
		tokio::time::sleep(Duration::from_millis(1)).await;
	}
}

fn schedule() -> PollingSchedule {
	PollingSchedule::new(Duration::from_millis(5), Duration::from_millis(50))
}

#[tokio::test]
async fn test_run_stops_on_shutdown_signal() {
	let mut client = MockChainClient::new();
	client
		.expect_get_latest_block_number()
		.returning(|| Ok(1_000));
	client.expect_get_transfer_logs().returning(|_, _, _| Ok(vec![]));

	let poller = ChainPoller::new(
		Arc::new(client),
		Arc::new(MockEventHandler::new()),
		Arc::new(ErrorSink::default()),
		&token_settings(),
		StartPolicy::Latest,
	);
	let service = BlockWatcherService::new(poller, schedule());

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let handle = tokio::spawn(service.run(shutdown_rx));

	tokio::time::sleep(Duration::from_millis(30)).await;
	shutdown_tx.send(true).unwrap();

	let state = tokio::time::timeout(Duration::from_secs(2), handle)
		.await
		.expect("watcher did not stop")
		.unwrap();
	assert_eq!(state.cursor(), Some(1_000));
}

#[tokio::test]
async fn test_run_returns_immediately_when_already_shut_down() {
	let mut client = MockChainClient::new();
	client.expect_get_latest_block_number().times(0);

	let poller = ChainPoller::new(
		Arc::new(client),
		Arc::new(MockEventHandler::new()),
		Arc::new(ErrorSink::default()),
		&token_settings(),
		StartPolicy::Latest,
	);

	let (_shutdown_tx, shutdown_rx) = watch::channel(true);
	let state = BlockWatcherService::new(poller, schedule())
		.run(shutdown_rx)
		.await;

	assert_eq!(state.cursor(), None);
}

#[tokio::test]
async fn test_run_backs_off_after_fetch_failures() {
	let mut client = MockChainClient::new();
	client
		.expect_get_latest_block_number()
		.returning(|| Err(BlockChainError::connection_error("node down")));

	let poller = ChainPoller::new(
		Arc::new(client),
		Arc::new(MockEventHandler::new()),
		Arc::new(ErrorSink::default()),
		&token_settings(),
		StartPolicy::Latest,
	);
	let sleeper = CountingSleeper::default();
	let service = BlockWatcherService::with_sleeper(poller, schedule(), sleeper.clone());

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let handle = tokio::spawn(service.run(shutdown_rx));

	tokio::time::sleep(Duration::from_millis(20)).await;
	drop(shutdown_tx);

	let state = tokio::time::timeout(Duration::from_secs(2), handle)
		.await
		.expect("watcher did not stop")
		.unwrap();

	assert_eq!(state.cursor(), None);
	assert!(sleeper.backoff.load(Ordering::SeqCst) >= 1);
	assert_eq!(sleeper.nominal.load(Ordering::SeqCst), 0);
}
