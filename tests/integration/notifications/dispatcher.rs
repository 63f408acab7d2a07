use std::{str::FromStr, sync::Arc};

use burn_monitor::{
	models::{ChainEvent, MessageSettings, TransferEvent},
	services::{
		aggregate::AggregateComputer,
		blockchain::BlockChainError,
		blockwatcher::EventHandler,
		notification::{ErrorSink, NotificationDispatcher, NotificationRouter, Notifier},
		price::PriceOracleClient,
	},
};
use mockall::predicate::*;
use rust_decimal::Decimal;

use crate::integration::mocks::{
	token_settings, tokens, transfer_log, tx, Delivery, MockChainClient, MockPriceSource,
	RecordingNotifier, ENGINE, NULL, SENDER,
};

const BURN_GIF: &str = "https://media.example.com/burn.gif";

fn price_source() -> MockPriceSource {
	let mut source = MockPriceSource::new();
	source
		.expect_fetch_rate()
		.returning(|| Ok(Decimal::from_str("0.07").unwrap()));
	source
		.expect_fetch_circulating_supply()
		.returning(|| Ok(Decimal::from(500_000u64)));
	source
}

fn dispatcher(
	client: MockChainClient,
	notifiers: Vec<Arc<dyn Notifier>>,
	messages: MessageSettings,
) -> NotificationDispatcher {
	dispatcher_with(
		client,
		price_source(),
		notifiers,
		Arc::new(ErrorSink::default()),
		messages,
	)
}

fn dispatcher_with(
	client: MockChainClient,
	source: MockPriceSource,
	notifiers: Vec<Arc<dyn Notifier>>,
	error_sink: Arc<ErrorSink>,
	messages: MessageSettings,
) -> NotificationDispatcher {
	let router = Arc::new(NotificationRouter::new(notifiers, error_sink.clone()));
	let oracle = Arc::new(PriceOracleClient::new(Arc::new(source), error_sink.clone()));
	let aggregate = Arc::new(AggregateComputer::new(
		Arc::new(client),
		oracle.clone(),
		error_sink.clone(),
		&token_settings(),
		"https://etherscan.io/tx/",
	));
	NotificationDispatcher::new(router, oracle, aggregate, error_sink, messages)
}

fn transfer(amount_tokens: u64, block_number: u64, tx_byte: u8) -> TransferEvent {
	TransferEvent {
		amount: tokens(amount_tokens),
		from: SENDER,
		tx_hash: tx(tx_byte),
		block_number,
		log_index: 0,
	}
}

#[tokio::test]
async fn test_deposit_includes_usd_value_and_engine_balance() {
	let mut client = MockChainClient::new();
	client
		.expect_get_token_balance()
		.with(eq(ENGINE))
		.returning(|_| Ok(tokens(1_000)));

	let telegram = RecordingNotifier::new("telegram");
	let discord = RecordingNotifier::new("discord");
	let dispatcher = dispatcher(
		client,
		vec![telegram.clone(), discord.clone()],
		MessageSettings::default(),
	);

	let result = dispatcher
		.handle(&ChainEvent::Deposit(transfer(35, 150, 0x01)))
		.await;

	assert!(result.is_ok());
	let expected = "🚀 Burn Engine Deposit: 35.00 $VERSE (~$2.45 USD)\nBurn Engine Balance: \
	                1,000.00 $VERSE (~$70.00 USD)";
	assert_eq!(telegram.texts(), vec![expected.to_string()]);
	assert_eq!(discord.texts(), vec![expected.to_string()]);
}

#[tokio::test]
async fn test_deposit_without_balance_when_read_fails() {
	let mut client = MockChainClient::new();
	client
		.expect_get_token_balance()
		.returning(|_| Err(BlockChainError::request_error("eth_call reverted")));

	let telegram = RecordingNotifier::new("telegram");
	let operator = RecordingNotifier::new("operator");
	let dispatcher = dispatcher_with(
		client,
		price_source(),
		vec![telegram.clone()],
		Arc::new(ErrorSink::new(Some(operator.clone()))),
		MessageSettings::default(),
	);

	dispatcher
		.handle(&ChainEvent::Deposit(transfer(35, 150, 0x01)))
		.await
		.unwrap();

	assert_eq!(
		telegram.texts(),
		vec!["🚀 Burn Engine Deposit: 35.00 $VERSE (~$2.45 USD)".to_string()]
	);
	let alerts = operator.texts();
	assert_eq!(alerts.len(), 1);
	assert!(alerts[0].starts_with("🚨 Alert: Error fetching burn engine balance"));
}

#[tokio::test]
async fn test_burn_sends_media_then_running_total() {
	let mut client = MockChainClient::new();
	client
		.expect_get_latest_block_number()
		.returning(|| Ok(200));
	client
		.expect_get_transfer_logs()
		.with(eq(NULL), eq(100), eq(200))
		.times(1)
		.returning(|_, _, _| Ok(vec![transfer_log(NULL, tokens(35), 150, 0, 0x02)]));

	let telegram = RecordingNotifier::new("telegram");
	let twitter = RecordingNotifier::text_only("twitter");
	let messages = MessageSettings {
		burn_media_url: Some(BURN_GIF.to_string()),
		..MessageSettings::default()
	};
	let dispatcher = dispatcher(client, vec![telegram.clone(), twitter.clone()], messages);

	dispatcher
		.handle(&ChainEvent::Burn(transfer(35, 150, 0x02)))
		.await
		.unwrap();

	let totals = "🔥 Total Burned: 35.00 $VERSE (~$2.45 USD)\nBurn events: 1\nShare of total \
	              supply: 0.0035%\nShare of circulating supply: 0.0070%";
	assert_eq!(
		telegram.deliveries(),
		vec![
			Delivery::Text("🔥💥 Tokens Burned: 35.00 $VERSE (~$2.45 USD)".to_string()),
			Delivery::Media(BURN_GIF.to_string()),
			Delivery::Text(totals.to_string()),
		]
	);
	assert_eq!(
		twitter.texts(),
		vec![
			"🔥💥 Tokens Burned: 35.00 $VERSE (~$2.45 USD)".to_string(),
			totals.to_string(),
		]
	);
}

#[tokio::test]
async fn test_burn_without_total_announcement() {
	let client = MockChainClient::new();
	let telegram = RecordingNotifier::new("telegram");
	let messages = MessageSettings {
		announce_totals_after_burn: false,
		..MessageSettings::default()
	};
	let dispatcher = dispatcher(client, vec![telegram.clone()], messages);

	dispatcher
		.handle(&ChainEvent::Burn(transfer(1, 150, 0x03)))
		.await
		.unwrap();

	assert_eq!(telegram.deliveries().len(), 1);
}

#[tokio::test]
async fn test_dispatch_fails_only_when_every_channel_fails() {
	let messages = MessageSettings {
		announce_totals_after_burn: false,
		..MessageSettings::default()
	};

	let healthy = RecordingNotifier::new("telegram");
	let partial = dispatcher(
		MockChainClient::new(),
		vec![RecordingNotifier::failing("slack"), healthy.clone()],
		messages.clone(),
	);
	assert!(partial
		.handle(&ChainEvent::Burn(transfer(1, 150, 0x04)))
		.await
		.is_ok());
	assert_eq!(healthy.texts().len(), 1);

	let all_down = dispatcher(
		MockChainClient::new(),
		vec![
			RecordingNotifier::failing("slack"),
			RecordingNotifier::failing("discord"),
		],
		messages,
	);
	assert!(all_down
		.handle(&ChainEvent::Burn(transfer(1, 150, 0x05)))
		.await
		.is_err());
}

#[tokio::test]
async fn test_burn_refreshes_rate_once() {
	let mut client = MockChainClient::new();
	client
		.expect_get_latest_block_number()
		.returning(|| Ok(200));
	client
		.expect_get_transfer_logs()
		.returning(|_, _, _| Ok(vec![transfer_log(NULL, tokens(35), 150, 0, 0x06)]));

	let mut source = MockPriceSource::new();
	source
		.expect_fetch_rate()
		.times(1)
		.returning(|| Ok(Decimal::from_str("0.07").unwrap()));
	source
		.expect_fetch_circulating_supply()
		.returning(|| Ok(Decimal::from(500_000u64)));

	let telegram = RecordingNotifier::new("telegram");
	let dispatcher = dispatcher_with(
		client,
		source,
		vec![telegram.clone()],
		Arc::new(ErrorSink::default()),
		MessageSettings::default(),
	);

	dispatcher
		.handle(&ChainEvent::Burn(transfer(35, 150, 0x06)))
		.await
		.unwrap();

	let texts = telegram.texts();
	assert_eq!(texts.len(), 2);
	assert!(texts[1].starts_with("🔥 Total Burned: 35.00 $VERSE (~$2.45 USD)"));
}
