use std::{str::FromStr, sync::Arc};

use burn_monitor::{
	models::PriceSettings,
	services::{
		notification::ErrorSink,
		price::{HttpPriceSource, PriceError, PriceOracleClient},
	},
};
use mockall::Sequence;
use rust_decimal::Decimal;

use crate::integration::mocks::{test_http_client, MockPriceSource, RecordingNotifier};

fn dec(value: &str) -> Decimal {
	Decimal::from_str(value).unwrap()
}

fn http_oracle(server_url: &str, error_sink: Arc<ErrorSink>) -> PriceOracleClient {
	let settings = PriceSettings {
		rate_url: format!("{}/rates/convertor/?q=USD&c=VERSE", server_url),
		rate_currency: "USD".to_string(),
		circulating_supply_url: format!("{}/supply", server_url),
		timeout_ms: 2_000,
	};
	PriceOracleClient::new(
		Arc::new(HttpPriceSource::new(test_http_client(), &settings)),
		error_sink,
	)
}

#[tokio::test]
async fn test_snapshot_is_empty_before_first_refresh() {
	let oracle = PriceOracleClient::new(
		Arc::new(MockPriceSource::new()),
		Arc::new(ErrorSink::default()),
	);

	let snapshot = oracle.snapshot().await;
	assert_eq!(snapshot.rate_usd_per_token, None);
	assert_eq!(snapshot.circulating_supply, None);
	assert_eq!(snapshot.fetched_at, None);
}

#[tokio::test]
async fn test_http_oracle_reads_query_rate_and_scientific_supply() {
	let mut server = mockito::Server::new_async().await;
	let rate = server
		.mock("GET", "/rates/convertor/")
		.match_query(mockito::Matcher::AllOf(vec![
			mockito::Matcher::UrlEncoded("q".into(), "USD".into()),
			mockito::Matcher::UrlEncoded("c".into(), "VERSE".into()),
		]))
		.with_status(200)
		.with_body(r#"{"USD":{"rate":0.00021}}"#)
		.create_async()
		.await;
	let supply = server
		.mock("GET", "/supply")
		.with_status(200)
		.with_body("4.2e10")
		.create_async()
		.await;

	let oracle = http_oracle(&server.url(), Arc::new(ErrorSink::default()));

	assert_eq!(oracle.refresh_rate().await.unwrap(), dec("0.00021"));
	assert_eq!(
		oracle.refresh_circulating_supply().await.unwrap(),
		dec("42000000000")
	);

	let snapshot = oracle.snapshot().await;
	assert_eq!(snapshot.rate_usd_per_token, Some(dec("0.00021")));
	assert_eq!(snapshot.circulating_supply, Some(dec("42000000000")));

	rate.assert_async().await;
	supply.assert_async().await;
}

#[tokio::test]
async fn test_unparseable_supply_is_reported_to_operator() {
	let mut server = mockito::Server::new_async().await;
	let _supply = server
		.mock("GET", "/supply")
		.with_status(200)
		.with_body("<html>maintenance</html>")
		.create_async()
		.await;

	let operator = RecordingNotifier::new("operator");
	let oracle = http_oracle(
		&server.url(),
		Arc::new(ErrorSink::new(Some(operator.clone()))),
	);

	assert!(matches!(
		oracle.refresh_circulating_supply().await,
		Err(PriceError::ParseError(_))
	));
	assert_eq!(oracle.snapshot().await.circulating_supply, None);

	let alerts = operator.texts();
	assert_eq!(alerts.len(), 1);
	assert!(alerts[0].starts_with("🚨 Alert: Error fetching circulating supply"));
}

#[tokio::test]
async fn test_rate_survives_intermittent_failures() {
	let mut source = MockPriceSource::new();
	let mut seq = Sequence::new();
	source
		.expect_fetch_rate()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| Ok(dec("0.002")));
	source
		.expect_fetch_rate()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| Err(PriceError::request_error("timeout")));
	source
		.expect_fetch_rate()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| Ok(dec("0.003")));

	let oracle = PriceOracleClient::new(Arc::new(source), Arc::new(ErrorSink::default()));

	oracle.refresh_rate().await.unwrap();
	assert!(oracle.refresh_rate().await.is_err());
	assert_eq!(
		oracle.snapshot().await.rate_usd_per_token,
		Some(dec("0.002"))
	);

	oracle.refresh_rate().await.unwrap();
	assert_eq!(
		oracle.snapshot().await.rate_usd_per_token,
		Some(dec("0.003"))
	);
}
