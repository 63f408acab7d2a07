use std::collections::HashMap;

use burn_monitor::{
	models::{ChannelConfig, SecretValue},
	services::notification::create_notifier,
};
use mockito::Matcher;
use serde_json::json;

use crate::integration::mocks::test_http_client;

#[tokio::test]
async fn test_webhook_from_config_signs_with_environment_secret() {
	std::env::set_var("BURN_MONITOR_TEST_WEBHOOK_SECRET", "shared-secret");

	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("PUT", "/events")
		.match_header("x-signature", Matcher::Regex("^[0-9a-f]{64}$".to_string()))
		.match_header("x-timestamp", Matcher::Regex("^[0-9]+$".to_string()))
		.match_header("x-source", "burn-monitor")
		.match_header("content-type", "application/json")
		.match_body(Matcher::Json(json!({
			"text": "🚀 Burn Engine Deposit: 2.00 $VERSE"
		})))
		.with_status(200)
		.create_async()
		.await;

	let config = ChannelConfig::Webhook {
		url: format!("{}/events", server.url()),
		method: Some("put".to_string()),
		secret: Some(SecretValue::Environment(
			"BURN_MONITOR_TEST_WEBHOOK_SECRET".to_string(),
		)),
		headers: Some(HashMap::from([(
			"x-source".to_string(),
			"burn-monitor".to_string(),
		)])),
	};
	let notifier = create_notifier(&config, test_http_client()).unwrap();

	notifier
		.notify("🚀 Burn Engine Deposit: 2.00 $VERSE")
		.await
		.unwrap();
	mock.assert_async().await;
}

#[tokio::test]
async fn test_webhook_rejection_is_an_error() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(400)
		.with_body("bad payload")
		.create_async()
		.await;

	let config = ChannelConfig::Webhook {
		url: server.url(),
		method: None,
		secret: None,
		headers: None,
	};
	let notifier = create_notifier(&config, test_http_client()).unwrap();

	let error = notifier.notify("hello").await.unwrap_err();
	assert!(error.to_string().contains("400"));
	mock.assert_async().await;
}

#[test]
fn test_webhook_with_invalid_header_is_rejected() {
	let config = ChannelConfig::Webhook {
		url: "https://hooks.example.com".to_string(),
		method: None,
		secret: None,
		headers: Some(HashMap::from([(
			"bad header".to_string(),
			"value".to_string(),
		)])),
	};

	assert!(create_notifier(&config, test_http_client()).is_err());
}
