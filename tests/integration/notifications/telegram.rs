use burn_monitor::{
	models::{ChannelConfig, SecretValue},
	services::notification::{create_notifier, ErrorSink},
};
use mockito::Matcher;
use serde_json::json;

use crate::integration::mocks::test_http_client;

fn operator_channel(base_url: String, chat_ids: &[&str]) -> ChannelConfig {
	ChannelConfig::Telegram {
		token: SecretValue::Plain("ops-token".to_string()),
		chat_ids: chat_ids.iter().map(|id| id.to_string()).collect(),
		base_url: Some(base_url),
		disable_web_preview: Some(true),
		parse_mode: None,
	}
}

#[tokio::test]
async fn test_operator_alert_is_delivered_as_plain_text() {
	let mut server = mockito::Server::new_async().await;
	// No parse_mode: a lone `_` would be rejected as an unbalanced Markdown entity.
	let mock = server
		.mock("POST", "/botops-token/sendMessage")
		.match_body(Matcher::Json(json!({
			"chat_id": "42",
			"text": "🚨 Alert: Error in event monitoring: Request error: eth_getLogs failed: boom",
			"disable_web_page_preview": true
		})))
		.with_status(200)
		.with_body(r#"{"ok": true}"#)
		.expect(1)
		.create_async()
		.await;

	let notifier = create_notifier(&operator_channel(server.url(), &["42"]), test_http_client())
		.unwrap();
	let sink = ErrorSink::new(Some(notifier));

	sink.report(
		"Error in event monitoring",
		"Request error: eth_getLogs failed: boom",
	)
	.await;

	mock.assert_async().await;
}

#[tokio::test]
async fn test_operator_alert_failure_is_swallowed() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/botops-token/sendMessage")
		.with_status(502)
		.expect(2)
		.create_async()
		.await;

	let notifier = create_notifier(
		&operator_channel(server.url(), &["1", "2"]),
		test_http_client(),
	)
	.unwrap();
	let sink = ErrorSink::new(Some(notifier));

	// Every chat is attempted even though the first one failed.
	sink.report("Error posting to slack", "API error").await;

	mock.assert_async().await;
}

#[tokio::test]
async fn test_burn_media_is_sent_as_document() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/botops-token/sendDocument")
		.match_body(Matcher::Json(json!({
			"chat_id": "42",
			"document": "https://media.example.com/burn.gif"
		})))
		.with_status(200)
		.with_body(r#"{"ok": true}"#)
		.create_async()
		.await;

	let notifier = create_notifier(&operator_channel(server.url(), &["42"]), test_http_client())
		.unwrap();

	notifier
		.notify_media("https://media.example.com/burn.gif")
		.await
		.unwrap();
	mock.assert_async().await;
}
