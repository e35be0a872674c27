//! OpenRouter client against a local mock endpoint.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use common::{MockEndpoint, MockReply};
use flashmaster::ai::{extract_cards, CompletionClient, ExtractionLog, OpenRouterClient};
use flashmaster::config::DEFAULT_MODEL;
use flashmaster::error::AiError;

#[tokio::test]
async fn sends_headers_and_messages() {
    let mock = MockEndpoint::start(MockReply::completion("DES | 3DES | RC4")).await;
    let client = OpenRouterClient::new(&mock.config()).unwrap();

    let reply = client.complete("system prompt", "user text").await.unwrap();
    assert_eq!(reply, "DES | 3DES | RC4");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(request.referer.as_deref(), Some("http://localhost"));
    assert_eq!(request.title.as_deref(), Some("FlashMaster"));
    assert_eq!(request.body["model"], DEFAULT_MODEL);
    assert_eq!(request.body["messages"][0]["role"], "system");
    assert_eq!(request.body["messages"][0]["content"], "system prompt");
    assert_eq!(request.body["messages"][1]["role"], "user");
    assert_eq!(request.body["messages"][1]["content"], "user text");
}

#[tokio::test]
async fn extraction_strips_fences_and_parses() {
    let mock = MockEndpoint::start(MockReply::completion(
        "```csv\nTLS,Transport Layer Security\n\"VPN\",\"Virtual Private Network\"\n```",
    ))
    .await;
    let client = OpenRouterClient::new(&mock.config()).unwrap();
    let mut log = ExtractionLog::new();

    let cards = extract_cards(Some(&client), "networking notes", Duration::from_secs(5), &mut log)
        .await
        .unwrap();

    let pairs: Vec<(&str, &str)> = cards
        .iter()
        .map(|c| (c.term.as_str(), c.definition.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("TLS", "Transport Layer Security"),
            ("VPN", "Virtual Private Network"),
        ]
    );
}

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let mock = MockEndpoint::start(MockReply::raw(
        StatusCode::UNAUTHORIZED,
        r#"{"error":{"message":"No auth credentials found","code":401}}"#,
    ))
    .await;
    let client = OpenRouterClient::new(&mock.config()).unwrap();

    let error = client.complete("s", "u").await.unwrap_err();
    assert!(matches!(error, AiError::Remote { status: 401, .. }));
    assert_eq!(error.to_string(), "No auth credentials found");
}

#[tokio::test]
async fn unreadable_error_body_uses_generic_message() {
    let mock = MockEndpoint::start(MockReply::raw(
        StatusCode::BAD_GATEWAY,
        "<html>upstream down</html>",
    ))
    .await;
    let client = OpenRouterClient::new(&mock.config()).unwrap();

    let error = client.complete("s", "u").await.unwrap_err();
    assert!(matches!(error, AiError::Remote { status: 502, .. }));
    assert_eq!(error.to_string(), "Failed to fetch");
}

#[tokio::test]
async fn empty_choices_are_malformed() {
    let mock = MockEndpoint::start(MockReply::raw(StatusCode::OK, r#"{"choices":[]}"#)).await;
    let client = OpenRouterClient::new(&mock.config()).unwrap();

    let error = client.complete("s", "u").await.unwrap_err();
    assert!(matches!(error, AiError::Malformed(_)));
}

#[tokio::test]
async fn slow_extraction_times_out() {
    let mock = MockEndpoint::start(
        MockReply::completion("AES,Advanced").delayed(Duration::from_secs(5)),
    )
    .await;
    let client = OpenRouterClient::new(&mock.config()).unwrap();
    let mut log = ExtractionLog::new();

    let timeout = Duration::from_millis(200);
    let result = extract_cards(Some(&client), "notes", timeout, &mut log).await;
    assert!(matches!(result, Err(AiError::Timeout(t)) if t == timeout));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = flashmaster::config::Config {
        api_key: Some("sk-test".to_string()),
        base_url: format!("http://{}", addr),
        ..Default::default()
    };
    let client = OpenRouterClient::new(&config).unwrap();

    let error = client.complete("s", "u").await.unwrap_err();
    assert!(matches!(error, AiError::Transport(_)));
}

#[tokio::test]
async fn stalled_endpoint_hits_request_timeout() {
    let mock = MockEndpoint::start(
        MockReply::completion("DES | 3DES | RC4").delayed(Duration::from_secs(3600)),
    )
    .await;
    let config = flashmaster::config::Config {
        request_timeout: Duration::from_millis(300),
        ..mock.config()
    };
    let client = OpenRouterClient::new(&config).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(10), client.complete("s", "u"))
        .await
        .expect("client should give up on its own");
    assert!(matches!(result, Err(AiError::Timeout(t)) if t == Duration::from_millis(300)));
}
