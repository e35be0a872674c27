//! Common test utilities for integration tests.
//!
//! Provides:
//! - MockEndpoint: a local OpenAI-compatible `/chat/completions` server
//! - Scripted completion client for session tests
//! - Sample decks

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::json;

use flashmaster::ai::CompletionClient;
use flashmaster::config::Config;
use flashmaster::error::{AiError, Result};

pub const SECURITY_DECK: &str = "\
AES,Advanced Encryption Standard
CIA,Confidentiality Integrity Availability
MFA,Multi-factor Authentication
RSA,Rivest Shamir Adleman
";

/// What the mock endpoint answers with.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    /// A successful completion whose first choice carries `content`.
    pub fn completion(content: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({
                "id": "gen-1",
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
            })
            .to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One request as the mock endpoint saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub referer: Option<String>,
    pub title: Option<String>,
    pub body: serde_json::Value,
}

struct MockState {
    reply: MockReply,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockEndpoint {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockEndpoint {
    /// Bind to an ephemeral local port and serve `reply` to every request.
    pub async fn start(reply: MockReply) -> Self {
        let state = Arc::new(MockState {
            reply,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/chat/completions", post(complete))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock endpoint");
        let addr = listener.local_addr().expect("Failed to read mock address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Configuration pointing at this endpoint.
    pub fn config(&self) -> Config {
        Config {
            api_key: Some("sk-test".to_string()),
            base_url: self.base_url.clone(),
            ..Config::default()
        }
    }
}

async fn complete(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: header_value("authorization"),
        referer: header_value("http-referer"),
        title: header_value("x-title"),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }
    (
        state.reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.reply.body.clone(),
    )
}

/// Completion client that answers from a fixed script, in order.
///
/// An exhausted script fails like an unreachable endpoint.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// User messages received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(user.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Transport("connection refused".to_string())))
    }
}
