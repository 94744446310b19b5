//! Mock text-to-speech webhook for integration tests
//!
//! Answers every `POST /tts` with one canned response and records what it
//! received.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// Canned webhook reply
#[derive(Clone)]
pub struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
    delay: Option<Duration>,
}

impl Reply {
    /// Raw audio bytes with the given content type
    pub fn audio(content_type: &'static str, body: &[u8]) -> Self {
        Self {
            status: StatusCode::OK,
            content_type,
            body: body.to_vec(),
            delay: None,
        }
    }

    /// JSON body
    pub fn json(value: &serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: serde_json::to_vec(value).expect("serializable"),
            delay: None,
        }
    }

    /// Arbitrary body with an arbitrary status
    pub fn raw(status: u16, content_type: &'static str, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            content_type,
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    /// Hold the reply back for `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request the mock received
#[derive(Debug, Clone)]
pub struct Received {
    pub body: serde_json::Value,
    pub authorization: Option<String>,
    pub headers: HeaderMap,
}

struct MockState {
    reply: Reply,
    received: Mutex<Vec<Received>>,
}

/// Mock webhook server
pub struct MockWebhook {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockWebhook {
    /// Start the mock, answering every request with `reply`
    pub async fn start(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/tts", routing::post(handle_tts))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Webhook URL to configure
    pub fn url(&self) -> String {
        format!("http://{}/tts", self.addr)
    }

    /// Requests received so far
    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().expect("not poisoned").clone()
    }
}

impl Drop for MockWebhook {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_tts(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    let received = Received {
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        headers,
    };
    state.received.lock().expect("not poisoned").push(received);

    let reply = state.reply.clone();
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    (reply.status, [(header::CONTENT_TYPE, reply.content_type)], reply.body).into_response()
}

/// URL of a port nothing listens on
pub async fn dead_url() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    Ok(format!("http://{addr}/tts"))
}
