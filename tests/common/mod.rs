//! Shared test utilities for integration tests.
//!
//! [`MockAgent`] is a scripted A2A agent served by axum on a random port. It
//! records every JSON-RPC request it receives and answers `message/send`
//! with a fixed body and `message/stream` with a fixed list of SSE chunks.

#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

/// One request received by the mock agent.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Scripted agent behaviour.
#[derive(Debug, Clone)]
pub struct MockAgent {
    /// Body served at `/.well-known/agent.json`; `None` answers 404.
    pub card: Option<String>,
    /// Body served at `/.well-known/agent-card.json`; `None` answers 404.
    pub card_v3: Option<String>,
    pub send_status: StatusCode,
    pub send_body: String,
    pub stream_status: StatusCode,
    pub stream_chunks: Vec<String>,
    /// Delay between two stream chunks.
    pub chunk_delay: Duration,
    /// Keep the stream open this long after the last chunk.
    pub stream_stall: Option<Duration>,
    pub recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Default for MockAgent {
    fn default() -> Self {
        Self {
            card: Some(test_agent_card().to_string()),
            card_v3: None,
            send_status: StatusCode::OK,
            send_body: envelope(json!({
                "kind": "message",
                "role": "agent",
                "messageId": "agent-msg-1",
                "parts": [{"kind": "text", "text": "Echo: hello"}]
            })),
            stream_status: StatusCode::OK,
            stream_chunks: Vec::new(),
            chunk_delay: Duration::from_millis(5),
            stream_stall: None,
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockAgent {
    /// Every JSON-RPC request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

/// The card the mock agent serves by default.
pub fn test_agent_card() -> Value {
    json!({
        "name": "Test Echo Agent",
        "description": "An echo agent for testing",
        "version": "0.1.0",
        "url": "http://localhost/a2a",
        "capabilities": {"streaming": true},
        "skills": [{
            "id": "echo",
            "name": "Echo",
            "description": "Echoes back messages",
            "tags": ["test"]
        }]
    })
}

/// Wrap a result object in a JSON-RPC response envelope.
pub fn envelope(result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": "req-test", "result": result}).to_string()
}

/// One SSE event carrying `result` in a JSON-RPC envelope.
pub fn sse_event(result: Value) -> String {
    format!("data: {}\n\n", envelope(result))
}

pub fn task_frame(task_id: &str, context_id: &str, state: &str) -> Value {
    json!({
        "kind": "task",
        "id": task_id,
        "contextId": context_id,
        "status": {"state": state}
    })
}

pub fn status_frame(task_id: &str, state: &str, text: Option<&str>, is_final: bool) -> Value {
    let mut status = json!({"state": state, "timestamp": "2025-06-01T12:00:00Z"});
    if let Some(text) = text {
        status["message"] = json!({
            "kind": "message",
            "role": "agent",
            "messageId": format!("status-{task_id}"),
            "parts": [{"kind": "text", "text": text}]
        });
    }
    json!({
        "kind": "status-update",
        "taskId": task_id,
        "contextId": "ctx-1",
        "final": is_final,
        "status": status
    })
}

pub fn artifact_frame(task_id: &str, artifact_id: &str, parts: Value) -> Value {
    json!({
        "kind": "artifact-update",
        "taskId": task_id,
        "contextId": "ctx-1",
        "lastChunk": true,
        "artifact": {"artifactId": artifact_id, "parts": parts}
    })
}

async fn agent_card(State(agent): State<MockAgent>) -> Response {
    card_response(agent.card)
}

async fn agent_card_v3(State(agent): State<MockAgent>) -> Response {
    card_response(agent.card_v3)
}

fn card_response(card: Option<String>) -> Response {
    match card {
        Some(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        None => (StatusCode::NOT_FOUND, "no card here").into_response(),
    }
}

async fn json_rpc(
    State(agent): State<MockAgent>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let streaming = body["method"] == "message/stream";
    agent.recorded.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        headers,
        body,
    });

    if !streaming {
        return (
            agent.send_status,
            [(header::CONTENT_TYPE, "application/json")],
            agent.send_body.clone(),
        )
            .into_response();
    }

    let chunks = agent.stream_chunks.clone();
    let delay = agent.chunk_delay;
    let stall = agent.stream_stall;
    let stream = async_stream::stream! {
        for chunk in chunks {
            yield Ok::<_, Infallible>(chunk);
            tokio::time::sleep(delay).await;
        }
        if let Some(stall) = stall {
            tokio::time::sleep(stall).await;
        }
    };

    (
        agent.stream_status,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "late"
}

/// Start the mock agent on a random port. Returns the base URL and a handle to shut it down.
pub async fn start_mock_agent(agent: MockAgent) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let app = Router::new()
        .route("/.well-known/agent.json", get(agent_card))
        .route("/.well-known/agent-card.json", get(agent_card_v3))
        .route("/", post(json_rpc))
        .route("/a2a", post(json_rpc))
        .route("/a2a/", post(json_rpc))
        .route("/slow", get(slow))
        .with_state(agent);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (base_url, handle)
}

/// A URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
