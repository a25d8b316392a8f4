//! Test utilities: a stub completion API and a proxy wired to it, both on ephemeral ports.
#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use resonantia::chat::{build_router, ChatProxy};
use resonantia::config::Config;

/// What the stub answers with.
#[derive(Clone)]
pub enum StubReply {
    /// 200 with this JSON body
    Json(Value),
    /// Bare status code with an empty body
    Status(u16),
    /// 200 with a body that is not valid JSON
    Garbage(&'static str),
    /// Sleep, then answer 200 with this JSON body
    Slow(Duration, Value),
}

#[derive(Clone)]
pub struct StubUpstream {
    pub url: String,
    calls: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
    reply: StubReply,
}

impl StubUpstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.auth.lock().unwrap().clone()
    }
}

async fn stub_handler(
    State(stub): State<StubUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.calls.fetch_add(1, Ordering::SeqCst);
    stub.bodies.lock().unwrap().push(body);
    stub.auth.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    match stub.reply.clone() {
        StubReply::Json(v) => (StatusCode::OK, Json(v)).into_response(),
        StubReply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        StubReply::Garbage(text) => (StatusCode::OK, text).into_response(),
        StubReply::Slow(delay, v) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, Json(v)).into_response()
        }
    }
}

/// Start a stub completion endpoint at `http://127.0.0.1:<port>/v1/chat/completions`.
pub async fn spawn_upstream(reply: StubReply) -> StubUpstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let stub = StubUpstream {
        url: format!("http://{}/v1/chat/completions", addr),
        calls: Arc::new(AtomicUsize::new(0)),
        bodies: Arc::new(Mutex::new(Vec::new())),
        auth: Arc::new(Mutex::new(Vec::new())),
        reply,
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(stub_handler))
        .with_state(stub.clone());
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve stub") });
    stub
}

/// Start a raw HTTP endpoint that waits `head_delay` before the status line and headers, then
/// `body_delay` before the JSON body. Returns the endpoint URL.
pub async fn spawn_trickling_upstream(head_delay: Duration, body_delay: Duration, body: Value) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind trickle");
    let addr = listener.local_addr().expect("trickle addr");
    let body = body.to_string();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                read_request(&mut socket).await;
                tokio::time::sleep(head_delay).await;
                let head = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(body_delay).await;
                let _ = socket.write_all(body.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}/v1/chat/completions", addr)
}

/// Consume one request (headers plus `content-length` bytes of body).
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                return;
            }
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Config pointing at `upstream_url` with a test credential.
pub fn test_config(upstream_url: &str) -> Config {
    let mut config = Config::default();
    config.upstream.endpoint = upstream_url.to_string();
    config.upstream.api_key = "sk-test-credential".to_string();
    config.upstream.timeout_seconds = 5;
    config
}

/// Start the proxy for `config` and return its base URL.
pub async fn spawn_proxy(config: &Config) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind proxy");
    let addr = listener.local_addr().expect("proxy addr");
    let app = build_router(ChatProxy::from_config(config));
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve proxy") });
    format!("http://{}", addr)
}

/// POST `body` to the proxy's chat endpoint; returns status and parsed JSON.
pub async fn post_chat(base: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}/api/chat", base))
        .json(&body)
        .send()
        .await
        .expect("send chat");
    let status = resp.status().as_u16();
    let json = resp.json::<Value>().await.expect("json body");
    (status, json)
}
