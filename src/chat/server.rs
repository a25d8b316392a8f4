//! HTTP surface of the chat proxy.
//!
//! - `POST /api/chat` - `{ "message": string }` in, `{ "response", "timestamp" }` out
//! - `GET /healthz` - liveness check, plain `ok`

use anyhow::{bail, Context, Result};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info, warn};
use tokio::net::TcpListener;

use super::error::ChatError;
use super::proxy::ChatProxy;
use super::types::ChatRequest;
use crate::config::Config;

pub fn build_router(proxy: ChatProxy) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(proxy)
}

async fn chat_handler(
    State(proxy): State<ChatProxy>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    // the body is parsed as JSON whatever the Content-Type; an unreadable body falls into the
    // catch-all, like any other unexpected failure
    let request = match body
        .map_err(|rejection| rejection.body_text())
        .and_then(|bytes| {
            serde_json::from_slice::<ChatRequest>(&bytes)
                .map_err(|e| format!("Failed to parse request body: {}", e))
        }) {
        Ok(request) => request,
        Err(details) => {
            debug!("Unreadable chat body: {}", details);
            return ChatError::internal(details).into_response();
        }
    };

    match proxy.handle_chat_request(request).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    if !config.upstream.is_configured() {
        bail!(
            "Upstream API key not configured; set {} or upstream.api_key",
            crate::config::ENV_API_KEY
        );
    }
    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    serve_listener(listener, ChatProxy::from_config(config)).await
}

/// Serve on an already-bound listener until Ctrl-C.
pub async fn serve_listener(listener: TcpListener, proxy: ChatProxy) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(
        "Chat proxy listening on http://{} (upstream {})",
        addr,
        proxy.upstream().endpoint()
    );
    axum::serve(listener, build_router(proxy))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Chat proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
