//! Request handling for the chat proxy, independent of the HTTP layer.

use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::error::ChatError;
use super::types::{ChatRequest, ChatResponse};
use super::upstream::UpstreamClient;
use crate::config::Config;
use crate::logutil::escape_log;

/// Reply used when the upstream succeeds but returns no text.
pub const FALLBACK_RESPONSE: &str = "Echo lost in the void...";

/// Stateless proxy: every call is independent and shares only the immutable client.
#[derive(Debug, Clone)]
pub struct ChatProxy {
    upstream: Arc<UpstreamClient>,
}

impl ChatProxy {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(UpstreamClient::new(
            config.upstream.clone(),
            config.persona.prompt.clone(),
        ))
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Validate, forward once, and shape the reply.
    ///
    /// An empty or missing message fails with [`ChatError::Validation`] before any network
    /// traffic.
    pub async fn handle_chat_request(
        &self,
        request: ChatRequest,
    ) -> Result<ChatResponse, ChatError> {
        let message = match request.message {
            Some(m) if !m.is_empty() => m,
            _ => {
                debug!("Rejected chat request without message");
                return Err(ChatError::Validation);
            }
        };

        let request_id = Uuid::new_v4();
        info!("chat {} <= {}", request_id, escape_log(&message));

        match self.upstream.complete(&message).await {
            Ok(Some(text)) => {
                debug!("chat {} => {}", request_id, escape_log(&text));
                Ok(ChatResponse::now(text))
            }
            Ok(None) => {
                warn!("chat {} upstream returned no content; using fallback", request_id);
                Ok(ChatResponse::now(FALLBACK_RESPONSE))
            }
            Err(e @ ChatError::Upstream { .. }) => {
                warn!("chat {} {} ({})", request_id, e, self.upstream.endpoint());
                Err(e)
            }
            Err(e) => {
                error!("chat {} {}", request_id, e);
                Err(e)
            }
        }
    }
}
