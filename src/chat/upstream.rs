//! Client for the third-party chat-completion API.
//!
//! One call per request: no retry, no streaming, no conversation memory. The call is bounded
//! by `upstream.timeout_seconds`.

use log::debug;
use tokio::time::timeout;

use super::error::ChatError;
use super::types::{CompletionMessage, CompletionRequest, CompletionResponse, Role};
use crate::config::UpstreamConfig;

/// Completion client bound to one endpoint, credential, model and persona.
#[derive(Clone)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    persona: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig, persona: impl Into<String>) -> Self {
        Self {
            config,
            persona: persona.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Body for one upstream call: the persona as `system`, then `message` verbatim as `user`.
    pub fn build_request_body<'a>(&'a self, message: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.config.model,
            messages: [
                CompletionMessage {
                    role: Role::System,
                    content: &self.persona,
                },
                CompletionMessage {
                    role: Role::User,
                    content: message,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        }
    }

    /// Send `message` upstream and return the first completion's text, if any.
    ///
    /// `Ok(None)` means the upstream answered successfully but produced no usable text.
    pub async fn complete(&self, message: &str) -> Result<Option<String>, ChatError> {
        let body = self.build_request_body(message);
        debug!(
            "POST {} (model {}, max_tokens {})",
            self.config.endpoint, self.config.model, self.config.max_tokens
        );

        let request = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body);

        // one deadline covers the send and the body read
        let call = async {
            let response = request
                .send()
                .await
                .map_err(|e| ChatError::internal(format!("HTTP request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ChatError::Upstream {
                    status: status.as_u16(),
                });
            }

            let parsed: CompletionResponse = response.json().await.map_err(|e| {
                ChatError::internal(format!("Failed to parse JSON response: {}", e))
            })?;
            Ok::<_, ChatError>(parsed)
        };

        let parsed = timeout(self.config.timeout(), call).await.map_err(|_| {
            ChatError::internal(format!(
                "Request timeout after {}s",
                self.config.timeout_seconds
            ))
        })??;

        Ok(parsed.first_content())
    }
}
