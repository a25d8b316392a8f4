//! Wire shapes of the chat proxy and of the upstream completion API.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Body accepted by `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Successful reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    /// ISO 8601 UTC with millisecond precision, e.g. `2026-10-18T09:30:00.123Z`
    pub timestamp: String,
}

impl ChatResponse {
    /// Stamp `response` with the current time.
    pub fn now(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Failure body. `details` is omitted when there is nothing to add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// Request body for the upstream chat-completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [CompletionMessage<'a>; 2],
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

/// The subset of the upstream response the proxy reads.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, if it has any.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
    }
}
