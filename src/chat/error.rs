use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::types::ErrorBody;

/// `error` text for upstream and internal failures.
pub const DISRUPTED_MESSAGE: &str = "Resonance disrupted. Please try again.";
/// `error` text for a missing or empty message.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Every way a chat request can fail. Each variant maps to one JSON error shape.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request carried no message, or an empty one.
    #[error("Message is required")]
    Validation,

    /// The completion API answered with a non-success status.
    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    /// Transport failure, timeout, or a body that could not be parsed.
    #[error("internal error: {details}")]
    Internal { details: String },
}

impl ChatError {
    pub fn internal(details: impl Into<String>) -> Self {
        ChatError::Internal {
            details: details.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Validation => StatusCode::BAD_REQUEST,
            ChatError::Upstream { .. } | ChatError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ChatError::Validation => ErrorBody {
                error: MESSAGE_REQUIRED.to_string(),
                details: None,
            },
            ChatError::Upstream { .. } => ErrorBody {
                error: DISRUPTED_MESSAGE.to_string(),
                details: Some(self.to_string()),
            },
            ChatError::Internal { details } => ErrorBody {
                error: DISRUPTED_MESSAGE.to_string(),
                details: Some(details.clone()),
            },
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
