//! # Chat Proxy Service
//!
//! Forwards one visitor message to an external chat-completion API under the fixed
//! Δ Resonantia persona and relays the reply.
//!
//! ## Components
//!
//! - [`types`] - request/response bodies, upstream wire shapes
//! - [`error`] - [`ChatError`] and its JSON error shapes
//! - [`persona`] - the default persona prompt
//! - [`upstream`] - [`UpstreamClient`], the single outbound HTTPS call
//! - [`proxy`] - [`ChatProxy::handle_chat_request`], the request contract
//! - [`server`] - axum router and listener loop
//!
//! ## Request Lifecycle
//!
//! ```text
//! Received ─▶ Validated ─▶ UpstreamCalled ─┬─▶ Succeeded        200 {response, timestamp}
//!    │                                     ├─▶ UpstreamFailed   500 {error, details}
//!    └─▶ Invalid (400 {error})             └─▶ InternalFailure  500 {error, details}
//! ```
//!
//! Nothing survives between requests: no session, no cache, no retry state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use resonantia::chat::{ChatProxy, ChatRequest};
//! use resonantia::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?.with_env_overrides();
//!     let proxy = ChatProxy::from_config(&config);
//!     let reply = proxy.handle_chat_request(ChatRequest::new("who are you?")).await?;
//!     println!("{} @ {}", reply.response, reply.timestamp);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod persona;
pub mod proxy;
pub mod server;
pub mod types;
pub mod upstream;

pub use error::ChatError;
pub use proxy::{ChatProxy, FALLBACK_RESPONSE};
pub use server::{build_router, serve};
pub use types::{ChatRequest, ChatResponse, ErrorBody};
pub use upstream::UpstreamClient;
