//! # Resonantia - Δ Resonantia Console Backend
//!
//! Backend pieces of the Δ Resonantia interactive-fiction console: a deterministic
//! glitch-text engine that animates the console's text, and a chat proxy that forwards a
//! visitor's message to a chat-completion API under a fixed in-universe persona.
//!
//! ## Features
//!
//! - **Glitch Engine**: seed-driven glyph substitution and multi-script token mixing; the same
//!   `(text, seed)` always renders identically.
//! - **Chat Proxy**: `POST /api/chat` with strict validation, one bounded upstream call, and
//!   structured JSON errors for every failure.
//! - **Console Content**: loader boot sequence and interface mode readouts.
//! - **Configuration**: TOML file with environment overrides; the upstream credential is never
//!   compiled in.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resonantia::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?.with_env_overrides();
//!     config.validate()?;
//!     resonantia::chat::serve(&config).await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`glitch`] - Deterministic text corruption
//! - [`chat`] - Chat proxy service and HTTP surface
//! - [`console`] - Boot sequence and interface modes
//! - [`config`] - Configuration management and validation
//! - [`logutil`] - Single-line log rendering of user content
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐        ┌─────────────────┐
//! │  Glitch Engine  │        │   Chat Proxy    │ ← POST /api/chat
//! │  (pure, local)  │        └─────────────────┘
//! └─────────────────┘                 │
//!                            ┌─────────────────┐
//!                            │  Upstream API   │ ← external completion service
//!                            └─────────────────┘
//! ```
//!
//! The two halves never call each other; the console renders proxy replies through the
//! glitch engine on its own.

pub mod chat;
pub mod config;
pub mod console;
pub mod glitch;
pub mod logutil;
