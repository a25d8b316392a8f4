//! # Configuration Management Module
//!
//! Central configuration for the Resonantia console backend: where the chat proxy listens,
//! which upstream completion API it forwards to, the persona prompt it attaches, and how the
//! glitch animator and logging behave.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - Listen address of the chat proxy
//! - [`UpstreamConfig`] - Completion endpoint, credential, model and generation parameters
//! - [`PersonaConfig`] - System prompt sent with every upstream request
//! - [`GlitchConfig`] - Substitution probability and animation tick for CLI renderings
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use resonantia::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?.with_env_overrides();
//!     config.validate()?;
//!     println!("Upstream: {}", config.upstream.endpoint);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [upstream]
//! endpoint = "https://api.moonshot.cn/v1/chat/completions"
//! api_key = ""
//! model = "moonshot-v1-8k"
//! temperature = 0.8
//! max_tokens = 500
//! timeout_seconds = 30
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## Environment Integration
//!
//! The credential should not live in the file at all. `RESONANTIA_API_KEY`,
//! `RESONANTIA_UPSTREAM_URL`, `RESONANTIA_MODEL` and `RESONANTIA_BIND` override the file.
//! Precedence: CLI args > Environment > Config file > Defaults.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

use crate::chat::persona::DEFAULT_PERSONA_PROMPT;

pub const ENV_API_KEY: &str = "RESONANTIA_API_KEY";
pub const ENV_UPSTREAM_URL: &str = "RESONANTIA_UPSTREAM_URL";
pub const ENV_MODEL: &str = "RESONANTIA_MODEL";
pub const ENV_BIND: &str = "RESONANTIA_BIND";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the chat proxy binds, e.g. "127.0.0.1:3000"
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Full URL of the chat-completion endpoint
    pub endpoint: String,
    /// Bearer credential. Prefer the RESONANTIA_API_KEY environment variable.
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Upper bound on a single upstream call, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub prompt: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PERSONA_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlitchConfig {
    /// Probability that an eligible character becomes a glyph (0.0 - 1.0)
    pub substitution_probability: f64,
    /// Milliseconds between animation frames
    pub tick_ms: u64,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            substitution_probability: crate::glitch::DEFAULT_SUBSTITUTION,
            tick_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    #[serde(default)]
    pub glitch: GlitchConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = get(ENV_API_KEY) {
            self.upstream.api_key = key;
        }
        if let Some(url) = get(ENV_UPSTREAM_URL) {
            self.upstream.endpoint = url;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.upstream.model = model;
        }
        if let Some(bind) = get(ENV_BIND) {
            self.server.bind = bind;
        }
        self
    }

    /// Check value ranges. Does not require the API key; `serve` checks that separately.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.upstream.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            bail!("upstream.endpoint must be an http(s) URL, got '{}'", endpoint);
        }
        if self.upstream.model.trim().is_empty() {
            bail!("upstream.model must not be empty");
        }
        if !(0.0..=2.0).contains(&self.upstream.temperature) {
            bail!(
                "upstream.temperature must be within 0.0..=2.0, got {}",
                self.upstream.temperature
            );
        }
        if self.upstream.max_tokens == 0 {
            bail!("upstream.max_tokens must be greater than zero");
        }
        if self.upstream.timeout_seconds == 0 {
            bail!("upstream.timeout_seconds must be greater than zero");
        }
        if self.persona.prompt.trim().is_empty() {
            bail!("persona.prompt must not be empty");
        }
        if !(0.0..=1.0).contains(&self.glitch.substitution_probability) {
            bail!(
                "glitch.substitution_probability must be within 0.0..=1.0, got {}",
                self.glitch.substitution_probability
            );
        }
        if self.glitch.tick_ms == 0 {
            bail!("glitch.tick_ms must be greater than zero");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                bind: "127.0.0.1:3000".to_string(),
            },
            upstream: UpstreamConfig {
                endpoint: "https://api.moonshot.cn/v1/chat/completions".to_string(),
                api_key: String::new(), // supplied via RESONANTIA_API_KEY
                model: "moonshot-v1-8k".to_string(),
                temperature: 0.8,
                max_tokens: 500,
                timeout_seconds: default_timeout_seconds(),
            },
            persona: PersonaConfig::default(),
            glitch: GlitchConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}
