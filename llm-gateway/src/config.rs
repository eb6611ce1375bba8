//! Environment-driven configuration for the gateway.
//!
//! All knobs come from the process environment so the chat service can be
//! repointed at a different model without a rebuild:
//!
//! | Variable           | Default                                      | Applies to |
//! |--------------------|----------------------------------------------|------------|
//! | `LLM_KIND`         | `gemini`                                     | both       |
//! | `GEMINI_API_KEY`   | required when `LLM_KIND=gemini`              | gemini     |
//! | `GEMINI_URL`       | `https://generativelanguage.googleapis.com`  | gemini     |
//! | `GEMINI_MODEL`     | `gemini-1.5-flash`                           | gemini     |
//! | `OLLAMA_URL`       | `http://127.0.0.1:11434`                     | ollama     |
//! | `OLLAMA_MODEL`     | `llama3.1`                                   | ollama     |
//! | `LLM_TIMEOUT_SECS` | `30`                                         | both       |
//!
//! Sampling parameters are fixed: the bot is tuned once, not per deployment.

use std::fmt;

use crate::error::GatewayError;
use crate::provider::Provider;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sampling profile used for every completion.
pub const TEMPERATURE: f32 = 0.65;
pub const TOP_P: f32 = 0.85;
pub const TOP_K: u32 = 30;
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Resolved settings for one provider.
#[derive(Clone)]
pub struct GatewayConfig {
    pub provider: Provider,
    /// Base URL of the provider API, without a trailing slash.
    pub endpoint: String,
    pub model: String,
    /// Only set for providers that authenticate with a key.
    pub api_key: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Reads the provider selection and its settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnsupportedProvider`] for an unknown
    /// `LLM_KIND`, [`GatewayError::MissingVar`] when the Gemini key is
    /// absent, and [`GatewayError::InvalidEndpoint`] for a base URL that is
    /// not http(s).
    pub fn from_env() -> Result<Self, GatewayError> {
        let kind = env("LLM_KIND").unwrap_or_else(|| "gemini".to_string());
        let provider = Provider::from_kind(&kind)?;

        let (endpoint, model, api_key) = match provider {
            Provider::Gemini => (
                env("GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
                env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                Some(must_env("GEMINI_API_KEY")?),
            ),
            Provider::Ollama => (
                env("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
                env("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                None,
            ),
        };

        Self::new(provider, endpoint, model, api_key)
            .map(|cfg| cfg.with_timeout(parse(env("LLM_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)))
    }

    /// Builds a config with the standard sampling profile.
    pub fn new(
        provider: Provider,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, GatewayError> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(GatewayError::InvalidEndpoint(endpoint));
        }
        Ok(Self {
            provider,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            // keys must never reach logs, even through Debug
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Reads an environment variable, treating empty or blank values as unset.
fn env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn must_env(name: &'static str) -> Result<String, GatewayError> {
    env(name).ok_or(GatewayError::MissingVar(name))
}

fn parse<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
