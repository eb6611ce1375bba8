//! Environment configuration for the model runtime connection.

pub const DEFAULT_MODEL_SERVER_URL: &str = "http://127.0.0.1:8501";
pub const DEFAULT_MODEL_NAME: &str = "okra_leaf";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL of the serving runtime, without a trailing slash.
    pub base_url: String,
    pub model_name: String,
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Reads `MODEL_SERVER_URL`, `MODEL_NAME`, and `MODEL_TIMEOUT_SECS`,
    /// falling back to local-development defaults. Never fails: a missing
    /// runtime shows up at request time, not at startup.
    pub fn from_env() -> Self {
        Self {
            base_url: env("MODEL_SERVER_URL")
                .unwrap_or_else(|| DEFAULT_MODEL_SERVER_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model_name: env("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            timeout_secs: env("MODEL_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn new(base_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model_name: model_name.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
