//! Provider selection for the gateway.

use std::fmt;

use crate::error::GatewayError;

/// Supported model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Google Generative Language API.
    Gemini,
    /// Local or remote Ollama server.
    Ollama,
}

impl Provider {
    /// Parses the `LLM_KIND` environment value. Matching is case-insensitive.
    pub fn from_kind(kind: &str) -> Result<Self, GatewayError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(GatewayError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds_case_insensitively() {
        assert_eq!(Provider::from_kind("gemini").unwrap(), Provider::Gemini);
        assert_eq!(Provider::from_kind("GEMINI").unwrap(), Provider::Gemini);
        assert_eq!(Provider::from_kind(" ollama ").unwrap(), Provider::Ollama);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = Provider::from_kind("chatgpt").unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedProvider(k) if k == "chatgpt"));
    }
}
