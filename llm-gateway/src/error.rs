//! Error types shared by every provider behind the gateway.

use reqwest::StatusCode;
use thiserror::Error;

/// One flat error enum for configuration, transport, and decoding failures.
///
/// Provider services deliberately share this type so the chat layer can treat
/// "the model did not answer" uniformly, whatever the backend was.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("[LLM Gateway] missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("[LLM Gateway] unsupported provider in LLM_KIND: {0}")]
    UnsupportedProvider(String),

    #[error("[LLM Gateway] invalid endpoint `{0}`: expected an http(s) base URL")]
    InvalidEndpoint(String),

    #[error("[LLM Gateway] API key contains characters that cannot be sent in a header")]
    InvalidApiKey,

    #[error("[LLM Gateway] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("[LLM Gateway] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    #[error("[LLM Gateway] failed to decode provider response: {0}")]
    Decode(String),

    #[error("[LLM Gateway] model returned no usable candidates")]
    NoCandidates,
}

/// Trims an upstream error body down to something safe to log.
pub(crate) fn snippet(text: &str) -> String {
    text.chars().take(240).collect()
}
