//! Error types for model runtime calls.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeafModelError {
    #[error("[Leaf Model] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("[Leaf Model] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    #[error("[Leaf Model] failed to decode runtime response: {0}")]
    Decode(String),

    #[error("[Leaf Model] runtime returned an empty score vector")]
    EmptyPrediction,
}

pub(crate) fn snippet(text: &str) -> String {
    text.chars().take(240).collect()
}
