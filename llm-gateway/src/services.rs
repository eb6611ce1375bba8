//! Provider-specific REST clients. One module per backend.

pub mod gemini;
pub mod ollama;
