//! Unified client layer for the generative models behind OkraBot.
//!
//! The chat service never talks to a model API directly. It goes through
//! [`LlmGateway`], which is configured once at startup from environment
//! variables and dispatches to exactly one provider:
//!
//! - **Gemini** (`LLM_KIND=gemini`, the default) - Google Generative Language
//!   REST API, authenticated with an API key header.
//! - **Ollama** (`LLM_KIND=ollama`) - a local Ollama daemon speaking its
//!   `/api/generate` endpoint.
//!
//! Both providers reduce to the same contract: one prompt string in, one
//! completion string out, with every failure mode collapsed into
//! [`GatewayError`]. Callers that want graceful degradation match on the
//! result and substitute their own fallback text.
//!
//! ```no_run
//! use llm_gateway::{GatewayConfig, LlmGateway};
//!
//! # async fn demo() -> Result<(), llm_gateway::GatewayError> {
//! let gateway = LlmGateway::new(GatewayConfig::from_env()?)?;
//! let reply = gateway.generate("Why are my okra leaves curling?").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod health;
pub mod provider;
pub mod services;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::LlmGateway;
pub use health::HealthStatus;
pub use provider::Provider;
