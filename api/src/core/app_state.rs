use std::sync::Arc;
use std::time::Duration;

use leaf_model::{ModelConfig, ModelService};
use llm_gateway::{GatewayConfig, LlmGateway};
use plant_doctor::{LeafClassifier, Resolver, SessionStore};

use crate::error_handler::AppError;

pub const DEFAULT_PREDICT_URL: &str = "http://127.0.0.1:5000/predict";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Shared state for the chat service handlers.
pub struct ChatState {
    /// Turn resolver owning the session store and upstream clients.
    pub resolver: Arc<Resolver>,
    /// Kept alongside the resolver so `/health` can probe the provider.
    pub gateway: Arc<LlmGateway>,
    /// Where the resolver sends leaf photos; echoed by `/health`.
    pub predict_url: String,
    /// Idle lifetime of chat sessions; drives the eviction sweeper.
    pub session_ttl: Duration,
}

impl ChatState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let gateway = Arc::new(LlmGateway::new(GatewayConfig::from_env()?)?);

        let predict_url = std::env::var("PREDICT_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREDICT_URL.into());
        let classifier = LeafClassifier::new(predict_url.clone())?;

        let session_ttl = Duration::from_secs(
            std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
        );

        Ok(Self::new(gateway, classifier, session_ttl, predict_url))
    }

    pub fn new(
        gateway: Arc<LlmGateway>,
        classifier: LeafClassifier,
        session_ttl: Duration,
        predict_url: String,
    ) -> Self {
        let resolver = Arc::new(Resolver::new(
            gateway.clone(),
            classifier,
            SessionStore::new(session_ttl),
        ));
        Self {
            resolver,
            gateway,
            predict_url,
            session_ttl,
        }
    }
}

/// Shared state for the leaf-classification service handlers.
pub struct LeafState {
    pub model: Arc<ModelService>,
}

impl LeafState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(ModelService::new(ModelConfig::from_env())?))
    }

    pub fn new(model: ModelService) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}
