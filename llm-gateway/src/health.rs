//! Liveness probing for the configured provider.
//!
//! Mirrors the shape of the chat service's `/health` endpoint: the probe
//! never fails, it reports. Transport errors become `ok: false` with the
//! error text in `message`.

use std::time::Instant;

use crate::gateway::{LlmGateway, ProviderService};

/// Snapshot of one provider probe.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl LlmGateway {
    /// Probes the provider and reports the outcome without erroring.
    pub async fn health(&self) -> HealthStatus {
        let cfg = self.config();
        let started = Instant::now();
        let outcome = match self.inner() {
            ProviderService::Gemini(svc) => svc.probe().await,
            ProviderService::Ollama(svc) => svc.probe().await,
        };
        let latency_ms = started.elapsed().as_millis();

        let (ok, message) = match outcome {
            Ok(message) => (true, message),
            Err(err) => (false, err.to_string()),
        };

        HealthStatus {
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message,
        }
    }
}
