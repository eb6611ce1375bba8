//! Provider-agnostic facade over the configured model service.

use tracing::instrument;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::provider::Provider;
use crate::services::gemini::GeminiService;
use crate::services::ollama::OllamaService;

/// Entry point for every completion the chat service requests.
///
/// The provider is fixed at construction time; there is no per-request
/// routing. Cheap to share behind an `Arc`.
pub struct LlmGateway {
    cfg: GatewayConfig,
    inner: ProviderService,
}

pub(crate) enum ProviderService {
    Gemini(GeminiService),
    Ollama(OllamaService),
}

impl LlmGateway {
    /// Builds the service selected by `cfg.provider`.
    pub fn new(cfg: GatewayConfig) -> Result<Self, GatewayError> {
        let inner = match cfg.provider {
            Provider::Gemini => ProviderService::Gemini(GeminiService::new(cfg.clone())?),
            Provider::Ollama => ProviderService::Ollama(OllamaService::new(cfg.clone())?),
        };
        Ok(Self { cfg, inner })
    }

    /// Sends one prompt to the configured provider and returns its answer.
    ///
    /// # Errors
    ///
    /// Propagates transport failures, non-success HTTP statuses, undecodable
    /// bodies, and empty completions as [`GatewayError`].
    #[instrument(skip_all, fields(provider = %self.cfg.provider))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        match &self.inner {
            ProviderService::Gemini(svc) => svc.generate(prompt).await,
            ProviderService::Ollama(svc) => svc.generate(prompt).await,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.cfg
    }

    pub(crate) fn inner(&self) -> &ProviderService {
        &self.inner
    }
}
