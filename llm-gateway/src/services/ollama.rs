//! Ollama REST client.
//!
//! Talks to a local Ollama daemon over `/api/generate` with streaming
//! disabled, so one request yields one complete answer.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, snippet};

pub struct OllamaService {
    cfg: GatewayConfig,
    client: Client,
    url_generate: String,
    url_tags: String,
}

impl OllamaService {
    pub fn new(cfg: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        let base = cfg.endpoint.trim_end_matches('/');
        let url_generate = format!("{base}/api/generate");
        let url_tags = format!("{base}/api/tags");

        Ok(Self {
            cfg,
            client,
            url_generate,
            url_tags,
        })
    }

    /// Sends one prompt and returns the full completion.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        debug!("POST {}", self.url_generate);

        let body = GenerateRequest {
            model: &self.cfg.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                top_k: self.cfg.top_k,
                num_predict: self.cfg.max_output_tokens,
            },
        };

        let resp = self.client.post(&self.url_generate).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::HttpStatus {
                status,
                url: self.url_generate.clone(),
                snippet: snippet(&text),
            });
        }

        let parsed = resp
            .json::<GenerateResponse>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        if parsed.response.is_empty() {
            return Err(GatewayError::NoCandidates);
        }
        Ok(parsed.response)
    }

    /// Checks that the daemon answers and whether the configured model is
    /// pulled. An empty or undecodable tag list still counts as reachable.
    pub(crate) async fn probe(&self) -> Result<String, GatewayError> {
        let resp = self.client.get(&self.url_tags).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::HttpStatus {
                status,
                url: self.url_tags.clone(),
                snippet: snippet(&text),
            });
        }

        let model = &self.cfg.model;
        match resp.json::<TagsResponse>().await {
            Ok(tags) => {
                let found = tags
                    .models
                    .iter()
                    .any(|m| m.name == *model || m.name.starts_with(&format!("{model}:")));
                if found {
                    Ok(format!("Ollama reachable, model `{model}` is available"))
                } else {
                    Ok(format!("Ollama reachable, but model `{model}` is not pulled"))
                }
            }
            Err(_) => Ok("Ollama reachable".to_string()),
        }
    }
}

/* ===== HTTP payloads ===== */

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}
