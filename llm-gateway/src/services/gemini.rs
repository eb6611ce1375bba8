//! Gemini REST client (Google Generative Language API).
//!
//! Speaks the `v1beta` `generateContent` endpoint with a single-turn request
//! body. The API key travels in the `x-goog-api-key` header so request URLs
//! stay safe to log.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, snippet};

pub struct GeminiService {
    cfg: GatewayConfig,
    client: Client,
    url_generate: String,
    url_models: String,
}

impl GeminiService {
    /// Builds the HTTP client with the configured timeout and auth header.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingVar`] when the config carries no API
    /// key and [`GatewayError::InvalidApiKey`] when the key cannot be encoded
    /// as a header value.
    pub fn new(cfg: GatewayConfig) -> Result<Self, GatewayError> {
        let key = cfg
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingVar("GEMINI_API_KEY"))?;
        let mut auth = HeaderValue::from_str(key).map_err(|_| GatewayError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim_end_matches('/');
        let url_generate = format!("{}/v1beta/models/{}:generateContent", base, cfg.model);
        let url_models = format!("{base}/v1beta/models?pageSize=1");

        Ok(Self {
            cfg,
            client,
            url_generate,
            url_models,
        })
    }

    /// Sends one prompt and returns the concatenated candidate text.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        debug!("POST {}", self.url_generate);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                top_k: self.cfg.top_k,
                max_output_tokens: self.cfg.max_output_tokens,
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
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        // A candidate may split its answer across several parts.
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GatewayError::NoCandidates);
        }
        Ok(text)
    }

    /// Cheap reachability probe against the model listing endpoint.
    pub(crate) async fn probe(&self) -> Result<String, GatewayError> {
        let resp = self.client.get(&self.url_models).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::HttpStatus {
                status,
                url: self.url_models.clone(),
                snippet: snippet(&text),
            });
        }
        Ok("Gemini API reachable".to_string())
    }
}

/* ===== HTTP payloads ===== */

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
