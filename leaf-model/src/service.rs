//! REST client for the TensorFlow Serving runtime hosting the leaf model.
//!
//! The runtime's serving signature accepts a base64-encoded image, decodes
//! and resizes it to the model's 224x224 input itself, and answers with one
//! softmax row per instance:
//!
//! ```json
//! { "predictions": [[0.01, 0.02, 0.9, ...]] }
//! ```
//!
//! The highest score decides the label via the shared class table. Scores
//! and labels stay together in [`Prediction`] so the HTTP layer can format
//! the confidence without re-deriving anything.

use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use plant_doctor::knowledge;

use crate::config::ModelConfig;
use crate::error::{LeafModelError, snippet};

/// One labeled verdict from the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Softmax score of the winning class, in [0, 1].
    pub confidence: f32,
    pub class_id: usize,
}

/// Outcome of a runtime probe, shaped for the health endpoint.
#[derive(Debug, Clone)]
pub struct ModelHealth {
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

pub struct ModelService {
    cfg: ModelConfig,
    client: Client,
    url_predict: String,
    url_status: String,
}

impl ModelService {
    pub fn new(cfg: ModelConfig) -> Result<Self, LeafModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        let base = cfg.base_url.trim_end_matches('/');
        let url_predict = format!("{}/v1/models/{}:predict", base, cfg.model_name);
        let url_status = format!("{}/v1/models/{}", base, cfg.model_name);

        Ok(Self {
            cfg,
            client,
            url_predict,
            url_status,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }

    /// Runs one image through the model and labels the best class.
    ///
    /// # Errors
    ///
    /// Fails on transport problems, non-success statuses, undecodable
    /// bodies, and an empty score vector. Callers translate these into the
    /// service's error envelope.
    #[instrument(skip_all, fields(model = %self.cfg.model_name, bytes = image.len()))]
    pub async fn predict(&self, image: &[u8]) -> Result<Prediction, LeafModelError> {
        let body = PredictRequest {
            instances: vec![Instance {
                b64: BASE64.encode(image),
            }],
        };

        debug!("POST {}", self.url_predict);
        let resp = self.client.post(&self.url_predict).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LeafModelError::HttpStatus {
                status,
                url: self.url_predict.clone(),
                snippet: snippet(&text),
            });
        }

        let parsed = resp
            .json::<PredictResponse>()
            .await
            .map_err(|e| LeafModelError::Decode(e.to_string()))?;
        let scores = parsed
            .predictions
            .into_iter()
            .next()
            .ok_or(LeafModelError::EmptyPrediction)?;
        let (class_id, confidence) = argmax(&scores).ok_or(LeafModelError::EmptyPrediction)?;

        let label = knowledge::label_for_class(class_id as i64)
            .unwrap_or(knowledge::UNKNOWN_DISEASE)
            .to_string();
        debug!(class_id, confidence, label = %label, "model verdict");

        Ok(Prediction {
            label,
            confidence,
            class_id,
        })
    }

    /// Probes the runtime's model status endpoint without erroring.
    pub async fn health(&self) -> ModelHealth {
        let started = Instant::now();
        let outcome = self.try_probe().await;
        let latency_ms = started.elapsed().as_millis();

        let (ok, message) = match outcome {
            Ok(message) => (true, message),
            Err(err) => (false, err.to_string()),
        };

        ModelHealth {
            endpoint: self.cfg.base_url.clone(),
            model: self.cfg.model_name.clone(),
            ok,
            latency_ms,
            message,
        }
    }

    async fn try_probe(&self) -> Result<String, LeafModelError> {
        let resp = self.client.get(&self.url_status).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LeafModelError::HttpStatus {
                status,
                url: self.url_status.clone(),
                snippet: snippet(&text),
            });
        }

        match resp.json::<ModelStatusResponse>().await {
            Ok(parsed) => {
                let state = parsed
                    .model_version_status
                    .first()
                    .map(|v| v.state.as_str())
                    .unwrap_or("UNKNOWN");
                Ok(format!("model `{}` is {state}", self.cfg.model_name))
            }
            Err(_) => Ok("runtime reachable".to_string()),
        }
    }
}

/// Index and value of the highest score. Ties keep the first maximum, and
/// NaN scores never win.
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if top >= score => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

/* ===== HTTP payloads ===== */

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
}

#[derive(Serialize)]
struct Instance {
    b64: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct ModelStatusResponse {
    #[serde(default)]
    model_version_status: Vec<ModelVersionStatus>,
}

#[derive(Deserialize)]
struct ModelVersionStatus {
    #[serde(default)]
    state: String,
}

#[cfg(test)]
mod tests {
    use super::argmax;

    #[test]
    fn argmax_picks_the_highest_score() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
    }

    #[test]
    fn argmax_keeps_the_first_of_tied_maxima() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some((0, 0.4)));
    }

    #[test]
    fn argmax_ignores_nan_and_handles_empty() {
        assert_eq!(argmax(&[f32::NAN, 0.3, 0.2]), Some((1, 0.3)));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f32::NAN]), None);
    }
}
