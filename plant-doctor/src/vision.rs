//! Client for the leaf-classification HTTP service.
//!
//! Uploads an image as `multipart/form-data` and reads back a verdict. The
//! classifier answers in one of two shapes, depending on its version:
//!
//! - `{"predicted_disease": "<label>", ...}` - the label is taken as-is;
//! - `{"class_id": <n>}` - mapped through the class table, with
//!   out-of-range ids becoming [`knowledge::UNKNOWN_DISEASE`].
//!
//! The public entry point never fails: a chat turn must not die because the
//! classifier is down, so every error is logged and collapsed to `None`.

use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::knowledge;

pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("classifier transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("classifier returned HTTP {status}: {snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        snippet: String,
    },

    #[error("classifier response had no recognizable verdict field")]
    UnrecognizedShape,
}

pub struct LeafClassifier {
    client: Client,
    predict_url: String,
}

impl LeafClassifier {
    pub fn new(predict_url: impl Into<String>) -> Result<Self, VisionError> {
        Self::with_timeout(predict_url, DEFAULT_CLASSIFY_TIMEOUT)
    }

    pub fn with_timeout(
        predict_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            predict_url: predict_url.into(),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Classifies an uploaded leaf photo, or `None` when anything fails.
    #[instrument(skip_all, fields(filename = %filename, bytes = image.len()))]
    pub async fn classify_image(&self, image: Vec<u8>, filename: &str) -> Option<String> {
        match self.try_classify(image, filename).await {
            Ok(label) => {
                debug!(label = %label, "classifier verdict");
                Some(label)
            }
            Err(err) => {
                warn!(error = %err, "image classification failed");
                None
            }
        }
    }

    async fn try_classify(&self, image: Vec<u8>, filename: &str) -> Result<String, VisionError> {
        let part = Part::bytes(image).file_name(filename.to_string());
        let form = Form::new().part("image", part);

        debug!("POST {}", self.predict_url);
        let resp = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(VisionError::HttpStatus {
                status,
                snippet: text.chars().take(240).collect(),
            });
        }

        let verdict = resp.json::<ClassifierVerdict>().await?;
        // An empty label is as useless as none at all.
        if let Some(label) = verdict.predicted_disease.filter(|l| !l.trim().is_empty()) {
            return Ok(label);
        }
        if let Some(class_id) = verdict.class_id {
            return Ok(knowledge::label_for_class(class_id)
                .unwrap_or(knowledge::UNKNOWN_DISEASE)
                .to_string());
        }
        Err(VisionError::UnrecognizedShape)
    }
}

/* ===== HTTP payloads ===== */

#[derive(Deserialize)]
struct ClassifierVerdict {
    predicted_disease: Option<String>,
    class_id: Option<i64>,
}
