use serde::Serialize;

/// Successful verdict: label plus percentage string like `"93.27%"`.
#[derive(Debug, Serialize)]
pub struct PredictReply {
    pub predicted_disease: String,
    pub confidence: String,
}

/// Error envelope shared by every failure shape of `/predict`.
#[derive(Debug, Serialize)]
pub struct PredictErrorReply {
    pub error: String,
}
