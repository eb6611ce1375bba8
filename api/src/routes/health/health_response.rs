use serde::Serialize;

/// Body of `GET /health` for both services.
#[derive(Debug, Serialize)]
pub struct HealthReply {
    pub service: &'static str,
    /// RFC 3339 timestamp of this probe run.
    pub checked_at: String,
    /// Where the chat service sends leaf photos; absent on the leaf service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier_url: Option<String>,
    pub targets: Vec<TargetHealth>,
}

/// One probed upstream.
#[derive(Debug, Serialize)]
pub struct TargetHealth {
    pub name: &'static str,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}
