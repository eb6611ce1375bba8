//! GET /health — upstream reachability for each service.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};

use crate::core::app_state::{ChatState, LeafState};
use crate::routes::health::health_response::{HealthReply, TargetHealth};

/// Handler: GET /health on the chat service. Probes the model gateway and
/// reports the configured classifier URL without probing it; the leaf
/// service owns its own health.
pub async fn chat_health(State(state): State<Arc<ChatState>>) -> Json<HealthReply> {
    let llm = state.gateway.health().await;

    Json(HealthReply {
        service: "chat-api",
        checked_at: now(),
        classifier_url: Some(state.predict_url.clone()),
        targets: vec![TargetHealth {
            name: "llm-gateway",
            endpoint: llm.endpoint,
            model: Some(llm.model),
            ok: llm.ok,
            latency_ms: llm.latency_ms,
            message: llm.message,
        }],
    })
}

/// Handler: GET /health on the leaf service. Probes the model runtime.
pub async fn leaf_health(State(state): State<Arc<LeafState>>) -> Json<HealthReply> {
    let model = state.model.health().await;

    Json(HealthReply {
        service: "leaf-api",
        checked_at: now(),
        classifier_url: None,
        targets: vec![TargetHealth {
            name: "model-runtime",
            endpoint: model.endpoint,
            model: Some(model.model),
            ok: model.ok,
            latency_ms: model.latency_ms,
            message: model.message,
        }],
    })
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
