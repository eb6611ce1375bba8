//! HTTP layer for the OkraBot backend.
//!
//! Two independent services share this crate:
//!
//! - the **chat service** ([`start_chat`]): `POST /chat` and `GET /health`,
//!   backed by the turn resolver from `plant-doctor`;
//! - the **leaf service** ([`start_leaf`]): `POST /predict` and
//!   `GET /health`, backed by the model client from `leaf-model`.
//!
//! Each has its own binary, state, and bind address, so one can be scaled
//! or restarted without the other. Router builders are public for tests
//! that want to drive the services on ephemeral ports.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info};

mod core;
mod error_handler;
mod routes;

pub use crate::core::app_state::{ChatState, LeafState};
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::chat::chat_route::chat;
use crate::routes::health::health_route::{chat_health, leaf_health};
use crate::routes::predict::predict_route::predict;

pub const DEFAULT_CHAT_ADDRESS: &str = "127.0.0.1:5001";
pub const DEFAULT_LEAF_ADDRESS: &str = "127.0.0.1:5000";

/// Phone photos regularly exceed axum's 2 MB default body limit.
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Starts the chat service and serves until shutdown.
///
/// Reads `CHAT_API_ADDRESS` (default `127.0.0.1:5001`) plus the gateway and
/// session settings documented in `llm-gateway` and [`ChatState`].
pub async fn start_chat() -> AppResult<()> {
    let state = Arc::new(ChatState::from_env()?);
    spawn_session_sweeper(state.clone());

    let addr = env::var("CHAT_API_ADDRESS").unwrap_or_else(|_| DEFAULT_CHAT_ADDRESS.to_string());
    serve(chat_router(state), &addr, "chat").await
}

/// Starts the leaf-classification service and serves until shutdown.
///
/// Reads `LEAF_API_ADDRESS` (default `127.0.0.1:5000`) plus the model
/// runtime settings documented in `leaf-model`.
pub async fn start_leaf() -> AppResult<()> {
    let state = Arc::new(LeafState::from_env()?);

    let addr = env::var("LEAF_API_ADDRESS").unwrap_or_else(|_| DEFAULT_LEAF_ADDRESS.to_string());
    serve(leaf_router(state), &addr, "leaf").await
}

pub fn chat_router(state: Arc<ChatState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(chat_health))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(state)
}

pub fn leaf_router(state: Arc<LeafState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(leaf_health))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(state)
}

async fn serve(app: Router, addr: &str, which: &'static str) -> AppResult<()> {
    let listener = TcpListener::bind(addr).await.map_err(|source| AppError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    info!("{which} service listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Periodically drops chat sessions idle past their TTL.
fn spawn_session_sweeper(state: Arc<ChatState>) {
    let period = (state.session_ttl / 4).max(Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately; nothing to sweep yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = state.resolver.sessions().evict_idle().await;
            if evicted > 0 {
                debug!(evicted, "evicted idle chat sessions");
            }
        }
    });
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, draining connections"),
        Err(err) => {
            // Without a signal handler the service simply runs until killed.
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
