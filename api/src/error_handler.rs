use thiserror::Error;

/// Public application error type.
///
/// Only bootstrap can fail loudly: once a service is serving, `/chat` always
/// answers 200 with a reply and `/predict` speaks its own error envelope, so
/// none of these variants ever leave a handler.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Gateway(#[from] llm_gateway::GatewayError),

    #[error("classifier client setup failed: {0}")]
    Vision(#[from] plant_doctor::VisionError),

    #[error("model client setup failed: {0}")]
    Model(#[from] leaf_model::LeafModelError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),
}

/// Handy result alias used across the bootstrap path.
pub type AppResult<T> = Result<T, AppError>;
