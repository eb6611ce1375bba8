//! Client layer for the okra leaf disease model.
//!
//! The model itself runs in a TensorFlow Serving compatible runtime; this
//! crate turns its raw score vector into a labeled [`service::Prediction`]
//! using the shared class table from `plant-doctor`. The HTTP layer of the
//! leaf service sits on top of [`service::ModelService`].

pub mod config;
pub mod error;
pub mod service;

pub use config::ModelConfig;
pub use error::LeafModelError;
pub use service::{ModelHealth, ModelService, Prediction};
