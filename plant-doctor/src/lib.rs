//! Domain core for the OkraBot chat service.
//!
//! Everything between the HTTP layer and the outside world lives here:
//!
//! - [`knowledge`] - the static okra disease catalog (labels, keywords,
//!   timelines, resource links);
//! - [`classify`] - deterministic keyword routing over user text;
//! - [`timeline`] - the progression card renderer;
//! - [`prompt`] - the OkraBot prompt templates;
//! - [`session`] - per-session conversation state with TTL eviction;
//! - [`vision`] - the client for the leaf-classification service;
//! - [`resolver`] - the turn resolver tying all of the above to the
//!   model gateway.
//!
//! The HTTP layer hands [`resolver::Resolver::resolve`] a [`ChatTurn`] and
//! gets back the reply string; it never needs to know which branch fired.

pub mod classify;
pub mod knowledge;
pub mod prompt;
pub mod resolver;
pub mod session;
pub mod timeline;
pub mod vision;

pub use resolver::{ChatTurn, ImageUpload, Resolver};
pub use session::{SessionStore, StateDelta, TurnRecord};
pub use vision::{LeafClassifier, VisionError};
