//! Turn resolution: one user turn in, one reply and one state change out.
//!
//! The branch order is load-bearing and mirrors how the bot is meant to
//! feel in conversation:
//!
//! 1. an attached image always wins over text;
//! 2. text that is not about plants gets a canned greeting or small talk;
//! 3. plant text naming a disease focuses the session on it, answering with
//!    either the timeline card or an expert completion plus resource link;
//! 4. plant text naming nothing falls back to the disease already in focus
//!    for timeline questions, else a general expert completion.
//!
//! Model failures never surface to the user: each generation site has a
//! fixed apology, and the decision that led to the call stands (a detected
//! disease stays in focus even when the explanation could not be fetched).

use std::sync::Arc;

use tracing::{info, instrument, warn};

use llm_gateway::LlmGateway;

use crate::classify;
use crate::knowledge;
use crate::prompt;
use crate::session::{SessionStore, StateDelta};
use crate::timeline;
use crate::vision::LeafClassifier;

const IMAGE_APOLOGY: &str = "⚠️ Couldn't analyze the image. Please describe the issue.";
const HEALTHY_REPLY: &str = "✅ Healthy plant detected! No signs of disease found.";
const GREETING_REPLY: &str = "👋 Hello! I'm OkraBot, your okra plant assistant. How can I help today?";
const PLANT_APOLOGY: &str = "I'm having trouble with plant questions right now. Could you try again?";
const GENERAL_APOLOGY: &str = "I'm having trouble responding. Maybe ask me about okra plants?";

/// One incoming chat turn, as decoded from the HTTP layer.
#[derive(Debug)]
pub struct ChatTurn {
    /// Client-chosen session id; `None` lands in the shared default bucket.
    pub session: Option<String>,
    pub text: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

pub struct Resolver {
    gateway: Arc<LlmGateway>,
    leaf: LeafClassifier,
    sessions: SessionStore,
}

impl Resolver {
    pub fn new(gateway: Arc<LlmGateway>, leaf: LeafClassifier, sessions: SessionStore) -> Self {
        Self {
            gateway,
            leaf,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Resolves one turn to the bot's reply, recording it in the session.
    #[instrument(skip_all, fields(
        session = %turn.session.as_deref().unwrap_or(SessionStore::DEFAULT_SESSION),
        has_image = turn.image.is_some(),
    ))]
    pub async fn resolve(&self, turn: ChatTurn) -> String {
        let ChatTurn {
            session,
            text,
            image,
        } = turn;
        let session_id = session
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(SessionStore::DEFAULT_SESSION)
            .to_string();

        let handle = self.sessions.open_turn(&session_id, &text).await;

        let (reply, delta) = match image {
            Some(image) => self.resolve_image_turn(image).await,
            None => {
                self.resolve_text_turn(&text, handle.current_disease.as_deref())
                    .await
            }
        };

        self.sessions
            .close_turn(&session_id, &handle, &reply, &delta)
            .await;
        info!(delta = ?delta, "turn resolved");
        reply
    }

    async fn resolve_image_turn(&self, image: ImageUpload) -> (String, StateDelta) {
        let verdict = self
            .leaf
            .classify_image(image.bytes, &image.filename)
            .await;

        match verdict {
            None => (IMAGE_APOLOGY.to_string(), StateDelta::Keep),
            Some(label) if label.eq_ignore_ascii_case(knowledge::HEALTHY) => {
                (HEALTHY_REPLY.to_string(), StateDelta::Clear)
            }
            Some(disease) => {
                let context = format!("Context: The user's plant has {disease}");
                let query = format!("Explain {disease} and suggest treatments");
                let mut reply = self.generate_plant(&query, Some(&context)).await;
                append_resource_link(&mut reply, &disease);
                (reply, StateDelta::Set(disease))
            }
        }
    }

    async fn resolve_text_turn(
        &self,
        text: &str,
        current_disease: Option<&str>,
    ) -> (String, StateDelta) {
        if !classify::is_plant_related(text) {
            if classify::is_greeting(text) {
                return (GREETING_REPLY.to_string(), StateDelta::Keep);
            }
            return (self.generate_general(text).await, StateDelta::Keep);
        }

        match classify::classify_text(text) {
            Some(disease) => {
                // The detected disease takes focus immediately, so a
                // timeline phrasing in the same message refers to it.
                let mut reply = if classify::is_timeline_request(text) {
                    timeline::render_timeline(disease)
                } else {
                    let context = format!("Context: Possible {disease}");
                    self.generate_plant(text, Some(&context)).await
                };
                append_resource_link(&mut reply, disease);
                (reply, StateDelta::Set(disease.to_string()))
            }
            None => {
                if classify::is_timeline_request(text) {
                    if let Some(disease) = current_disease {
                        return (timeline::render_timeline(disease), StateDelta::Keep);
                    }
                }
                (self.generate_plant(text, None).await, StateDelta::Keep)
            }
        }
    }

    async fn generate_plant(&self, query: &str, context: Option<&str>) -> String {
        let prompt = prompt::build_plant_prompt(query, context);
        match self.gateway.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "plant completion failed, substituting apology");
                PLANT_APOLOGY.to_string()
            }
        }
    }

    async fn generate_general(&self, text: &str) -> String {
        let prompt = prompt::build_general_prompt(text);
        match self.gateway.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "general completion failed, substituting apology");
                GENERAL_APOLOGY.to_string()
            }
        }
    }
}

/// Appends the curated link for catalog diseases; labels outside the
/// catalog, including the unknown sentinel, have none.
fn append_resource_link(reply: &mut String, disease: &str) {
    if let Some(url) = knowledge::resource_link(disease) {
        reply.push_str(&format!("\n\n📚 Learn more: {url}"));
    }
}
