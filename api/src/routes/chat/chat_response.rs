use serde::Serialize;

/// Body of every `/chat` answer, success or not.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
}
