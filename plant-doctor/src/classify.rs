//! Keyword-based text classification.
//!
//! Deliberately not a model: matching is case-insensitive substring search
//! over fixed vocabularies, so routing decisions are deterministic and free.
//! Disease detection scans [`knowledge::PROFILES`] in catalog order and the
//! first profile with any matching keyword wins, which is how ties between
//! overlapping vocabularies are resolved.

use crate::knowledge;

/// Words that mark a message as being about plants at all. Includes
/// "worsen" so progression follow-ups stay on the plant path even when
/// they name no plant part.
const PLANT_KEYWORDS: [&str; 16] = [
    "plant", "okra", "leaf", "leaves", "disease", "yellow", "spots", "wilt", "mildew", "virus",
    "mosaic", "health", "grow", "garden", "farm", "worsen",
];

/// Phrasings that ask how a disease develops over time.
const TIMELINE_TRIGGERS: [&str; 13] = [
    "worsen",
    "timeline",
    "progress",
    "how long",
    "worsening time",
    "duration",
    "develop",
    "advance",
    "speed",
    "fast",
    "slow",
    "phase",
    "period",
];

const GREETING_WORDS: [&str; 3] = ["hi", "hello", "hey"];

pub fn is_plant_related(text: &str) -> bool {
    contains_any(&text.to_lowercase(), &PLANT_KEYWORDS)
}

pub fn is_timeline_request(text: &str) -> bool {
    contains_any(&text.to_lowercase(), &TIMELINE_TRIGGERS)
}

/// Substring semantics on purpose: "hi" inside a longer word still counts,
/// matching how casual greetings are typed ("hiya", "heyy").
pub fn is_greeting(text: &str) -> bool {
    contains_any(&text.to_lowercase(), &GREETING_WORDS)
}

/// Returns the first catalog disease whose vocabulary matches `text`.
pub fn classify_text(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    knowledge::PROFILES
        .iter()
        .filter(|p| !p.keywords.is_empty())
        .find(|p| contains_any(&lower, p.keywords))
        .map(|p| p.name)
}

fn contains_any(lower: &str, needles: &[&str]) -> bool {
    needles.iter().any(|kw| lower.contains(kw))
}
