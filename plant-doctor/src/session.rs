//! Per-session conversation state.
//!
//! Each chat session carries at most one "disease in focus" plus a turn
//! history. Sessions are keyed by an opaque client-chosen id; clients that
//! send none share the [`SessionStore::DEFAULT_SESSION`] bucket. Idle
//! sessions are dropped after a TTL so abandoned browser tabs do not pin
//! memory forever.
//!
//! A turn is recorded in two steps: [`SessionStore::open_turn`] appends the
//! user's message with an empty bot slot and snapshots the disease in focus,
//! then [`SessionStore::close_turn`] fills the slot and applies the state
//! change the resolver decided on. The write lock is never held across I/O.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

/// One user/bot exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnRecord {
    pub user: String,
    pub bot: String,
}

/// How a resolved turn changes the disease in focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDelta {
    /// Leave the focus untouched.
    Keep,
    /// Focus on this disease from now on.
    Set(String),
    /// Drop the focus, e.g. after a healthy verdict.
    Clear,
}

#[derive(Debug)]
struct Session {
    current_disease: Option<String>,
    history: Vec<TurnRecord>,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            current_disease: None,
            history: Vec::new(),
            last_seen: Instant::now(),
        }
    }
}

/// Snapshot handed to the resolver when a turn opens.
#[derive(Debug)]
pub struct TurnHandle {
    /// Index of this turn's record in the session history.
    pub index: usize,
    /// Disease in focus when the turn started.
    pub current_disease: Option<String>,
}

pub struct SessionStore {
    inner: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Bucket used when the client sends no session id.
    pub const DEFAULT_SESSION: &'static str = "default";

    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Starts a turn: creates the session if needed, resets it if it sat
    /// idle past the TTL, appends the user message with an empty bot slot,
    /// and returns the position to fill later.
    pub async fn open_turn(&self, session_id: &str, user_text: &str) -> TurnHandle {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);

        if session.last_seen.elapsed() > self.ttl {
            debug!(session = session_id, "session expired, starting fresh");
            *session = Session::new();
        }
        session.last_seen = Instant::now();

        session.history.push(TurnRecord {
            user: user_text.to_string(),
            bot: String::new(),
        });

        TurnHandle {
            index: session.history.len() - 1,
            current_disease: session.current_disease.clone(),
        }
    }

    /// Finishes a turn: fills the bot slot opened by [`Self::open_turn`] and
    /// applies the disease-focus change.
    pub async fn close_turn(
        &self,
        session_id: &str,
        handle: &TurnHandle,
        bot_text: &str,
        delta: &StateDelta,
    ) {
        let mut sessions = self.inner.write().await;
        let Some(session) = sessions.get_mut(session_id) else {
            // Evicted mid-turn; rebuild so the exchange is not lost.
            warn!(session = session_id, "session vanished mid-turn, recreating");
            let mut session = Session::new();
            session.history.push(TurnRecord {
                user: String::new(),
                bot: bot_text.to_string(),
            });
            apply_delta(&mut session.current_disease, delta);
            sessions.insert(session_id.to_string(), session);
            return;
        };

        session.last_seen = Instant::now();
        match session.history.get_mut(handle.index) {
            Some(record) => record.bot = bot_text.to_string(),
            None => session.history.push(TurnRecord {
                user: String::new(),
                bot: bot_text.to_string(),
            }),
        }
        apply_delta(&mut session.current_disease, delta);
    }

    /// Disease currently in focus, if the session exists.
    pub async fn current_disease(&self, session_id: &str) -> Option<String> {
        let sessions = self.inner.read().await;
        sessions
            .get(session_id)
            .and_then(|s| s.current_disease.clone())
    }

    /// Copy of the session history; empty for unknown sessions.
    pub async fn history(&self, session_id: &str) -> Vec<TurnRecord> {
        let sessions = self.inner.read().await;
        sessions
            .get(session_id)
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops every session idle past the TTL. Returns how many were removed.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() <= self.ttl);
        before - sessions.len()
    }
}

fn apply_delta(focus: &mut Option<String>, delta: &StateDelta) {
    match delta {
        StateDelta::Keep => {}
        StateDelta::Set(disease) => *focus = Some(disease.clone()),
        StateDelta::Clear => *focus = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(DEFAULT_TTL)
    }

    #[tokio::test]
    async fn turns_append_then_fill_history() {
        let store = store();
        let handle = store.open_turn("s1", "hello").await;
        assert_eq!(handle.index, 0);
        assert_eq!(handle.current_disease, None);

        let history = store.history("s1").await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user, "hello");
        assert_eq!(history[0].bot, "");

        store
            .close_turn("s1", &handle, "hi there", &StateDelta::Keep)
            .await;
        let history = store.history("s1").await;
        assert_eq!(history[0].bot, "hi there");
    }

    #[tokio::test]
    async fn deltas_set_keep_and_clear_focus() {
        let store = store();

        let h = store.open_turn("s1", "spots").await;
        store
            .close_turn("s1", &h, "sounds fungal", &StateDelta::Set("Downy Mildew".into()))
            .await;
        assert_eq!(store.current_disease("s1").await.as_deref(), Some("Downy Mildew"));

        let h = store.open_turn("s1", "thanks").await;
        assert_eq!(h.current_disease.as_deref(), Some("Downy Mildew"));
        store.close_turn("s1", &h, "welcome", &StateDelta::Keep).await;
        assert_eq!(store.current_disease("s1").await.as_deref(), Some("Downy Mildew"));

        let h = store.open_turn("s1", "photo of a healthy leaf").await;
        store.close_turn("s1", &h, "all good", &StateDelta::Clear).await;
        assert_eq!(store.current_disease("s1").await, None);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = store();
        let h = store.open_turn("alice", "curly leaves").await;
        store
            .close_turn("alice", &h, "bad news", &StateDelta::Set("Leaf Curl Virus".into()))
            .await;

        let h = store.open_turn("bob", "hello").await;
        assert_eq!(h.current_disease, None);
        assert_eq!(store.current_disease("bob").await, None);
        assert_eq!(store.history("bob").await.len(), 1);
        assert_eq!(store.history("alice").await.len(), 1);
    }

    #[tokio::test]
    async fn expired_session_restarts_fresh_on_access() {
        let store = SessionStore::new(Duration::ZERO);
        let h = store.open_turn("s1", "spots").await;
        store
            .close_turn("s1", &h, "looks bad", &StateDelta::Set("Cercospora Leaf Spot".into()))
            .await;

        // Any elapsed time beats a zero TTL, so the next turn starts over.
        let h = store.open_turn("s1", "still there?").await;
        assert_eq!(h.index, 0);
        assert_eq!(h.current_disease, None);
    }

    #[tokio::test]
    async fn evict_idle_removes_only_stale_sessions() {
        let store = SessionStore::new(Duration::ZERO);
        store.open_turn("stale", "hello").await;
        assert_eq!(store.session_count().await, 1);

        let evicted = store.evict_idle().await;
        assert_eq!(evicted, 1);
        assert_eq!(store.session_count().await, 0);

        let fresh = SessionStore::new(DEFAULT_TTL);
        fresh.open_turn("live", "hello").await;
        assert_eq!(fresh.evict_idle().await, 0);
        assert_eq!(fresh.session_count().await, 1);
    }
}
