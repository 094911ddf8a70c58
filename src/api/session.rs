//! Session management for multi-turn chat

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::models::ConversationTurn;

/// Turns kept per session (ten exchanges)
pub const MAX_HISTORY_TURNS: usize = 20;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Chat session data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub history: Vec<ConversationTurn>,
    pub created_at: i64,
    pub last_activity: i64,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            session_id: Uuid::new_v4().to_string(),
            history: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Append one question/answer exchange, dropping the oldest turns past the cap
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.history.push(ConversationTurn::user(question));
        self.history.push(ConversationTurn::assistant(answer));
        self.last_activity = chrono::Utc::now().timestamp();

        if self.history.len() > MAX_HISTORY_TURNS {
            let excess = self.history.len() - MAX_HISTORY_TURNS;
            self.history.drain(0..excess);
        }
    }

    #[must_use]
    pub fn is_expired(&self, timeout_secs: u64) -> bool {
        let idle = chrono::Utc::now().timestamp().saturating_sub(self.last_activity);
        u64::try_from(idle).unwrap_or(0) > timeout_secs
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session store with background expiry
pub struct SessionManager {
    sessions: Arc<DashMap<String, ChatSession>>,
    timeout_secs: u64,
}

impl SessionManager {
    /// Create a manager and start its cleanup task; must be called inside a runtime
    #[must_use]
    pub fn new(timeout_secs: u64) -> Self {
        let sessions = Arc::new(DashMap::new());

        let sessions_clone = Arc::clone(&sessions);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVAL).await;
                Self::cleanup_expired_sessions(&sessions_clone, timeout_secs);
            }
        });

        Self {
            sessions,
            timeout_secs,
        }
    }

    /// Look up a live session, or start a new one when the id is absent or unknown
    #[must_use]
    pub fn get_or_create(&self, session_id: Option<&str>) -> ChatSession {
        if let Some(session) = session_id.and_then(|id| self.get_session(id)) {
            return session;
        }
        let session = ChatSession::new();
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        session
    }

    #[must_use]
    pub fn get_session(&self, session_id: &str) -> Option<ChatSession> {
        self.sessions
            .get(session_id)
            .map(|s| s.clone())
            .filter(|s| !s.is_expired(self.timeout_secs))
    }

    /// Append an exchange to the stored session in place.
    ///
    /// Concurrent turns on one session each land; a session removed in the
    /// meantime is recreated under the same id.
    pub fn record_exchange(&self, session_id: &str, question: &str, answer: &str) {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ChatSession {
                session_id: session_id.to_string(),
                ..ChatSession::new()
            })
            .record_exchange(question, answer);
    }

    pub fn delete_session(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn cleanup_expired_sessions(sessions: &DashMap<String, ChatSession>, timeout_secs: u64) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(timeout_secs));
        let removed = before.saturating_sub(sessions.len());
        if removed > 0 {
            tracing::info!("Cleaned up {} expired sessions", removed);
        }
    }
}
