//! In-memory session store mapping a session ID to its transcript.
//!
//! Each transcript sits behind its own async lock so a whole chat turn
//! (append the user message, call the model, append the reply) can be
//! run as a single writer for that session while other sessions
//! proceed independently. The map lock is only held long enough to
//! look up or insert a handle and is never held across an await.
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use super::models::{Transcript, Turn};

/// Shared handle to one session's transcript.
pub type SessionHandle = Arc<Mutex<Transcript>>;

/// How much history is kept per session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep every turn for the life of the process
    #[default]
    Unbounded,
    /// Keep only the newest N turns, dropping further so the kept
    /// history starts on a user turn
    MaxTurns(usize),
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    retention: RetentionPolicy,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            retention,
        }
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Returns the handle for `session_id`, registering an empty
    /// transcript the first time the ID is seen.
    pub fn session(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
        {
            return Arc::clone(handle);
        }

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let handle = sessions.entry(session_id.to_string()).or_insert_with(|| {
            tracing::debug!(session_id, "Created chat session");
            Arc::new(Mutex::new(Transcript::new()))
        });
        Arc::clone(handle)
    }

    /// Snapshot of the transcript for `session_id`, creating an empty
    /// one if it doesn't exist yet.
    pub async fn get_or_create(&self, session_id: &str) -> Transcript {
        self.session(session_id).lock().await.clone()
    }

    /// Add `turn` to the end of the session's transcript.
    pub async fn append(&self, session_id: &str, turn: Turn) {
        let handle = self.session(session_id);
        let mut transcript = handle.lock().await;
        self.record(&mut transcript, turn);
    }

    /// Push a turn onto a transcript the caller already holds the lock
    /// for, applying the retention policy.
    pub(crate) fn record(&self, transcript: &mut Transcript, turn: Turn) {
        transcript.push(turn);
        if let RetentionPolicy::MaxTurns(max) = self.retention {
            transcript.truncate_front(max);
        }
    }

    /// Number of sessions created so far
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
