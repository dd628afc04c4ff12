//! Client-side session value

use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

const SESSION_SUFFIX_LEN: usize = 9;

/// One logical conversation with the agent.
///
/// `session_id` is always `Some` once `initialized` is true. A failed creation
/// leaves the locally generated id in place but uninitialized, so the next
/// attempt generates a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: String,
    session_id: Option<String>,
    initialized: bool,
}

impl Session {
    /// Create an uninitialized session for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: None,
            initialized: false,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current session id, if one has been generated
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether the agent acknowledged this session
    pub fn is_initialized(&self) -> bool {
        self.initialized && self.session_id.is_some()
    }

    /// Clear the id and the initialized flag
    pub fn reset(&mut self) {
        tracing::debug!(user_id = %self.user_id, "Resetting session");
        self.session_id = None;
        self.initialized = false;
    }

    /// Generate a fresh local id and mark the session uninitialized
    pub(crate) fn begin(&mut self) -> String {
        let id = generate_session_id();
        self.session_id = Some(id.clone());
        self.initialized = false;
        id
    }

    /// Record the agent's acknowledgement
    pub(crate) fn mark_initialized(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
        self.initialized = true;
    }
}

/// `session_<millis>_<9 lowercase alphanumerics>`
pub fn generate_session_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("session_{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}
