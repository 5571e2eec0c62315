//! Chat sessions and the in-memory session store
//!
//! The store is the single mutable state object for the application:
//! session list, active session id, and the color-output flag all live
//! here and are threaded explicitly through operations rather than held
//! as globals. Sessions are never merged or deleted.

use crate::error::{Result, SwarmchatError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod message;
pub use message::{
    Attachment, AttachmentKind, GroundingChunk, GroundingMetadata, Message, Role, WebSource,
};

/// Title given to a session before one is derived from user input
pub const DEFAULT_SESSION_TITLE: &str = "New Session";

/// Maximum characters of the first user message kept as the title
const TITLE_MAX_CHARS: usize = 30;

/// A single chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Timestamp-derived identifier
    pub id: String,
    /// Default placeholder until derived from the first user message
    pub title: String,
    /// Ordered message sequence; append-only except for the trailing
    /// in-progress model message, which is replaced wholesale
    pub messages: Vec<Message>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// In-memory store of chat sessions plus ambient UI state
///
/// `update_messages` is the only write path for message sequences; it
/// replaces a session's messages wholesale and bumps the store revision,
/// which observers (and tests) use as a publish counter.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    color_output: bool,
    revision: u64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Creates an empty store with colored output enabled
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            active_id: None,
            color_output: true,
            revision: 0,
        }
    }

    /// Creates a session with the default title and makes it active
    ///
    /// The new session is prepended to the ordering. Its identifier is
    /// derived from the current time; the millisecond value is bumped to
    /// keep ids unique when two sessions are created within the same
    /// instant.
    ///
    /// # Examples
    ///
    /// ```
    /// use swarmchat::session::{SessionStore, DEFAULT_SESSION_TITLE};
    ///
    /// let mut store = SessionStore::new();
    /// let id = store.new_session().id.clone();
    /// assert_eq!(store.active_session().unwrap().id, id);
    /// assert_eq!(store.active_session().unwrap().title, DEFAULT_SESSION_TITLE);
    /// ```
    pub fn new_session(&mut self) -> &ChatSession {
        let mut millis = Utc::now().timestamp_millis();
        while self.find(&format!("session-{}", millis)).is_some() {
            millis += 1;
        }
        let id = format!("session-{}", millis);

        let session = ChatSession {
            id: id.clone(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        };

        self.sessions.insert(0, session);
        self.active_id = Some(id);
        &self.sessions[0]
    }

    /// All sessions, most recently created first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// The currently active session, if any
    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active_id.as_deref()?;
        self.find(id)
    }

    /// Id of the currently active session
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Makes an existing session active
    ///
    /// # Errors
    ///
    /// Returns [`SwarmchatError::Session`] when no session has the id.
    pub fn set_active(&mut self, id: &str) -> Result<()> {
        if self.find(id).is_none() {
            return Err(SwarmchatError::Session(format!("no session with id {}", id)).into());
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    /// Looks up a session by id
    pub fn find(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Replaces a session's message sequence wholesale
    ///
    /// Bumps the store revision and derives the session title once: if the
    /// stored title still equals [`DEFAULT_SESSION_TITLE`] and the new
    /// sequence contains a user message, the title becomes that message's
    /// content truncated to 30 characters, with `...` appended only when
    /// truncation occurred. A derived title is never recomputed.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Target session
    /// * `messages` - Full replacement message sequence
    ///
    /// # Errors
    ///
    /// Returns [`SwarmchatError::Session`] when no session has the id.
    pub fn update_messages(&mut self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| SwarmchatError::Session(format!("no session with id {}", session_id)))?;

        if session.title == DEFAULT_SESSION_TITLE {
            if let Some(first_user) = messages.iter().find(|m| m.role == Role::User) {
                session.title = derive_title(&first_user.content);
            }
        }

        session.messages = messages;
        self.revision += 1;
        Ok(())
    }

    /// Monotonic count of `update_messages` calls
    ///
    /// Observers use revision deltas to count publishes during streaming.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether terminal output should use colors
    pub fn color_output(&self) -> bool {
        self.color_output
    }

    /// Toggles colored terminal output, returning the new value
    pub fn toggle_color_output(&mut self) -> bool {
        self.color_output = !self.color_output;
        self.color_output
    }
}

/// Derives a session title from the first user message
///
/// Truncation is character-boundary safe; the ellipsis marker is appended
/// only when the content was actually truncated.
fn derive_title(content: &str) -> String {
    let char_count = content.chars().count();
    if char_count <= TITLE_MAX_CHARS {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", truncated)
    }
}
