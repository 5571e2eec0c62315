//! Message, attachment, and citation types
//!
//! A conversation is an ordered sequence of immutable messages. The only
//! exception is the trailing model message during streaming, which the
//! assembler replaces wholesale (same id, growing content) until the
//! stream terminates.

use crate::error::{Result, SwarmchatError};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;
use uuid::Uuid;

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Authored by the person typing
    User,
    /// Authored by the remote assistant
    Model,
    /// Authored locally (error notices)
    System,
}

/// Kind of attachment payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Decodable image payload
    Image,
    /// Any other file payload
    File,
}

/// A file attached to an outgoing user message
///
/// The file is read fully into memory and base64-encoded at ingestion
/// time; no size limit is enforced. Attachments are never mutated after
/// the message carrying them is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Image or generic file
    pub kind: AttachmentKind,
    /// MIME type reported to the gateway
    pub mime_type: String,
    /// Base64-encoded file contents
    pub data: String,
    /// Original file name, for display
    pub name: String,
}

impl Attachment {
    /// Reads a file and builds an attachment from it
    ///
    /// The MIME type is guessed from the file extension and falls back to
    /// `application/octet-stream`. Read failures surface as a recoverable
    /// [`SwarmchatError::Attachment`] carrying the offending path.
    ///
    /// # Arguments
    ///
    /// * `path` - File to read and encode
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            SwarmchatError::Attachment(format!("{}: {}", path.display(), e))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = guess_mime_type(path);
        let kind = if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        };

        Ok(Self {
            kind,
            mime_type,
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            name,
        })
    }
}

/// Guess a MIME type from a file extension
///
/// Covers the handful of types the assistant accepts as inline data.
fn guess_mime_type(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "py" => "text/x-python",
        "js" => "text/javascript",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// A single web source behind a citation chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    /// Source URI as reported by the gateway
    pub uri: String,
    /// Human-readable title, may be empty
    #[serde(default)]
    pub title: String,
}

/// One citation chunk; the web source is optional on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web source, absent for non-web grounding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// Citation metadata attached to a streamed model message
///
/// Produced by the gateway alongside response fragments; rendering-only.
/// Field names follow the wire format (camelCase).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingMetadata {
    /// Citation chunks in gateway order
    #[serde(rename = "groundingChunks", default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl GroundingMetadata {
    /// Citation sources whose URI parses as a renderable URL
    ///
    /// Chunks without a web source or with an unparseable URI are skipped.
    pub fn renderable_sources(&self) -> Vec<(Url, String)> {
        self.grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                Url::parse(&web.uri)
                    .ok()
                    .map(|url| (url, web.title.clone()))
            })
            .collect()
    }
}

/// A message in a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id
    pub id: String,
    /// Author role
    pub role: Role,
    /// Full message text
    pub content: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Display label for the author ("Orchestrator", "System")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Attachments carried by an outgoing user message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Citations attached once the gateway reports them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding: Option<GroundingMetadata>,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use swarmchat::session::{Message, Role};
    ///
    /// let msg = Message::user("Hello!");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.attachments.is_empty());
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            sender: None,
            attachments: Vec::new(),
            grounding: None,
        }
    }

    /// Creates a new user message carrying attachments
    pub fn user_with_attachments(
        content: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Self {
        Self {
            attachments,
            ..Self::user(content)
        }
    }

    /// Creates a new model message attributed to a sender label
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    /// * `sender` - Display label, e.g. "Orchestrator"
    pub fn model(content: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Model,
            content: content.into(),
            timestamp: Utc::now(),
            sender: Some(sender.into()),
            attachments: Vec::new(),
            grounding: None,
        }
    }

    /// Creates a locally authored system notice
    ///
    /// # Arguments
    ///
    /// * `content` - The notice text
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::System,
            content: content.into(),
            timestamp: Utc::now(),
            sender: Some("System".to_string()),
            attachments: Vec::new(),
            grounding: None,
        }
    }
}
