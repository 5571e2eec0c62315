//! Gemini-backed gateway implementation
//!
//! Speaks the `streamGenerateContent` SSE protocol: one POST per turn,
//! response fragments parsed from `data:` lines and forwarded through a
//! bounded channel. Conversation history is kept on the handle so
//! follow-up turns carry context, mirroring the hosted SDK's chat-session
//! semantics.

use crate::config::GatewayConfig;
use crate::error::{Result, SwarmchatError};
use crate::gateway::{Fragment, FragmentStream, Gateway};
use crate::prompts::SYSTEM_INSTRUCTION;
use crate::session::{Attachment, GroundingMetadata};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Default API base for the hosted service
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Inline binary payload of a request part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type of the payload
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// One part of a content entry
///
/// Attachments ride as inline data parts appended after the text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text part
    Text {
        /// The text payload
        text: String,
    },
    /// Inline binary part
    InlineData {
        /// The binary payload
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// A role-attributed content entry in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model"
    pub role: String,
    /// Ordered parts; text first, then inline data
    pub parts: Vec<Part>,
}

impl Content {
    /// Builds a user content entry: text part, then one inline-data part
    /// per attachment, order preserved
    pub fn user(text: &str, attachments: &[Attachment]) -> Self {
        let mut parts = vec![Part::Text {
            text: text.to_string(),
        }];
        for attachment in attachments {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: attachment.mime_type.clone(),
                    data: attachment.data.clone(),
                },
            });
        }
        Self {
            role: "user".to_string(),
            parts,
        }
    }

    /// Builds a model content entry from accumulated response text
    fn model_text(text: String) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::Text { text }],
        }
    }
}

/// Instruction block attached to every request
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

/// Sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Declared capability enabling web search grounding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ToolDecl {
    #[serde(rename = "google_search")]
    google_search: serde_json::Map<String, serde_json::Value>,
}

/// Request body for `streamGenerateContent`
#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    tools: Vec<ToolDecl>,
}

/// Gateway session backed by the Gemini streaming API
#[derive(Debug)]
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
    history: Arc<Mutex<Vec<Content>>>,
}

impl GeminiGateway {
    /// Opens a gateway session
    ///
    /// Resolves the credential from the environment variable named in the
    /// configuration. Absence of the credential is fatal here, before any
    /// request is made.
    ///
    /// # Arguments
    ///
    /// * `config` - Gateway configuration
    ///
    /// # Errors
    ///
    /// Returns [`SwarmchatError::MissingCredentials`] when the credential
    /// environment variable is unset or empty.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SwarmchatError::MissingCredentials(config.api_key_env.clone()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            base_url: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            history: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn send(&mut self, text: &str, attachments: &[Attachment]) -> Result<FragmentStream> {
        let user_content = Content::user(text, attachments);

        let contents = {
            let history = self.history.lock().await;
            let mut contents = history.clone();
            contents.push(user_content.clone());
            contents
        };

        let request = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part::Text {
                    text: SYSTEM_INSTRUCTION.trim().to_string(),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
            tools: vec![ToolDecl::default()],
        };

        tracing::debug!(model = %self.model, "Sending streaming request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|e| SwarmchatError::Gateway(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(SwarmchatError::Authentication("credential rejected by gateway".to_string()).into());
        }
        if status == 429 {
            return Err(SwarmchatError::RateLimited("gateway throttled the request".to_string()).into());
        }
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(SwarmchatError::Gateway(format!("status {}: {}", status, body)).into());
        }

        // The turn is part of history only once the gateway accepted it
        self.history.lock().await.push(user_content);

        let (tx, rx) = mpsc::channel(64);
        let history = Arc::clone(&self.history);

        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();
            let mut full_text = String::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes: bytes::Bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx
                            .send(Err(SwarmchatError::StreamInterrupted(e.to_string()).into()))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim_end_matches('\r').to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    let data = data.trim();
                    if data.is_empty() {
                        continue;
                    }

                    let event: serde_json::Value = match serde_json::from_str(data) {
                        Ok(value) => value,
                        Err(e) => {
                            tracing::trace!(error = %e, "Ignoring unparseable SSE event");
                            continue;
                        }
                    };

                    if let Some(fragment) = fragment_from_event(&event) {
                        full_text.push_str(&fragment.text);
                        if tx.send(Ok(fragment)).await.is_err() {
                            // Receiver dropped; tear the stream down
                            return;
                        }
                    }
                }
            }

            if !full_text.is_empty() {
                history.lock().await.push(Content::model_text(full_text));
            }
        });

        Ok(rx)
    }
}

/// Converts one SSE event into a response fragment
///
/// Concatenates the text of every part in the first candidate and carries
/// the candidate's grounding metadata along when present. Events without
/// a usable candidate yield `None` and are skipped.
pub(crate) fn fragment_from_event(event: &serde_json::Value) -> Option<Fragment> {
    let candidate = event.get("candidates")?.get(0)?;

    let text = candidate
        .pointer("/content/parts")
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default();

    let grounding = candidate
        .get("groundingMetadata")
        .and_then(|gm| serde_json::from_value::<GroundingMetadata>(gm.clone()).ok());

    if text.is_empty() && grounding.is_none() {
        return None;
    }

    Some(Fragment { text, grounding })
}
