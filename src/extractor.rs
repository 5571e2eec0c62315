//! Learning path extraction from response text
//!
//! The assistant appends structured learning paths as a fenced block
//! tagged `json`. This module locates the block, parses it into a
//! [`LearningPath`], and can strip the raw fence from a display copy of
//! the text. Parse failures are recoverable: they are logged and reported
//! as "no structured block present".

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One step of a learning path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone heading
    pub title: String,
    /// What the learner does in this step
    pub description: String,
    /// Suggested time span, free-form ("2 weeks")
    pub duration: String,
    /// Suggested resources; empty when the assistant omits them
    #[serde(default)]
    pub resources: Vec<String>,
}

/// A structured learning path parsed from a fenced `json` block
///
/// Parsed transiently from message text and recomputed per render; never
/// stored as its own entity. A path with zero milestones is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    /// Subject of the path
    pub topic: String,
    /// Introductory paragraph
    pub overview: String,
    /// Ordered steps; empty when the assistant omits them
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// Which fenced block to use when a response carries more than one
///
/// The documented protocol places the block at the very end of the
/// response, so `Last` is the default; `First` is available for gateways
/// that front-load it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSelection {
    /// Use the first `json` fence in the text
    First,
    /// Use the last `json` fence in the text
    #[default]
    Last,
}

impl BlockSelection {
    /// Parse a selection policy from a string
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the policy ("first" or "last")
    ///
    /// # Examples
    ///
    /// ```
    /// use swarmchat::extractor::BlockSelection;
    ///
    /// assert_eq!(BlockSelection::parse_str("first").unwrap(), BlockSelection::First);
    /// assert!(BlockSelection::parse_str("middle").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => Err(format!("Unknown block selection: {}", other)),
        }
    }
}

fn json_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```json[ \t]*\n(.*?)\n[ \t]*```").expect("fence pattern is valid")
    })
}

/// Byte range and body of the selected fenced block, if any
fn select_block(text: &str, selection: BlockSelection) -> Option<(std::ops::Range<usize>, String)> {
    let mut captures = json_fence_regex().captures_iter(text);

    let chosen = match selection {
        BlockSelection::First => captures.next(),
        BlockSelection::Last => captures.last(),
    }?;

    let whole = chosen.get(0)?;
    let body = chosen.get(1)?.as_str().to_string();
    Some((whole.range(), body))
}

/// Extracts a learning path from response text
///
/// Scans for fenced blocks tagged `json`, picks the one named by
/// `selection`, and parses it. Malformed JSON or a shape mismatch is
/// treated as "no structured block": the error is logged at debug level
/// and `None` is returned. The input is never mutated, so calling this
/// twice on the same text yields the same result.
///
/// # Arguments
///
/// * `text` - Full message content
/// * `selection` - Which fence to use when several are present
///
/// # Examples
///
/// ```
/// use swarmchat::extractor::{extract_learning_path, BlockSelection};
///
/// let text = "Here you go.\n```json\n{\"topic\":\"Rust\",\"overview\":\"systems\"}\n```";
/// let path = extract_learning_path(text, BlockSelection::Last).unwrap();
/// assert_eq!(path.topic, "Rust");
/// assert!(path.milestones.is_empty());
/// ```
pub fn extract_learning_path(text: &str, selection: BlockSelection) -> Option<LearningPath> {
    let (_, body) = select_block(text, selection)?;

    match serde_json::from_str::<LearningPath>(&body) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!(error = %e, "Fenced json block is not a learning path");
            None
        }
    }
}

/// Returns a display copy of the text with the selected fence removed
///
/// Exactly one occurrence (the one `selection` names) is stripped; the
/// stored message content is left untouched by design of the `&str`
/// signature. Text without a fence is returned unchanged.
///
/// # Arguments
///
/// * `text` - Full message content
/// * `selection` - Which fence to strip when several are present
pub fn strip_learning_path_block(text: &str, selection: BlockSelection) -> String {
    match select_block(text, selection) {
        Some((range, _)) => {
            let mut stripped = String::with_capacity(text.len() - range.len());
            stripped.push_str(&text[..range.start]);
            stripped.push_str(&text[range.end..]);
            stripped.trim_end().to_string()
        }
        None => text.to_string(),
    }
}
