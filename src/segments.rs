//! Typed segmentation of model responses
//!
//! A finished model message is parsed once into an ordered sequence of
//! typed blocks: plain prose, a section attributed to a named agent, or
//! the structured learning path. The renderer consumes this sequence
//! instead of re-sniffing the raw text for agent names on every pass.

use crate::agents::AgentKind;
use crate::extractor::{extract_learning_path, strip_learning_path_block, BlockSelection, LearningPath};

/// One typed block of a model response
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Unattributed prose
    Prose(String),
    /// A section introduced by an agent header (`### 🕵️ Researcher`)
    AgentSection {
        /// The agent the section is attributed to
        agent: AgentKind,
        /// Section body, without the header line
        body: String,
    },
    /// The structured learning path, when the response carries one
    Path(LearningPath),
}

/// Matches a Markdown header line attributing a section to a known agent
///
/// Headers look like `### 🕵️ Researcher`; the emoji is decorative and
/// optional. Headers naming anything outside the roster are prose.
fn header_agent(line: &str) -> Option<AgentKind> {
    let rest = line.trim_start().strip_prefix("###")?;
    // Drop decorations (emoji, brackets), keep letters and spaces
    let cleaned: String = rest
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect();
    AgentKind::from_name(&cleaned)
}

/// Parses a model message into its typed block sequence
///
/// The selected learning-path fence is stripped from the prose first, so
/// its raw JSON never appears in a `Prose` or `AgentSection` block; the
/// parsed path is appended as the final segment when present. Pure
/// function: equal input yields equal output.
///
/// # Arguments
///
/// * `content` - Full message content
/// * `selection` - Fence selection policy for the structured block
///
/// # Examples
///
/// ```
/// use swarmchat::segments::{parse_segments, Segment};
/// use swarmchat::extractor::BlockSelection;
///
/// let segments = parse_segments("Just an answer.", BlockSelection::Last);
/// assert_eq!(segments, vec![Segment::Prose("Just an answer.".to_string())]);
/// ```
pub fn parse_segments(content: &str, selection: BlockSelection) -> Vec<Segment> {
    let path = extract_learning_path(content, selection);
    let prose = if path.is_some() {
        strip_learning_path_block(content, selection)
    } else {
        content.to_string()
    };

    let mut segments = Vec::new();
    let mut current_agent: Option<AgentKind> = None;
    let mut buffer = String::new();

    let flush = |agent: Option<AgentKind>, buffer: &mut String, segments: &mut Vec<Segment>| {
        let body = buffer.trim().to_string();
        buffer.clear();
        if body.is_empty() {
            return;
        }
        match agent {
            Some(agent) => segments.push(Segment::AgentSection { agent, body }),
            None => segments.push(Segment::Prose(body)),
        }
    };

    for line in prose.lines() {
        if let Some(agent) = header_agent(line) {
            flush(current_agent, &mut buffer, &mut segments);
            current_agent = Some(agent);
        } else {
            buffer.push_str(line);
            buffer.push('\n');
        }
    }
    flush(current_agent, &mut buffer, &mut segments);

    if let Some(path) = path {
        segments.push(Segment::Path(path));
    }

    segments
}
