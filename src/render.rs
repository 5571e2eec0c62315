//! Terminal rendering of messages
//!
//! Formats messages for the interactive loop: prose and agent-attributed
//! sections from the typed segment sequence, the learning path as a
//! table, and web citations as a footer. Formatting is separated from
//! printing so the pieces are testable.

use crate::agents::AgentKind;
use crate::extractor::{BlockSelection, LearningPath};
use crate::segments::{parse_segments, Segment};
use crate::session::{GroundingMetadata, Message, Role};
use colored::Colorize;
use prettytable::{format, row, Table};

/// Formats a message for terminal display
///
/// Model messages are rendered segment by segment; the raw fenced JSON
/// never appears because the segment parser strips it. User messages show
/// their attachment names; system notices render as-is.
///
/// # Arguments
///
/// * `message` - The message to format
/// * `selection` - Fence selection policy for structured blocks
pub fn format_message(message: &Message, selection: BlockSelection) -> String {
    match message.role {
        Role::User => format_user_message(message),
        Role::System => format!("{}\n", message.content.red()),
        Role::Model => format_model_message(message, selection),
    }
}

fn format_user_message(message: &Message) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        "You".bold(),
        message.timestamp.format("%H:%M").to_string().dimmed()
    ));
    for attachment in &message.attachments {
        out.push_str(&format!("  {} {}\n", "📎".dimmed(), attachment.name.dimmed()));
    }
    out.push_str(&message.content);
    out.push('\n');
    out
}

fn format_model_message(message: &Message, selection: BlockSelection) -> String {
    let sender = message.sender.as_deref().unwrap_or("Assistant");
    let mut out = format!(
        "{} {}\n",
        sender.bold().purple(),
        message.timestamp.format("%H:%M").to_string().dimmed()
    );

    for segment in parse_segments(&message.content, selection) {
        match segment {
            Segment::Prose(prose) => {
                out.push_str(&prose);
                out.push('\n');
            }
            Segment::AgentSection { agent, body } => {
                out.push_str(&format!("\n{}\n{}\n", agent.colored_name().bold(), body));
            }
            Segment::Path(path) => {
                out.push('\n');
                out.push_str(&format_learning_path(&path));
            }
        }
    }

    if let Some(grounding) = &message.grounding {
        let citations = format_citations(grounding);
        if !citations.is_empty() {
            out.push('\n');
            out.push_str(&citations);
        }
    }

    out
}

/// Formats a learning path as a header plus milestone table
///
/// A path with zero milestones renders only the header and overview.
pub fn format_learning_path(path: &LearningPath) -> String {
    let mut out = format!(
        "{} {}\n{}\n",
        AgentKind::LearningPath.colored_name().bold(),
        path.topic.bold(),
        path.overview
    );

    if path.milestones.is_empty() {
        return out;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["#", "Milestone", "Duration", "Resources"]);

    for (index, milestone) in path.milestones.iter().enumerate() {
        table.add_row(row![
            index + 1,
            format!("{}\n{}", milestone.title, milestone.description),
            milestone.duration,
            milestone.resources.join("\n"),
        ]);
    }

    out.push_str(&table.to_string());
    out
}

/// Formats the citation footer
///
/// Only sources with a parseable URI are listed; an empty result means
/// the footer should be skipped entirely.
pub fn format_citations(grounding: &GroundingMetadata) -> String {
    let sources = grounding.renderable_sources();
    if sources.is_empty() {
        return String::new();
    }

    let mut out = format!("{}\n", "Sources Verified by Critic".dimmed().underline());
    for (url, title) in sources {
        let label = if title.is_empty() {
            url.as_str().to_string()
        } else {
            title
        };
        out.push_str(&format!("  • {} — {}\n", label, url.as_str().dimmed()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Milestone;
    use crate::session::{Attachment, AttachmentKind, GroundingChunk, WebSource};

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_user_message_lists_attachments() {
        no_color();
        let message = Message::user_with_attachments(
            "look at these",
            vec![Attachment {
                kind: AttachmentKind::File,
                mime_type: "text/plain".to_string(),
                data: String::new(),
                name: "notes.txt".to_string(),
            }],
        );

        let out = format_message(&message, BlockSelection::Last);
        assert!(out.contains("You"));
        assert!(out.contains("notes.txt"));
        assert!(out.contains("look at these"));
    }

    #[test]
    fn test_model_message_hides_raw_json_block() {
        no_color();
        let message = Message::model(
            "Plan follows.\n```json\n{\"topic\":\"Rust\",\"overview\":\"ownership\"}\n```",
            "Orchestrator",
        );

        let out = format_message(&message, BlockSelection::Last);
        assert!(out.contains("Plan follows."));
        assert!(!out.contains("```json"));
        assert!(out.contains("Rust"));
    }

    #[test]
    fn test_system_notice_rendered_verbatim() {
        no_color();
        let message = Message::system("something broke");
        assert!(format_message(&message, BlockSelection::Last).contains("something broke"));
    }

    #[test]
    fn test_learning_path_table_lists_milestones() {
        no_color();
        let path = LearningPath {
            topic: "Compilers".to_string(),
            overview: "Front to back".to_string(),
            milestones: vec![Milestone {
                title: "Lexing".to_string(),
                description: "Tokens and automata".to_string(),
                duration: "1 week".to_string(),
                resources: vec!["Dragon book ch. 3".to_string()],
            }],
        };

        let out = format_learning_path(&path);
        assert!(out.contains("Compilers"));
        assert!(out.contains("Lexing"));
        assert!(out.contains("1 week"));
        assert!(out.contains("Dragon book ch. 3"));
    }

    #[test]
    fn test_learning_path_without_milestones_is_header_only() {
        no_color();
        let path = LearningPath {
            topic: "Nothing yet".to_string(),
            overview: "Placeholder".to_string(),
            milestones: Vec::new(),
        };

        let out = format_learning_path(&path);
        assert!(out.contains("Nothing yet"));
        // No table rows below the header
        assert!(!out.contains('│'));
    }

    #[test]
    fn test_citations_skip_unparseable_uris() {
        no_color();
        let grounding = GroundingMetadata {
            grounding_chunks: vec![
                GroundingChunk {
                    web: Some(WebSource {
                        uri: "https://example.com/paper".to_string(),
                        title: "A Paper".to_string(),
                    }),
                },
                GroundingChunk {
                    web: Some(WebSource {
                        uri: "::broken::".to_string(),
                        title: "Broken".to_string(),
                    }),
                },
            ],
        };

        let out = format_citations(&grounding);
        assert!(out.contains("A Paper"));
        assert!(!out.contains("Broken"));
    }

    #[test]
    fn test_citations_empty_when_no_sources() {
        no_color();
        assert!(format_citations(&GroundingMetadata::default()).is_empty());
    }
}
