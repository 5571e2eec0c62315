//! The fixed roster of conceptual agents behind the research assistant
//!
//! The remote service presents itself as a team of specialized agents
//! coordinated by an orchestrator. This module names them, describes them,
//! and maps them to terminal colors. The roster drives the hand-off phase
//! labels, the response section headers, and the renderer.

use colored::Colorize;
use std::fmt;

/// A conceptual agent in the research team
///
/// These are presentation-level identities, not separate processes: the
/// remote service attributes parts of its response to them via Markdown
/// section headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Coordinates the workflow and delegates tasks
    Orchestrator,
    /// Searches the web and gathers information
    Researcher,
    /// Fact-checks and validates sources
    Critic,
    /// Creates concise summaries of research findings
    Summarizer,
    /// Structures topics into learning journeys
    LearningPath,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AgentKind {
    /// All agents, in workflow order
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Orchestrator,
        AgentKind::Researcher,
        AgentKind::Critic,
        AgentKind::Summarizer,
        AgentKind::LearningPath,
    ];

    /// Display name used in response headers and the renderer
    pub fn name(&self) -> &'static str {
        match self {
            Self::Orchestrator => "Orchestrator",
            Self::Researcher => "Researcher",
            Self::Critic => "Critic",
            Self::Summarizer => "Summarizer",
            Self::LearningPath => "Learning Path",
        }
    }

    /// Short role label
    pub fn role(&self) -> &'static str {
        match self {
            Self::Orchestrator => "Coordinator",
            Self::Researcher => "Information Gatherer",
            Self::Critic => "Reviewer",
            Self::Summarizer => "Content Distiller",
            Self::LearningPath => "Educator",
        }
    }

    /// One-line description shown in `/help`
    pub fn description(&self) -> &'static str {
        match self {
            Self::Orchestrator => "Coordinates the multi-agent workflow and delegates tasks.",
            Self::Researcher => "Searches the web and gathers information.",
            Self::Critic => "Fact-checks and validates sources.",
            Self::Summarizer => "Creates concise summaries of research findings.",
            Self::LearningPath => "Structures topics into learning journeys.",
        }
    }

    /// Match an agent by its display name, case-insensitively
    ///
    /// # Arguments
    ///
    /// * `s` - Candidate name, e.g. a response header fragment
    ///
    /// # Examples
    ///
    /// ```
    /// use swarmchat::agents::AgentKind;
    ///
    /// assert_eq!(AgentKind::from_name("researcher"), Some(AgentKind::Researcher));
    /// assert_eq!(AgentKind::from_name("Learning Path"), Some(AgentKind::LearningPath));
    /// assert_eq!(AgentKind::from_name("intern"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|agent| agent.name().to_lowercase() == lower)
    }

    /// Colored display name for terminal output
    pub fn colored_name(&self) -> String {
        match self {
            Self::Orchestrator => self.name().purple().to_string(),
            Self::Researcher => self.name().blue().to_string(),
            Self::Critic => self.name().red().to_string(),
            Self::Summarizer => self.name().green().to_string(),
            Self::LearningPath => self.name().yellow().to_string(),
        }
    }
}
