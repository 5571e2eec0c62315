//! Command-line interface definition for Swarmchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat and one-shot prompts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Swarmchat - terminal chat client for a multi-agent research assistant
///
/// Talk to a remote research swarm: streamed responses, source
/// citations, and structured learning paths, straight in the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "swarmchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Swarmchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive chat mode
    Chat,

    /// Send one prompt and print the formatted response
    Ask {
        /// The prompt to send
        prompt: String,

        /// File to attach (repeatable)
        #[arg(short, long)]
        attach: Vec<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
