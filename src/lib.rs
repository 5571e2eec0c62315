//! Swarmchat - terminal chat client for a multi-agent research assistant
//!
//! This library provides the core functionality for the Swarmchat client:
//! session management, streamed response assembly, structured learning
//! path extraction, and the remote gateway contract.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Chat sessions, messages, and the in-memory store
//! - `gateway`: Remote chat gateway contract and the Gemini implementation
//! - `stream`: Streaming response assembly into the session store
//! - `sequencer`: Cosmetic agent hand-off pacing
//! - `extractor`: Fenced-JSON learning path extraction
//! - `segments`: Typed segmentation of model responses
//! - `turn`: The composed send operation with error recovery
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use swarmchat::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     // Gateway and session usage would go here
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod gateway;
pub mod prompts;
pub mod render;
pub mod segments;
pub mod sequencer;
pub mod session;
pub mod stream;
pub mod turn;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SwarmchatError};
pub use extractor::{BlockSelection, LearningPath, Milestone};
pub use gateway::{Fragment, Gateway};
pub use session::{ChatSession, Message, Role, SessionStore};

#[cfg(test)]
pub mod test_utils;
