//! Remote chat gateway abstraction
//!
//! The actual multi-agent orchestration, web search, and inference happen
//! inside a hosted service; this module owns only the call contract. A
//! gateway handle plays the role of one remote chat session: it carries
//! the fixed system instruction and accumulates conversation history, and
//! each `send` yields a lazy, finite, non-restartable stream of response
//! fragments.

use crate::error::Result;
use crate::session::{Attachment, GroundingMetadata};
use async_trait::async_trait;
use tokio::sync::mpsc;

pub mod gemini;
pub use gemini::GeminiGateway;

use crate::config::GatewayConfig;

/// One streamed piece of a model response
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Text delta to append to the accumulating response
    pub text: String,
    /// Citation metadata, when this fragment carries any
    pub grounding: Option<GroundingMetadata>,
}

/// The fragment sequence produced by one send
///
/// Fragments arrive in order; the channel closing is the explicit
/// completion state, and an `Err` item is the explicit error terminal
/// state. Dropping the receiver tears down the underlying connection.
pub type FragmentStream = mpsc::Receiver<Result<Fragment>>;

/// A remote chat session handle
///
/// Implementations retain conversation history across sends so follow-up
/// turns have context. Any failure of the call or of a fragment pull must
/// surface as exactly one typed failure, never be silently swallowed.
#[async_trait]
pub trait Gateway: Send {
    /// Sends a user turn and returns its response fragment stream
    ///
    /// # Arguments
    ///
    /// * `text` - The user's message text
    /// * `attachments` - Inline attachments, appended after the text part
    ///   in order
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be issued (network down,
    /// rejected request). Failures after streaming has begun arrive as an
    /// `Err` item on the returned channel instead.
    async fn send(&mut self, text: &str, attachments: &[Attachment]) -> Result<FragmentStream>;
}

/// Opens a gateway session from configuration
///
/// The credential is resolved from the environment here, before any chat
/// session exists; a missing credential is a fatal configuration error,
/// not a per-request one.
///
/// # Arguments
///
/// * `config` - Gateway configuration (model, temperature, credential env)
pub fn create_gateway(config: &GatewayConfig) -> Result<Box<dyn Gateway>> {
    let gateway = GeminiGateway::new(config)?;
    Ok(Box::new(gateway))
}
