//! One full send operation
//!
//! Composes the pieces of a turn: store the user message, walk the
//! hand-off sequencer, call the gateway, assemble the streamed response,
//! and recover from failure by appending a single system notice. Gateway
//! and stream failures never escape this module; the session stays
//! usable for the next send.

use crate::error::{Result, SwarmchatError};
use crate::gateway::Gateway;
use crate::sequencer::HandoffSequencer;
use crate::session::{Attachment, Message, SessionStore};
use crate::stream::assemble_response;

/// Fixed user-facing explanation appended when a turn fails
pub const GATEWAY_FAILURE_NOTICE: &str =
    "⚠️ **System Error**: The Orchestrator failed to connect to the agent swarm. Please try again.";

/// How a turn ended
#[derive(Debug)]
pub enum TurnOutcome {
    /// The stream completed; the final model message is returned
    Completed(Message),
    /// The gateway or stream failed; a system notice was appended
    Failed,
}

/// Runs one user turn against the gateway
///
/// The user message is stored before streaming starts (deriving the
/// session title when it is the first one), then the sequencer walks its
/// phase labels and clears the active step before the gateway call. On
/// any gateway or stream failure the partial response (if any) is left
/// as-is, exactly one system notice is appended, the active step is
/// cleared, and `Ok(TurnOutcome::Failed)` is returned.
///
/// The interactive loop awaits this function, so a second send for the
/// same session cannot start while one is outstanding.
///
/// # Arguments
///
/// * `store` - Application session store
/// * `session_id` - Session receiving the turn
/// * `gateway` - Remote chat session handle
/// * `sequencer` - Hand-off phase sequencer
/// * `text` - User message text
/// * `attachments` - Attachments for the outgoing message
/// * `on_fragment` - Invoked with each streamed text delta
///
/// # Errors
///
/// Returns an error only for store-level misuse (unknown session id);
/// gateway and stream failures are recovered into the session itself.
pub async fn run_turn(
    store: &mut SessionStore,
    session_id: &str,
    gateway: &mut dyn Gateway,
    sequencer: &HandoffSequencer,
    text: &str,
    attachments: &[Attachment],
    on_fragment: impl FnMut(&str),
) -> Result<TurnOutcome> {
    let user_message = Message::user_with_attachments(text, attachments.to_vec());

    let mut base_messages = store
        .find(session_id)
        .ok_or_else(|| SwarmchatError::Session(format!("no session with id {}", session_id)))?
        .messages
        .clone();
    base_messages.push(user_message);
    store.update_messages(session_id, base_messages.clone())?;

    sequencer.run().await;

    let fragments = match gateway.send(text, attachments).await {
        Ok(fragments) => fragments,
        Err(e) => {
            tracing::warn!(error = %e, "Gateway send failed");
            append_failure_notice(store, session_id)?;
            sequencer.clear();
            return Ok(TurnOutcome::Failed);
        }
    };

    match assemble_response(store, session_id, base_messages, fragments, on_fragment).await {
        Ok(message) => {
            sequencer.clear();
            Ok(TurnOutcome::Completed(message))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Response stream failed");
            append_failure_notice(store, session_id)?;
            sequencer.clear();
            Ok(TurnOutcome::Failed)
        }
    }
}

/// Appends the fixed failure notice after the current message sequence
///
/// The notice occupies a model slot but is attributed to "System", so the
/// rendering layer shows it inline with the conversation. The partial
/// model message from an interrupted stream is intentionally left in
/// place; only the notice is added.
fn append_failure_notice(store: &mut SessionStore, session_id: &str) -> Result<()> {
    let mut messages = store
        .find(session_id)
        .ok_or_else(|| SwarmchatError::Session(format!("no session with id {}", session_id)))?
        .messages
        .clone();
    messages.push(Message::model(GATEWAY_FAILURE_NOTICE, "System"));
    store.update_messages(session_id, messages)
}
