//! Cosmetic agent hand-off sequencing
//!
//! Before a turn contacts the gateway, the sequencer walks a fixed list
//! of phase labels, publishing each as the current "active step" and
//! pausing between them so hand-offs between the conceptual agents are
//! perceptible. This is pure pacing: it touches no session state, and a
//! zero interval (used in tests) must not change downstream behavior.

use std::time::Duration;
use tokio::sync::watch;

/// Phase labels walked before every gateway call, in order
pub const HANDOFF_PHASES: [&str; 3] = [
    "Orchestrator analyzing...",
    "Researcher searching...",
    "Critic validating...",
];

/// Publishes agent hand-off phases to an observable active step
///
/// The active step is a `watch` channel holding `Some(label)` while a
/// phase is showing and `None` otherwise. The rendering layer subscribes;
/// the turn runner drives [`HandoffSequencer::run`] and clears the step
/// on its failure path.
#[derive(Debug)]
pub struct HandoffSequencer {
    phases: Vec<String>,
    interval: Duration,
    tx: watch::Sender<Option<String>>,
}

impl HandoffSequencer {
    /// Creates a sequencer over the fixed phase list
    ///
    /// # Arguments
    ///
    /// * `interval` - Pause after publishing each label; zero skips the
    ///   pause but still publishes every label in order
    pub fn new(interval: Duration) -> Self {
        Self::with_phases(
            HANDOFF_PHASES.iter().map(|s| s.to_string()).collect(),
            interval,
        )
    }

    /// Creates a sequencer over a custom phase list
    pub fn with_phases(phases: Vec<String>, interval: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            phases,
            interval,
            tx,
        }
    }

    /// Subscribes to active-step changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    /// The currently showing phase label, if any
    pub fn active_step(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Walks every phase in order, then clears the active step
    ///
    /// Each label is published, held for the configured interval, and
    /// replaced by the next; `None` is published after the last label so
    /// the active step is clear before any gateway call begins. The yield
    /// after each publish lets subscribers observe every label even with
    /// a zero interval.
    pub async fn run(&self) {
        for phase in &self.phases {
            self.tx.send_replace(Some(phase.clone()));
            tracing::debug!(phase = %phase, "Agent hand-off");
            if !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
            tokio::task::yield_now().await;
        }
        self.tx.send_replace(None);
    }

    /// Clears the active step immediately
    ///
    /// Used by the turn runner's failure path so an error never leaves a
    /// stale phase label showing.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}
