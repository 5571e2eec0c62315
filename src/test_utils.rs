//! Shared helpers for unit tests
//!
//! Provides a scripted gateway whose sends play back canned fragment
//! sequences, so turn and assembler tests run without a network.

use crate::error::{Result, SwarmchatError};
use crate::gateway::{Fragment, FragmentStream, Gateway};
use crate::session::Attachment;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::mpsc;

/// What one scripted send should do
pub enum ScriptedSend {
    /// Stream these items in order; an `Err` item is terminal
    Fragments(Vec<Result<Fragment>>),
    /// Fail the send itself before any streaming begins
    FailImmediately(String),
}

/// Gateway that plays back a script, one entry per send
pub struct ScriptedGateway {
    script: VecDeque<ScriptedSend>,
    /// Text and attachment count of every send, in order
    pub sent: Vec<(String, usize)>,
}

impl ScriptedGateway {
    /// Creates a gateway that answers sends from the given script
    pub fn new(script: Vec<ScriptedSend>) -> Self {
        Self {
            script: script.into(),
            sent: Vec::new(),
        }
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn send(&mut self, text: &str, attachments: &[Attachment]) -> Result<FragmentStream> {
        self.sent.push((text.to_string(), attachments.len()));

        match self.script.pop_front() {
            None => Err(SwarmchatError::Gateway("script exhausted".to_string()).into()),
            Some(ScriptedSend::FailImmediately(message)) => {
                Err(SwarmchatError::Gateway(message).into())
            }
            Some(ScriptedSend::Fragments(items)) => {
                let (tx, rx) = mpsc::channel(16);
                tokio::spawn(async move {
                    for item in items {
                        let terminal = item.is_err();
                        if tx.send(item).await.is_err() {
                            return;
                        }
                        if terminal {
                            return;
                        }
                    }
                });
                Ok(rx)
            }
        }
    }
}
