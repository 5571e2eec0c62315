//! Streaming response assembly
//!
//! Turns a gateway fragment stream into a monotonically growing model
//! message inside the session store. Fragments are pulled strictly in
//! order, one at a time; each pull republishes the trailing message with
//! the accumulated text, so the store only ever observes "no model
//! message yet", "a growing partial", or "a finished message".

use crate::agents::AgentKind;
use crate::error::Result;
use crate::gateway::FragmentStream;
use crate::session::{Message, SessionStore};

/// Drains a fragment stream into the session's trailing model message
///
/// A placeholder model message (empty content, sender "Orchestrator") is
/// published before any bytes arrive so the rendering layer shows a
/// response slot immediately. Every fragment then republishes the message
/// with the concatenated accumulator and the latest citation metadata
/// seen. Completion leaves the last published state final; there is no
/// separate finalize publish.
///
/// # Arguments
///
/// * `store` - Session store receiving each publish
/// * `session_id` - Session owning the turn
/// * `base_messages` - Message sequence up to and including the just-sent
///   user message
/// * `fragments` - Fragment stream from the gateway, consumed fully
/// * `on_fragment` - Invoked with each text delta as it lands (the CLI
///   prints it; tests count it)
///
/// # Errors
///
/// Returns the stream's error when a fragment pull fails. The partial
/// message published so far is left in the store as-is; the caller
/// decides how to surface the failure.
pub async fn assemble_response(
    store: &mut SessionStore,
    session_id: &str,
    base_messages: Vec<Message>,
    mut fragments: FragmentStream,
    mut on_fragment: impl FnMut(&str),
) -> Result<Message> {
    let mut model_message = Message::model("", AgentKind::Orchestrator.name());

    let mut messages = base_messages;
    messages.push(model_message.clone());
    store.update_messages(session_id, messages.clone())?;

    while let Some(item) = fragments.recv().await {
        let fragment = item?;

        model_message.content.push_str(&fragment.text);
        if fragment.grounding.is_some() {
            model_message.grounding = fragment.grounding;
        }

        if let Some(last) = messages.last_mut() {
            *last = model_message.clone();
        }
        store.update_messages(session_id, messages.clone())?;
        on_fragment(&fragment.text);
    }

    tracing::debug!(
        session = %session_id,
        chars = model_message.content.len(),
        "Response stream complete"
    );

    Ok(model_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwarmchatError;
    use crate::gateway::Fragment;
    use crate::session::{GroundingChunk, GroundingMetadata, Role, WebSource};
    use tokio::sync::mpsc;

    fn text_fragment(text: &str) -> Fragment {
        Fragment {
            text: text.to_string(),
            grounding: None,
        }
    }

    fn store_with_session() -> (SessionStore, String) {
        let mut store = SessionStore::new();
        let id = store.new_session().id.clone();
        (store, id)
    }

    #[tokio::test]
    async fn test_content_is_concatenation_of_fragments() {
        let (mut store, id) = store_with_session();
        let base = vec![Message::user("question")];
        store.update_messages(&id, base.clone()).unwrap();

        let (tx, rx) = mpsc::channel(8);
        for part in ["alpha ", "beta ", "gamma"] {
            tx.send(Ok(text_fragment(part))).await.unwrap();
        }
        drop(tx);

        let message = assemble_response(&mut store, &id, base, rx, |_| {})
            .await
            .unwrap();

        assert_eq!(message.content, "alpha beta gamma");
        let session = store.find(&id).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].content, "alpha beta gamma");
    }

    #[tokio::test]
    async fn test_store_sees_placeholder_plus_one_publish_per_fragment() {
        let (mut store, id) = store_with_session();
        let base = vec![Message::user("question")];
        store.update_messages(&id, base.clone()).unwrap();

        let (tx, rx) = mpsc::channel(8);
        for i in 0..5 {
            tx.send(Ok(text_fragment(&format!("part{} ", i)))).await.unwrap();
        }
        drop(tx);

        let before = store.revision();
        assemble_response(&mut store, &id, base, rx, |_| {})
            .await
            .unwrap();

        // Placeholder + one publish per fragment
        assert_eq!(store.revision() - before, 6);
    }

    #[tokio::test]
    async fn test_placeholder_published_before_any_fragment() {
        let (mut store, id) = store_with_session();
        let base = vec![Message::user("question")];
        store.update_messages(&id, base.clone()).unwrap();

        // Zero-fragment stream: only the placeholder lands
        let (tx, rx) = mpsc::channel::<crate::error::Result<Fragment>>(1);
        drop(tx);

        let message = assemble_response(&mut store, &id, base, rx, |_| {})
            .await
            .unwrap();

        assert_eq!(message.content, "");
        assert_eq!(message.role, Role::Model);
        assert_eq!(message.sender.as_deref(), Some("Orchestrator"));

        let session = store.find(&id).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].content, "");
    }

    #[tokio::test]
    async fn test_message_id_stable_across_publishes() {
        let (mut store, id) = store_with_session();
        let base = vec![Message::user("question")];
        store.update_messages(&id, base.clone()).unwrap();

        let (tx, rx) = mpsc::channel(8);
        tx.send(Ok(text_fragment("a"))).await.unwrap();
        tx.send(Ok(text_fragment("b"))).await.unwrap();
        drop(tx);

        let message = assemble_response(&mut store, &id, base, rx, |_| {})
            .await
            .unwrap();

        let session = store.find(&id).unwrap();
        assert_eq!(session.messages[1].id, message.id);
        assert_eq!(session.messages[1].content, "ab");
    }

    #[tokio::test]
    async fn test_failure_leaves_partial_in_store() {
        let (mut store, id) = store_with_session();
        let base = vec![Message::user("question")];
        store.update_messages(&id, base.clone()).unwrap();

        let (tx, rx) = mpsc::channel(8);
        tx.send(Ok(text_fragment("one "))).await.unwrap();
        tx.send(Ok(text_fragment("two"))).await.unwrap();
        tx.send(Err(SwarmchatError::StreamInterrupted("reset".to_string()).into()))
            .await
            .unwrap();
        drop(tx);

        let result = assemble_response(&mut store, &id, base, rx, |_| {}).await;
        assert!(result.is_err());

        // Partial content from the two delivered fragments stays put
        let session = store.find(&id).unwrap();
        assert_eq!(session.messages[1].content, "one two");
    }

    #[tokio::test]
    async fn test_latest_grounding_wins() {
        let (mut store, id) = store_with_session();
        let base = vec![Message::user("question")];
        store.update_messages(&id, base.clone()).unwrap();

        let grounding = |uri: &str| GroundingMetadata {
            grounding_chunks: vec![GroundingChunk {
                web: Some(WebSource {
                    uri: uri.to_string(),
                    title: String::new(),
                }),
            }],
        };

        let (tx, rx) = mpsc::channel(8);
        tx.send(Ok(Fragment {
            text: "a".to_string(),
            grounding: Some(grounding("https://one.example")),
        }))
        .await
        .unwrap();
        tx.send(Ok(text_fragment("b"))).await.unwrap();
        tx.send(Ok(Fragment {
            text: "c".to_string(),
            grounding: Some(grounding("https://two.example")),
        }))
        .await
        .unwrap();
        drop(tx);

        let message = assemble_response(&mut store, &id, base, rx, |_| {})
            .await
            .unwrap();

        let sources = message.grounding.unwrap();
        assert_eq!(
            sources.grounding_chunks[0].web.as_ref().unwrap().uri,
            "https://two.example"
        );
    }

    #[tokio::test]
    async fn test_on_fragment_called_once_per_fragment() {
        let (mut store, id) = store_with_session();
        let base = vec![Message::user("question")];
        store.update_messages(&id, base.clone()).unwrap();

        let (tx, rx) = mpsc::channel(8);
        for part in ["x", "y", "z"] {
            tx.send(Ok(text_fragment(part))).await.unwrap();
        }
        drop(tx);

        let mut deltas = Vec::new();
        assemble_response(&mut store, &id, base, rx, |delta| {
            deltas.push(delta.to_string())
        })
        .await
        .unwrap();

        assert_eq!(deltas, vec!["x", "y", "z"]);
    }
}
