//! Gateway streaming integration tests against a mock SSE server

use serde_json::json;

use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use swarmchat::config::GatewayConfig;
use swarmchat::gateway::{Gateway, GeminiGateway};
use swarmchat::SwarmchatError;

const STREAM_PATH: &str = "/v1beta/models/gemini-2.5-flash:streamGenerateContent";

fn gateway_for(server: &MockServer, key_env: &str) -> GeminiGateway {
    std::env::set_var(key_env, "test-key");
    let config = GatewayConfig {
        api_base: Some(server.uri()),
        api_key_env: key_env.to_string(),
        ..GatewayConfig::default()
    };
    GeminiGateway::new(&config).unwrap()
}

fn sse_body(events: &[serde_json::Value]) -> String {
    events
        .iter()
        .map(|event| format!("data: {}\n\n", event))
        .collect()
}

#[tokio::test]
async fn test_fragments_arrive_in_order_with_grounding() {
    let server = MockServer::start().await;

    let body = sse_body(&[
        json!({"candidates": [{"content": {"parts": [{"text": "Hello "}]}}]}),
        json!({"candidates": [{"content": {"parts": [{"text": "world"}]}}]}),
        json!({"candidates": [{
            "content": {"parts": [{"text": "!"}]},
            "groundingMetadata": {"groundingChunks": [
                {"web": {"uri": "https://example.com/source", "title": "Source"}}
            ]}
        }]}),
    ]);

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("alt", "sse"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let mut gateway = gateway_for(&server, "SWARMCHAT_TEST_KEY_ORDER");
    let mut fragments = gateway.send("hi", &[]).await.unwrap();

    let mut text = String::new();
    let mut last_grounding = None;
    while let Some(item) = fragments.recv().await {
        let fragment = item.unwrap();
        text.push_str(&fragment.text);
        if fragment.grounding.is_some() {
            last_grounding = fragment.grounding;
        }
    }

    assert_eq!(text, "Hello world!");
    let grounding = last_grounding.expect("final fragment carries citations");
    assert_eq!(grounding.grounding_chunks.len(), 1);
}

#[tokio::test]
async fn test_request_carries_instruction_temperature_and_search_tool() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user", "parts": [{"text": "hi"}]}
            ],
            "tools": [{"google_search": {}}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&[]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut gateway = gateway_for(&server, "SWARMCHAT_TEST_KEY_SHAPE");
    let mut fragments = gateway.send("hi", &[]).await.unwrap();
    while fragments.recv().await.is_some() {}
}

#[tokio::test]
async fn test_attachments_follow_text_part() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user", "parts": [
                    {"text": "what is this"},
                    {"inlineData": {"mimeType": "image/png", "data": "aWNvbg=="}}
                ]}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&[]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let attachment = swarmchat::session::Attachment {
        kind: swarmchat::session::AttachmentKind::Image,
        mime_type: "image/png".to_string(),
        data: "aWNvbg==".to_string(),
        name: "icon.png".to_string(),
    };

    let mut gateway = gateway_for(&server, "SWARMCHAT_TEST_KEY_ATTACH");
    let mut fragments = gateway.send("what is this", &[attachment]).await.unwrap();
    while fragments.recv().await.is_some() {}
}

#[tokio::test]
async fn test_history_sent_on_follow_up_turn() {
    let server = MockServer::start().await;

    // First turn; expires after one use so the follow-up request (whose
    // contents start with the same entry) cannot be routed here
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "first"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sse_body(&[json!({"candidates": [{"content": {"parts": [{"text": "answer one"}]}}]})]),
            "text/event-stream",
        ))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    // Second turn must replay the first user turn and the model reply
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user", "parts": [{"text": "first"}]},
                {"role": "model", "parts": [{"text": "answer one"}]},
                {"role": "user", "parts": [{"text": "second"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sse_body(&[json!({"candidates": [{"content": {"parts": [{"text": "answer two"}]}}]})]),
            "text/event-stream",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut gateway = gateway_for(&server, "SWARMCHAT_TEST_KEY_HISTORY");

    let mut first = gateway.send("first", &[]).await.unwrap();
    while first.recv().await.is_some() {}

    let mut second = gateway.send("second", &[]).await.unwrap();
    let mut text = String::new();
    while let Some(item) = second.recv().await {
        text.push_str(&item.unwrap().text);
    }
    assert_eq!(text, "answer two");
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let mut gateway = gateway_for(&server, "SWARMCHAT_TEST_KEY_AUTH");
    let err = gateway.send("hi", &[]).await.unwrap_err();
    let err = err.downcast::<SwarmchatError>().unwrap();
    assert!(matches!(err, SwarmchatError::Authentication(_)));
}

#[tokio::test]
async fn test_server_error_maps_to_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut gateway = gateway_for(&server, "SWARMCHAT_TEST_KEY_5XX");
    let err = gateway.send("hi", &[]).await.unwrap_err();
    let err = err.downcast::<SwarmchatError>().unwrap();
    assert!(matches!(err, SwarmchatError::Gateway(_)));
}

#[tokio::test]
async fn test_unparseable_sse_lines_are_skipped() {
    let server = MockServer::start().await;

    let body = format!(
        ": keep-alive comment\ndata: not json\n\n{}",
        sse_body(&[json!({"candidates": [{"content": {"parts": [{"text": "fine"}]}}]})])
    );

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut gateway = gateway_for(&server, "SWARMCHAT_TEST_KEY_SKIP");
    let mut fragments = gateway.send("hi", &[]).await.unwrap();

    let mut text = String::new();
    while let Some(item) = fragments.recv().await {
        text.push_str(&item.unwrap().text);
    }
    assert_eq!(text, "fine");
}
