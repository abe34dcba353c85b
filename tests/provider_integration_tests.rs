use std::time::Duration;

use aiko::core::action::{Action, SUMMARY_ERROR_MESSAGE};
use aiko::core::attachment;
use aiko::core::chat::ChatSession;
use aiko::core::config::ResolvedConfig;
use aiko::core::message::Role;
use aiko::inference::{
    CompletionProvider, CompletionRequest, OpenRouterProvider, PromptMessage, ProviderError,
};
use aiko::tui::build_provider;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, body_string_contains, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn provider_for(server: &MockServer, timeout: Duration) -> OpenRouterProvider {
    OpenRouterProvider::new("test-key".to_string(), Some(server.uri()), timeout).unwrap()
}

async fn complete_hello(provider: &OpenRouterProvider) -> Result<String, ProviderError> {
    let messages = vec![PromptMessage::user("Hello")];
    provider
        .complete(CompletionRequest {
            model: "test-model",
            messages: &messages,
        })
        .await
}

fn session_for(server: &MockServer) -> ChatSession {
    let config = ResolvedConfig {
        model_name: "test-model".to_string(),
        openrouter_api_key: Some("test-key".to_string()),
        openrouter_base_url: server.uri(),
        ..ResolvedConfig::default()
    };
    let provider = build_provider(&config).unwrap();
    ChatSession::new(provider, &config)
}

/// Mounts a reply for every request plus a higher-priority suggestions reply.
async fn mount_chat(server: &MockServer, reply: &str, suggestions: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("suggest three short"))
        .respond_with(suggestions)
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply)))
        .mount(server)
        .await;
}

// ============================================================================
// OpenRouter Provider Tests
// ============================================================================

#[tokio::test]
async fn test_openrouter_successful_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": "Hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi! How are you?")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Duration::from_secs(5));
    let reply = complete_hello(&provider).await.unwrap();
    assert_eq!(reply, "Hi! How are you?");
}

#[tokio::test]
async fn test_openrouter_error_envelope_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "No auth credentials found", "code": 401 }
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Duration::from_secs(5));
    let err = complete_hello(&provider).await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::Api {
            status: 401,
            message: "No auth credentials found".to_string()
        }
    );
    assert_eq!(err.user_message(), "No auth credentials found");
}

#[tokio::test]
async fn test_openrouter_error_without_message_uses_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Duration::from_secs(5));
    let err = complete_hello(&provider).await.unwrap_err();
    assert_eq!(err.user_message(), "API request failed with status 502");
}

#[tokio::test]
async fn test_openrouter_missing_content_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Duration::from_secs(5));
    let err = complete_hello(&provider).await.unwrap_err();
    assert_eq!(err, ProviderError::EmptyCompletion);
    assert_eq!(err.user_message(), "Received an invalid response from the AI.");
}

#[tokio::test]
async fn test_openrouter_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Duration::from_millis(200));
    let err = complete_hello(&provider).await.unwrap_err();
    assert!(matches!(err, ProviderError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_openrouter_trailing_slash_in_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenRouterProvider::new(
        "test-key".to_string(),
        Some(format!("{}/", mock_server.uri())),
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(complete_hello(&provider).await.unwrap(), "ok");
}

// ============================================================================
// Chat Session Tests
// ============================================================================

#[tokio::test]
async fn test_session_reply_then_suggestions() {
    let mock_server = MockServer::start().await;
    mount_chat(
        &mock_server,
        "Hi! How are you?",
        ResponseTemplate::new(200).set_body_json(completion_body(
            r#"["Great, thanks!", "A bit tired.", "What about you?"]"#,
        )),
    )
    .await;

    let mut chat = session_for(&mock_server);
    chat.send("Hello").await;

    let state = chat.state();
    assert_eq!(state.messages().len(), 3);
    assert_eq!(state.messages()[1].text(), Some("Hello"));
    assert_eq!(state.messages()[2].text(), Some("Hi! How are you?"));
    assert_eq!(
        state.suggestions(),
        ["Great, thanks!", "A bit tired.", "What about you?"]
    );
    assert!(!state.is_busy());
    assert!(state.last_error().is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_session_suggestion_failure_is_silent() {
    let mock_server = MockServer::start().await;
    mount_chat(
        &mock_server,
        "Sure thing.",
        ResponseTemplate::new(500).set_body_json(json!({ "error": { "message": "overloaded" } })),
    )
    .await;

    let mut chat = session_for(&mock_server);
    chat.send("Can you help?").await;

    let state = chat.state();
    assert_eq!(state.messages().len(), 3);
    assert!(state.suggestions().is_empty());
    assert!(state.last_error().is_none());
}

#[tokio::test]
async fn test_session_reply_failure_shows_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit exceeded" }
        })))
        .mount(&mock_server)
        .await;

    let mut chat = session_for(&mock_server);
    chat.send("Hello").await;

    let state = chat.state();
    assert_eq!(state.messages().len(), 2);
    assert_eq!(state.last_error(), Some("Rate limit exceeded"));
    assert!(!state.is_busy());
}

#[tokio::test]
async fn test_session_image_sends_marker_and_skips_suggestions() {
    let mock_server = MockServer::start().await;
    mount_chat(
        &mock_server,
        "What a cute cat!",
        ResponseTemplate::new(200).set_body_json(completion_body(r#"["unused"]"#)),
    )
    .await;

    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    let image = attachment::from_bytes("cat.png", &png).unwrap();

    let mut chat = session_for(&mock_server);
    chat.dispatch(Action::AttachImage(image)).await;
    chat.send("Look at this").await;

    let state = chat.state();
    assert_eq!(state.messages().len(), 3);
    assert!(state.messages()[1].has_image());
    assert!(state.pending_image().is_none());
    assert!(state.suggestions().is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("[Image is present] Look at this"));
    assert!(!body.contains("base64"));
}

#[tokio::test]
async fn test_session_summarize() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("one-paragraph summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("The user greeted Aiko and asked about cats.")),
        )
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_chat(
        &mock_server,
        "Cats are great.",
        ResponseTemplate::new(200).set_body_json(completion_body("[]")),
    )
    .await;

    let mut chat = session_for(&mock_server);
    chat.send("Tell me about cats").await;
    chat.summarize().await;

    let state = chat.state();
    let last = state.messages().last().unwrap();
    assert_eq!(last.role(), Role::SummaryNote);
    assert_eq!(
        last.text(),
        Some("The user greeted Aiko and asked about cats.")
    );
    assert!(state.last_error().is_none());
}

#[tokio::test]
async fn test_session_summary_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("one-paragraph summary"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_chat(
        &mock_server,
        "Cats are great.",
        ResponseTemplate::new(200).set_body_json(completion_body("[]")),
    )
    .await;

    let mut chat = session_for(&mock_server);
    chat.send("Tell me about cats").await;
    let before = chat.state().messages().len();
    chat.summarize().await;

    let state = chat.state();
    assert_eq!(state.messages().len(), before);
    assert_eq!(state.last_error(), Some(SUMMARY_ERROR_MESSAGE));
    assert!(!state.is_busy());
}
