//! `ChatClient` and `ChatPanel` against a wiremock chat endpoint.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use placescout_assistant::{AssistantError, ChatClient, ChatPanel, NO_RESULT_FALLBACK};

const HOST: &str = "chatgpt-42.p.rapidapi.com";

fn client(server: &MockServer) -> ChatClient {
    ChatClient::with_base_url("rapid-key", HOST, 5, &server.uri())
        .expect("failed to build test ChatClient")
}

#[tokio::test]
async fn ask_posts_user_message_with_rapidapi_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .and(header("x-rapidapi-key", "rapid-key"))
        .and(header("x-rapidapi-host", HOST))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "İzmir'de kaç kafe var?" }],
            "web_access": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "Çok sayıda.",
            "status": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = client(&server)
        .ask("İzmir'de kaç kafe var?")
        .await
        .expect("ask should succeed");
    assert_eq!(answer, "Çok sayıda.");
}

#[tokio::test]
async fn ask_without_result_key_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": false })))
        .mount(&server)
        .await;

    let answer = client(&server).ask("hello").await.expect("fallback, not error");
    assert_eq!(answer, NO_RESULT_FALLBACK);
}

#[tokio::test]
async fn ask_surfaces_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = client(&server).ask("hello").await;
    assert!(
        matches!(result, Err(AssistantError::UnexpectedStatus { status: 429 })),
        "expected UnexpectedStatus(429), got: {result:?}"
    );
}

#[tokio::test]
async fn ask_rejects_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let result = client(&server).ask("hello").await;
    assert!(
        matches!(result, Err(AssistantError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

#[tokio::test]
async fn submit_appends_exchange_and_clears_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "Merhaba!" })))
        .mount(&server)
        .await;

    let mut panel = ChatPanel::new(client(&server));
    panel.set_input("Selam");
    let exchange = panel.submit().await.expect("submit");

    assert_eq!(exchange.answer, "Merhaba!");
    assert_eq!(panel.input(), "");
    assert!(!panel.is_busy());
    assert_eq!(panel.transcript().as_str(), "Question: Selam\nAnswer: Merhaba!\n\n");
}

#[tokio::test]
async fn failed_submit_releases_guard_and_leaves_transcript() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .mount(&server)
        .await;

    let mut panel = ChatPanel::new(client(&server));

    panel.set_input("first");
    let result = panel.submit().await;
    assert!(matches!(
        result,
        Err(AssistantError::UnexpectedStatus { status: 500 })
    ));
    assert_eq!(panel.input(), "");
    assert!(!panel.is_busy(), "guard must be released after a failure");
    assert!(panel.transcript().is_empty());

    panel.set_input("second");
    panel.submit().await.expect("retry succeeds");
    assert_eq!(panel.transcript().len(), 1);
    assert!(panel.transcript().as_str().starts_with("Question: second\n"));
}

#[tokio::test]
async fn pending_ask_runs_on_spawned_task() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gpt4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "async" })))
        .mount(&server)
        .await;

    let mut panel = ChatPanel::new(client(&server));
    panel.set_input("background");
    let pending = panel.begin().expect("begin");
    assert!(panel.is_busy());
    assert_eq!(panel.input(), "background", "input is kept while in flight");

    let result = tokio::spawn(pending.run()).await.expect("task joined");
    assert!(!panel.is_busy());

    panel.finish(result).expect("ask succeeded");
    assert_eq!(panel.input(), "");
    assert_eq!(
        panel.transcript().as_str(),
        "Question: background\nAnswer: async\n\n"
    );
}
