//! `CdpPage` against a scripted local WebSocket peer.
//!
//! The peer emits an unrelated event before every reply so the tests also
//! cover the client skipping messages that are not the awaited reply.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use placescout_presence::{wait_for_page_target, CdpPage, PresenceError};

/// Starts a one-connection CDP peer. `respond` maps `(method, params)` to the
/// full reply body minus `id`.
async fn spawn_peer<F>(respond: F) -> String
where
    F: Fn(&str, &Value) -> Value + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("websocket handshake");

        while let Some(Ok(message)) = ws.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let request: Value = serde_json::from_str(text.as_str()).expect("request json");
            let id = request["id"].clone();
            let method = request["method"].as_str().unwrap_or_default().to_owned();

            let event = json!({ "method": "Page.frameStartedLoading", "params": {} });
            ws.send(Message::Text(event.to_string().into()))
                .await
                .expect("send event");

            let mut reply = respond(&method, &request["params"]);
            reply["id"] = id;
            ws.send(Message::Text(reply.to_string().into()))
                .await
                .expect("send reply");
        }
    });

    format!("ws://{addr}")
}

#[tokio::test]
async fn navigate_succeeds_without_error_text() {
    let url = spawn_peer(|method, params| {
        assert_eq!(method, "Page.navigate");
        assert_eq!(params["url"], "https://web.whatsapp.com");
        json!({ "result": { "frameId": "F1", "loaderId": "L1" } })
    })
    .await;

    let mut page = CdpPage::connect(&url).await.expect("connect");
    page.navigate("https://web.whatsapp.com")
        .await
        .expect("navigate should succeed");
}

#[tokio::test]
async fn navigate_error_text_becomes_navigation_error() {
    let url = spawn_peer(|_, _| {
        json!({ "result": { "frameId": "F1", "errorText": "net::ERR_NAME_NOT_RESOLVED" } })
    })
    .await;

    let mut page = CdpPage::connect(&url).await.expect("connect");
    let err = page
        .navigate("https://nope.invalid")
        .await
        .expect_err("errorText must fail");

    match err {
        PresenceError::Navigation { url, reason } => {
            assert_eq!(url, "https://nope.invalid");
            assert_eq!(reason, "net::ERR_NAME_NOT_RESOLVED");
        }
        other => panic!("expected Navigation, got: {other:?}"),
    }
}

#[tokio::test]
async fn evaluate_returns_value_by_value() {
    let url = spawn_peer(|method, params| {
        assert_eq!(method, "Runtime.evaluate");
        assert_eq!(params["returnByValue"], true);
        json!({ "result": { "result": { "type": "string", "value": "Phone number shared via url is invalid." } } })
    })
    .await;

    let mut page = CdpPage::connect(&url).await.expect("connect");
    let value = page.evaluate("popupText()").await.expect("evaluate");
    assert_eq!(value, json!("Phone number shared via url is invalid."));
}

#[tokio::test]
async fn evaluate_null_result_is_null() {
    let url = spawn_peer(|_, _| json!({ "result": { "result": { "type": "object", "subtype": "null", "value": null } } })).await;

    let mut page = CdpPage::connect(&url).await.expect("connect");
    let value = page.evaluate("popupText()").await.expect("evaluate");
    assert!(value.is_null());
}

#[tokio::test]
async fn evaluate_exception_becomes_javascript_error() {
    let url = spawn_peer(|_, _| {
        json!({ "result": {
            "result": { "type": "object", "subtype": "error" },
            "exceptionDetails": { "text": "Uncaught ReferenceError" }
        } })
    })
    .await;

    let mut page = CdpPage::connect(&url).await.expect("connect");
    let result = page.evaluate("missing()").await;
    assert!(
        matches!(result, Err(PresenceError::JavaScript(ref text)) if text == "Uncaught ReferenceError"),
        "expected JavaScript error, got: {result:?}"
    );
}

#[tokio::test]
async fn protocol_error_object_is_surfaced() {
    let url = spawn_peer(|_, _| {
        json!({ "error": { "code": -32601, "message": "'Nope.method' wasn't found" } })
    })
    .await;

    let mut page = CdpPage::connect(&url).await.expect("connect");
    let result = page.call("Nope.method", json!({})).await;
    assert!(
        matches!(result, Err(PresenceError::Protocol { code: -32601, .. })),
        "expected Protocol error, got: {result:?}"
    );
}

#[tokio::test]
async fn consecutive_calls_use_fresh_ids() {
    let url = spawn_peer(|_, _| json!({ "result": {} })).await;

    let mut page = CdpPage::connect(&url).await.expect("connect");
    page.call("Page.enable", json!({})).await.expect("first call");
    page.call("Runtime.enable", json!({})).await.expect("second call");
}

#[tokio::test]
async fn silent_peer_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        // Read but never answer.
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut page = CdpPage::connect(&format!("ws://{addr}"))
        .await
        .expect("connect")
        .with_call_timeout(Duration::from_millis(100));
    let result = page.call("Page.enable", json!({})).await;
    assert!(
        matches!(result, Err(PresenceError::Timeout(_))),
        "expected Timeout, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// wait_for_page_target
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wait_for_page_target_picks_first_page_with_debugger_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "type": "service_worker", "webSocketDebuggerUrl": "ws://127.0.0.1/devtools/sw" },
            { "type": "page", "url": "about:blank" },
            { "type": "page", "webSocketDebuggerUrl": "ws://127.0.0.1/devtools/page/ABC" }
        ])))
        .mount(&server)
        .await;

    let url = wait_for_page_target(&server.uri(), Duration::from_secs(2))
        .await
        .expect("page target");
    assert_eq!(url, "ws://127.0.0.1/devtools/page/ABC");
}

#[tokio::test]
async fn wait_for_page_target_times_out_without_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = wait_for_page_target(&server.uri(), Duration::from_millis(300)).await;
    assert!(
        matches!(result, Err(PresenceError::BrowserNotReady { waited_ms: 300, .. })),
        "expected BrowserNotReady, got: {result:?}"
    );
}
