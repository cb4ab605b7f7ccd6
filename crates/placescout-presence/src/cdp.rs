//! Minimal Chrome DevTools Protocol client bound to a single page target.
//!
//! Commands are issued one at a time; while awaiting a reply, events and
//! replies to other ids are drained and ignored.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::PresenceError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct CdpRequest<'a> {
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CdpResponse {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<CdpErrorBody>,
}

#[derive(Debug, Deserialize)]
struct CdpErrorBody {
    code: i64,
    message: String,
}

/// A WebSocket session attached to one Chrome page.
pub struct CdpPage {
    ws: WsStream,
    next_id: u64,
    call_timeout: Duration,
}

impl CdpPage {
    /// Connects to a page's `webSocketDebuggerUrl`.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::WebSocket`] if the handshake fails.
    pub async fn connect(ws_url: &str) -> Result<Self, PresenceError> {
        let (ws, _) = tokio_tungstenite::connect_async(ws_url).await?;
        tracing::debug!(ws_url, "CDP page session connected");
        Ok(Self {
            ws,
            next_id: 1,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Sends one command and waits for the reply carrying its id.
    ///
    /// # Errors
    ///
    /// - [`PresenceError::Protocol`] when Chrome answers with an error object.
    /// - [`PresenceError::Timeout`] when no reply arrives in time.
    /// - [`PresenceError::SessionClosed`] when the socket closes first.
    pub async fn call(&mut self, method: &str, params: Value) -> Result<Value, PresenceError> {
        let id = self.next_id;
        self.next_id += 1;

        let payload = serde_json::to_string(&CdpRequest { id, method, params })?;
        tracing::trace!(%payload, "CDP send");
        self.ws.send(Message::Text(payload.into())).await?;

        tokio::time::timeout(self.call_timeout, self.await_reply(id))
            .await
            .map_err(|_| PresenceError::Timeout(format!("reply to {method}")))?
    }

    async fn await_reply(&mut self, id: u64) -> Result<Value, PresenceError> {
        while let Some(message) = self.ws.next().await {
            match message? {
                Message::Text(text) => {
                    let reply: CdpResponse = match serde_json::from_str(text.as_str()) {
                        Ok(reply) => reply,
                        Err(e) => {
                            tracing::warn!(error = %e, "ignoring unparseable CDP message");
                            continue;
                        }
                    };
                    if reply.id != Some(id) {
                        continue;
                    }
                    if let Some(error) = reply.error {
                        return Err(PresenceError::Protocol {
                            code: error.code,
                            message: error.message,
                        });
                    }
                    return Ok(reply.result.unwrap_or(Value::Null));
                }
                Message::Close(_) => return Err(PresenceError::SessionClosed),
                _ => {}
            }
        }
        Err(PresenceError::SessionClosed)
    }

    /// Starts navigation to `url`.
    ///
    /// Returns once Chrome has committed to the navigation, not when the page
    /// finishes rendering; callers wait separately.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Navigation`] when Chrome reports `errorText`.
    pub async fn navigate(&mut self, url: &str) -> Result<(), PresenceError> {
        let result = self.call("Page.navigate", json!({ "url": url })).await?;
        match result.get("errorText").and_then(Value::as_str) {
            Some(reason) if !reason.is_empty() => Err(PresenceError::Navigation {
                url: url.to_owned(),
                reason: reason.to_owned(),
            }),
            _ => Ok(()),
        }
    }

    /// Evaluates `expression` in the page and returns its JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::JavaScript`] when the expression throws.
    pub async fn evaluate(&mut self, expression: &str) -> Result<Value, PresenceError> {
        let result = self
            .call(
                "Runtime.evaluate",
                json!({ "expression": expression, "returnByValue": true }),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(PresenceError::JavaScript(text.to_owned()));
        }

        Ok(result
            .get("result")
            .and_then(|r| r.get("value"))
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// Sends a close frame. Errors are ignored; the peer may already be gone.
    pub async fn disconnect(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::debug!(error = %e, "CDP socket close failed");
        }
    }
}
