use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("browser debugging endpoint {endpoint} not ready after {waited_ms} ms")]
    BrowserNotReady { endpoint: String, waited_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("browser session closed")]
    SessionClosed,

    #[error("login confirmation was abandoned")]
    LoginAbandoned,
}

impl From<tokio_tungstenite::tungstenite::Error> for PresenceError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        PresenceError::WebSocket(e.to_string())
    }
}
