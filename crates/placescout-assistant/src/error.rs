use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat API returned status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("failed to parse chat API response: {source}")]
    Deserialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid chat API base URL {base_url}: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("a question is already being answered")]
    Busy,
}
