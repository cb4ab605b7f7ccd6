//! RapidAPI-hosted chat-completion client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::AssistantError;

const ENDPOINT_PATH: &str = "gpt4";

/// Answer shown when the response body has no `result` field.
pub const NO_RESULT_FALLBACK: &str = "Cevap alınamadı (no 'result' key).";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 1],
    web_access: bool,
}

/// One-shot question/answer client. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    host: String,
    endpoint: Url,
}

impl ChatClient {
    /// Creates a client for `https://{host}/gpt4`.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`AssistantError::InvalidBaseUrl`] if `host` is not a valid
    /// host name.
    pub fn new(api_key: &str, host: &str, timeout_secs: u64) -> Result<Self, AssistantError> {
        Self::with_base_url(api_key, host, timeout_secs, &format!("https://{host}"))
    }

    /// Creates a client that posts to `{base_url}/gpt4` while still sending
    /// `host` in the `x-rapidapi-host` header.
    ///
    /// # Errors
    ///
    /// Same as [`ChatClient::new`].
    pub fn with_base_url(
        api_key: &str,
        host: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(ENDPOINT_PATH))
            .map_err(|e| AssistantError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            host: host.to_owned(),
            endpoint,
        })
    }

    /// Sends `prompt` as a single user message and returns the answer text.
    ///
    /// A body without `result` yields [`NO_RESULT_FALLBACK`]; a non-string
    /// `result` is returned as its JSON rendering.
    ///
    /// # Errors
    ///
    /// - [`AssistantError::Http`] on network failure or timeout.
    /// - [`AssistantError::UnexpectedStatus`] on a non-2xx response.
    /// - [`AssistantError::Deserialize`] if the body is not JSON.
    pub async fn ask(&self, prompt: &str) -> Result<String, AssistantError> {
        let request = ChatRequest {
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            web_access: false,
        };

        tracing::debug!(chars = prompt.chars().count(), "sending chat prompt");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|source| AssistantError::Deserialize { source })?;
        Ok(answer_from(&value))
    }
}

fn answer_from(body: &Value) -> String {
    match body.get("result") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => {
            tracing::warn!("chat response has no result field");
            NO_RESULT_FALLBACK.to_owned()
        }
    }
}
