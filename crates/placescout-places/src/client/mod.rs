//! HTTP client for the Google Places web service.

mod details;
mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use placescout_core::MIN_PAGE_TOKEN_DELAY_MS;

use crate::error::PlacesError;
use crate::types::{TextSearchResponse, SUCCESS_STATUSES};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const TEXT_SEARCH_PATH: &str = "maps/api/place/textsearch/json";
const DETAILS_PATH: &str = "maps/api/place/details/json";
const DETAILS_FIELDS: &str = "formatted_phone_number,website";

/// Maximum number of pages to follow before returning an error.
/// The API stops at three pages; this only trips on a cycling token.
pub(super) const MAX_PAGES: usize = 10;

/// Client for the text-search and place-details endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    language: String,
    base_url: Url,
    /// Sleep before every request that carries a `pagetoken`.
    page_token_delay: Duration,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, language: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, language, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        language: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("placescout/0.1 (lead-collection)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            language: language.to_owned(),
            base_url,
            page_token_delay: Duration::from_millis(MIN_PAGE_TOKEN_DELAY_MS),
        })
    }

    /// Overrides the pause taken before each paginated request.
    #[must_use]
    pub fn with_page_token_delay(mut self, delay: Duration) -> Self {
        self.page_token_delay = delay;
        self
    }

    /// Fetches one page of text-search results.
    ///
    /// Does not sleep; callers following a `next_page_token` must wait first.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::UnexpectedStatus`] on a non-2xx response.
    /// - [`PlacesError::Deserialize`] if the body is not the expected JSON.
    /// - [`PlacesError::Api`] if the envelope `status` is not `OK`/`ZERO_RESULTS`.
    pub async fn search_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<TextSearchResponse, PlacesError> {
        let mut params = vec![("query", query), ("language", self.language.as_str())];
        if let Some(token) = page_token {
            params.push(("pagetoken", token));
        }
        let url = self.build_url(TEXT_SEARCH_PATH, &params);
        let page: TextSearchResponse = self.request_json(url, "textsearch").await?;
        check_api_status(page.status.as_deref(), page.error_message.as_deref())?;
        Ok(page)
    }

    /// Builds an endpoint URL with `key` plus `extra` as percent-encoded
    /// query parameters.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{path}", self.base_url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET, asserts a 2xx status, and parses the body as `T`.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &'static str,
    ) -> Result<T, PlacesError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: format!("{endpoint} response"),
            source: e,
        })
    }
}

/// Maps a non-success envelope `status` to [`PlacesError::Api`].
///
/// A missing `status` is treated as success.
fn check_api_status(status: Option<&str>, message: Option<&str>) -> Result<(), PlacesError> {
    match status {
        None => Ok(()),
        Some(s) if SUCCESS_STATUSES.contains(&s) => Ok(()),
        Some(s) => Err(PlacesError::Api {
            status: s.to_owned(),
            message: message.unwrap_or("no error_message in response").to_owned(),
        }),
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
