//! Multi-page text-search loop for `PlacesClient`.

use placescout_core::SearchQuery;

use crate::error::PlacesError;
use crate::types::PlaceResult;

use super::{PlacesClient, MAX_PAGES};

impl PlacesClient {
    /// Runs a text search and follows `next_page_token` until exhausted.
    ///
    /// Results are returned in page order. Every request carrying a token is
    /// preceded by the configured page-token delay; the first request is not.
    ///
    /// **All-or-nothing semantics**: a failure on any page discards the pages
    /// already fetched and returns the error.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::search_page`].
    /// Returns [`PlacesError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn search_all(&self, query: &SearchQuery) -> Result<Vec<PlaceResult>, PlacesError> {
        let text = query.text();
        let mut all_results: Vec<PlaceResult> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(PlacesError::PaginationLimit {
                    query: text,
                    max_pages: MAX_PAGES,
                });
            }

            if cursor.is_some() {
                tokio::time::sleep(self.page_token_delay).await;
            }

            let page = self.search_page(&text, cursor.as_deref()).await?;
            tracing::debug!(
                page = page_count,
                results = page.results.len(),
                has_next = page.next_page_token.is_some(),
                "fetched text-search page"
            );
            all_results.extend(page.results);

            cursor = page.next_page_token.filter(|t| !t.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(all_results)
    }
}
