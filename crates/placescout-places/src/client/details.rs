//! Place-details lookup for `PlacesClient`.

use crate::error::PlacesError;
use crate::types::{ContactDetails, DetailsResponse};

use super::{check_api_status, PlacesClient, DETAILS_FIELDS, DETAILS_PATH};

impl PlacesClient {
    /// Fetches phone and website for `place_id`.
    ///
    /// Never fails: any transport, status, or parse error degrades both
    /// fields to `"N/A"`, and a missing field degrades only itself.
    pub async fn fetch_details(&self, place_id: &str) -> ContactDetails {
        match self.try_fetch_details(place_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    place_id,
                    error = %e,
                    "place details lookup failed — using N/A"
                );
                ContactDetails::not_available()
            }
        }
    }

    async fn try_fetch_details(&self, place_id: &str) -> Result<ContactDetails, PlacesError> {
        let url = self.build_url(
            DETAILS_PATH,
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        );
        let envelope: DetailsResponse = self.request_json(url, "details").await?;
        check_api_status(
            envelope.status.as_deref(),
            envelope.error_message.as_deref(),
        )?;
        Ok(envelope.result.unwrap_or_default().into())
    }
}
