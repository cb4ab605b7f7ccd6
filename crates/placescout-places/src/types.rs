//! Response types for the Places text-search and place-details endpoints.
//!
//! Only the fields the result table needs are modelled; everything else in
//! the payload (geometry, photos, opening hours) is ignored by serde.
//!
//! Every field is optional. Text-search hits routinely omit `rating` for
//! places with no reviews, and `status` is absent from some error bodies.

use serde::Deserialize;

use placescout_core::NOT_AVAILABLE;

/// `status` values that mean the request itself succeeded.
pub(crate) const SUCCESS_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

/// One page from `GET /maps/api/place/textsearch/json`.
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceResult>,

    /// Cursor for the next page; absent on the last one.
    pub next_page_token: Option<String>,

    pub status: Option<String>,

    pub error_message: Option<String>,
}

/// A single text-search hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaceResult {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub place_id: Option<String>,
}

/// Envelope from `GET /maps/api/place/details/json`.
#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    pub result: Option<DetailsResult>,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DetailsResult {
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
}

/// Contact fields merged into a [`placescout_core::PlaceRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub phone: String,
    pub website: String,
}

impl ContactDetails {
    #[must_use]
    pub fn not_available() -> Self {
        Self {
            phone: NOT_AVAILABLE.to_owned(),
            website: NOT_AVAILABLE.to_owned(),
        }
    }
}

impl From<DetailsResult> for ContactDetails {
    fn from(result: DetailsResult) -> Self {
        Self {
            phone: result
                .formatted_phone_number
                .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
            website: result.website.unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        }
    }
}
