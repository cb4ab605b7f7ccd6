//! Search → enrich pipeline producing table rows.

use placescout_core::{PlaceRecord, Rating, SearchQuery, NOT_AVAILABLE};

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::types::{ContactDetails, PlaceResult};

/// Runs the full text search for `query`, then one detail lookup per hit,
/// returning merged rows in API order.
///
/// Detail lookups are sequential and never fail the batch. Hits without a
/// `place_id` skip the lookup and get `"N/A"` contact fields.
///
/// # Errors
///
/// Propagates any [`PlacesError`] from [`PlacesClient::search_all`]; no
/// partial result is returned.
pub async fn collect_places(
    client: &PlacesClient,
    query: &SearchQuery,
) -> Result<Vec<PlaceRecord>, PlacesError> {
    let results = client.search_all(query).await?;
    tracing::info!(
        sector = %query.sector,
        city = %query.city,
        hits = results.len(),
        "text search complete — enriching"
    );

    let mut records = Vec::with_capacity(results.len());
    for result in results {
        let contact = match result.place_id.as_deref() {
            Some(id) => client.fetch_details(id).await,
            None => ContactDetails::not_available(),
        };
        records.push(merge_place(result, &query.sector, contact));
    }

    Ok(records)
}

/// Merges a search hit with its contact details into a table row.
#[must_use]
pub fn merge_place(result: PlaceResult, sector: &str, contact: ContactDetails) -> PlaceRecord {
    PlaceRecord {
        name: result.name.unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        sector: sector.to_owned(),
        rating: Rating::from_option(result.rating),
        address: result
            .formatted_address
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        phone: contact.phone,
        website: contact.website,
    }
}
