pub mod client;
pub mod error;
pub mod pipeline;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use pipeline::{collect_places, merge_place};
pub use types::{ContactDetails, PlaceResult, TextSearchResponse};
