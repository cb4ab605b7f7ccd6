//! Core data model: the enriched place row and the query that produces it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::QueryError;

/// Placeholder for any field the upstream API did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Phone value written over a number that WhatsApp reports as unregistered.
pub const NO_WHATSAPP: &str = "No WhatsApp";

/// Star rating of a place, as reported by the search API.
///
/// Serialized as a bare number, or as the `"N/A"` string when absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Score(f64),
    NotAvailable,
}

impl Rating {
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::NotAvailable, Self::Score)
    }

    #[must_use]
    pub fn score(self) -> Option<f64> {
        match self {
            Self::Score(v) => Some(v),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(v) => write!(f, "{v}"),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(v) => serializer.serialize_f64(*v),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Self::Score(v)),
            Raw::Text(text) if text == NOT_AVAILABLE => Ok(Self::NotAvailable),
            Raw::Text(text) => text.parse::<f64>().map(Self::Score).map_err(|_| {
                serde::de::Error::custom(format!("invalid rating \"{text}\""))
            }),
        }
    }
}

/// One row of the result table: a search hit merged with its detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    /// Copied from the query, not from the API.
    pub sector: String,
    pub rating: Rating,
    pub address: String,
    /// A phone number, [`NOT_AVAILABLE`], or [`NO_WHATSAPP`].
    pub phone: String,
    pub website: String,
}

impl PlaceRecord {
    /// Cell values in column order, as displayed and exported.
    #[must_use]
    pub fn display_cells(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.sector.clone(),
            self.rating.to_string(),
            self.address.clone(),
            self.phone.clone(),
            self.website.clone(),
        ]
    }

    #[must_use]
    pub fn has_phone(&self) -> bool {
        !self.phone.is_empty() && self.phone != NOT_AVAILABLE
    }
}

/// A user-entered (sector, city) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub sector: String,
    pub city: String,
}

impl SearchQuery {
    /// Builds a query from raw user input, trimming both parts.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when either part is blank.
    pub fn new(sector: &str, city: &str) -> Result<Self, QueryError> {
        let sector = sector.trim();
        let city = city.trim();
        if sector.is_empty() {
            return Err(QueryError::EmptySector);
        }
        if city.is_empty() {
            return Err(QueryError::EmptyCity);
        }
        Ok(Self {
            sector: sector.to_owned(),
            city: city.to_owned(),
        })
    }

    /// Free-text query sent to the text-search endpoint.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{} in {}", self.sector, self.city)
    }
}
