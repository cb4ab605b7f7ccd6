pub mod app_config;
pub mod config;
pub mod phone;
pub mod record;
pub mod store;

use thiserror::Error;

pub use app_config::{AppConfig, BrowserConfig, MIN_PAGE_TOKEN_DELAY_MS};
pub use config::{load_app_config, load_app_config_from_env};
pub use phone::{normalize_phone, whatsapp_chat_link, DEFAULT_COUNTRY_CODE};
pub use record::{PlaceRecord, Rating, SearchQuery, NOT_AVAILABLE, NO_WHATSAPP};
pub use store::{ResultStore, StoreError, StoreEvent};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("sector must not be empty")]
    EmptySector,

    #[error("city must not be empty")]
    EmptyCity,
}
