use std::path::PathBuf;

/// The Places API rejects a `pagetoken` requested sooner than this after it
/// was issued.
pub const MIN_PAGE_TOKEN_DELAY_MS: u64 = 2_000;

/// Chrome session settings for the WhatsApp presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub chrome_path: String,
    pub debug_port: u16,
    pub profile_dir: PathBuf,
    pub headless: bool,
    pub login_settle_ms: u64,
    pub navigation_settle_ms: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub maps_api_key: String,
    pub rapidapi_key: String,
    pub rapidapi_host: String,
    pub log_level: String,
    pub language: String,
    pub request_timeout_secs: u64,
    pub page_token_delay_ms: u64,
    pub country_code: String,
    pub export_prefix: String,
    pub browser: BrowserConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("maps_api_key", &"[redacted]")
            .field("rapidapi_key", &"[redacted]")
            .field("rapidapi_host", &self.rapidapi_host)
            .field("log_level", &self.log_level)
            .field("language", &self.language)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("page_token_delay_ms", &self.page_token_delay_ms)
            .field("country_code", &self.country_code)
            .field("export_prefix", &self.export_prefix)
            .field("browser", &self.browser)
            .finish()
    }
}
