use std::path::PathBuf;

use crate::app_config::{AppConfig, BrowserConfig, MIN_PAGE_TOKEN_DELAY_MS};
use crate::phone::DEFAULT_COUNTRY_CODE;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let maps_api_key = require("GOOGLE_MAPS_API_KEY")?;
    let rapidapi_key = require("RAPIDAPI_KEY")?;
    let rapidapi_host = require("RAPIDAPI_HOST")?;

    let log_level = or_default("PLACESCOUT_LOG_LEVEL", "info");
    let language = or_default("PLACESCOUT_LANGUAGE", "tr");
    let request_timeout_secs = parse_u64("PLACESCOUT_REQUEST_TIMEOUT_SECS", "30")?;

    let page_token_delay_ms = parse_u64("PLACESCOUT_PAGE_TOKEN_DELAY_MS", "2000")?;
    if page_token_delay_ms < MIN_PAGE_TOKEN_DELAY_MS {
        return Err(invalid(
            "PLACESCOUT_PAGE_TOKEN_DELAY_MS",
            format!("must be at least {MIN_PAGE_TOKEN_DELAY_MS} ms, got {page_token_delay_ms}"),
        ));
    }

    let country_code = or_default("PLACESCOUT_COUNTRY_CODE", DEFAULT_COUNTRY_CODE);
    if country_code.is_empty() || !country_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "PLACESCOUT_COUNTRY_CODE",
            format!("expected digits only, got \"{country_code}\""),
        ));
    }

    let export_prefix = or_default("PLACESCOUT_EXPORT_PREFIX", "GoogleMaps_Veriler");

    let profile_dir = lookup("PLACESCOUT_CHROME_PROFILE_DIR").map_or_else(
        |_| std::env::temp_dir().join("placescout-chrome"),
        PathBuf::from,
    );

    let browser = BrowserConfig {
        chrome_path: or_default("PLACESCOUT_CHROME_PATH", "google-chrome"),
        debug_port: parse_u16("PLACESCOUT_CHROME_DEBUG_PORT", "9222")?,
        profile_dir,
        headless: parse_bool("PLACESCOUT_CHROME_HEADLESS", "false")?,
        login_settle_ms: parse_u64("PLACESCOUT_LOGIN_SETTLE_MS", "3000")?,
        navigation_settle_ms: parse_u64("PLACESCOUT_NAVIGATION_SETTLE_MS", "5000")?,
    };

    Ok(AppConfig {
        maps_api_key,
        rapidapi_key,
        rapidapi_host,
        log_level,
        language,
        request_timeout_secs,
        page_token_delay_ms,
        country_code,
        export_prefix,
        browser,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
