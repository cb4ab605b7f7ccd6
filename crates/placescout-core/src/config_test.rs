use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_MAPS_API_KEY", "maps-key");
    m.insert("RAPIDAPI_KEY", "rapid-key");
    m.insert("RAPIDAPI_HOST", "chatgpt-42.p.rapidapi.com");
    m
}

#[test]
fn build_app_config_fails_without_maps_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_MAPS_API_KEY"),
        "expected MissingEnvVar(GOOGLE_MAPS_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_rapidapi_host() {
    let mut map = full_env();
    map.remove("RAPIDAPI_HOST");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "RAPIDAPI_HOST"),
        "expected MissingEnvVar(RAPIDAPI_HOST), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_secret_as_missing() {
    let mut map = full_env();
    map.insert("RAPIDAPI_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "RAPIDAPI_KEY"),
        "expected MissingEnvVar(RAPIDAPI_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.maps_api_key, "maps-key");
    assert_eq!(cfg.rapidapi_key, "rapid-key");
    assert_eq!(cfg.rapidapi_host, "chatgpt-42.p.rapidapi.com");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.language, "tr");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.page_token_delay_ms, 2_000);
    assert_eq!(cfg.country_code, "90");
    assert_eq!(cfg.export_prefix, "GoogleMaps_Veriler");
    assert_eq!(cfg.browser.chrome_path, "google-chrome");
    assert_eq!(cfg.browser.debug_port, 9222);
    assert!(!cfg.browser.headless);
    assert_eq!(cfg.browser.login_settle_ms, 3_000);
    assert_eq!(cfg.browser.navigation_settle_ms, 5_000);
    assert!(cfg.browser.profile_dir.ends_with("placescout-chrome"));
}

#[test]
fn page_token_delay_override() {
    let mut map = full_env();
    map.insert("PLACESCOUT_PAGE_TOKEN_DELAY_MS", "2500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_token_delay_ms, 2_500);
}

#[test]
fn page_token_delay_below_minimum_is_rejected() {
    let mut map = full_env();
    map.insert("PLACESCOUT_PAGE_TOKEN_DELAY_MS", "500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACESCOUT_PAGE_TOKEN_DELAY_MS"),
        "expected InvalidEnvVar(PLACESCOUT_PAGE_TOKEN_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("PLACESCOUT_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACESCOUT_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PLACESCOUT_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn country_code_must_be_digits() {
    let mut map = full_env();
    map.insert("PLACESCOUT_COUNTRY_CODE", "+90");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACESCOUT_COUNTRY_CODE"),
        "expected InvalidEnvVar(PLACESCOUT_COUNTRY_CODE), got: {result:?}"
    );
}

#[test]
fn browser_overrides() {
    let mut map = full_env();
    map.insert("PLACESCOUT_CHROME_PATH", "/usr/bin/chromium");
    map.insert("PLACESCOUT_CHROME_DEBUG_PORT", "9333");
    map.insert("PLACESCOUT_CHROME_PROFILE_DIR", "/var/tmp/wa-profile");
    map.insert("PLACESCOUT_CHROME_HEADLESS", "true");
    map.insert("PLACESCOUT_NAVIGATION_SETTLE_MS", "8000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.browser.chrome_path, "/usr/bin/chromium");
    assert_eq!(cfg.browser.debug_port, 9333);
    assert_eq!(
        cfg.browser.profile_dir,
        std::path::PathBuf::from("/var/tmp/wa-profile")
    );
    assert!(cfg.browser.headless);
    assert_eq!(cfg.browser.navigation_settle_ms, 8_000);
}

#[test]
fn headless_rejects_garbage() {
    let mut map = full_env();
    map.insert("PLACESCOUT_CHROME_HEADLESS", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACESCOUT_CHROME_HEADLESS"),
        "expected InvalidEnvVar(PLACESCOUT_CHROME_HEADLESS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("maps-key"));
    assert!(!rendered.contains("rapid-key"));
    assert!(rendered.contains("[redacted]"));
}
