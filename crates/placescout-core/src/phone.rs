//! Phone number normalisation for WhatsApp deep links.

use crate::record::NOT_AVAILABLE;

pub const DEFAULT_COUNTRY_CODE: &str = "90";

const CHAT_LINK_BASE: &str = "https://api.whatsapp.com/send";

/// Strips every non-digit and prefixes `country_code` unless the digits
/// already start with it.
///
/// Returns `None` for the `"N/A"` placeholder and for input containing no
/// digits at all (which also covers the `"No WhatsApp"` sentinel).
///
/// Normalising an already-normalised number returns it unchanged.
#[must_use]
pub fn normalize_phone(raw: &str, country_code: &str) -> Option<String> {
    if raw == NOT_AVAILABLE {
        return None;
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with(country_code) {
        Some(digits)
    } else {
        Some(format!("{country_code}{digits}"))
    }
}

/// Click-to-chat link for starting a conversation with `raw`.
#[must_use]
pub fn whatsapp_chat_link(raw: &str, country_code: &str) -> Option<String> {
    normalize_phone(raw, country_code).map(|digits| format!("{CHAT_LINK_BASE}?phone={digits}"))
}
