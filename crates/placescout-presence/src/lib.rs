//! WhatsApp presence verification for collected phone numbers.
//!
//! [`PresenceChecker`] drives one browser session through login and a
//! sequential per-number check. The browser is abstracted behind
//! [`BrowserLauncher`]/[`MessagingSession`]; [`ChromeLauncher`] is the real
//! implementation, speaking the Chrome DevTools Protocol over a WebSocket.

pub mod cdp;
pub mod checker;
pub mod chrome;
pub mod error;

pub use cdp::CdpPage;
pub use checker::{
    is_invalid_number_message, AuthGate, BrowserLauncher, MessagingSession, PresenceChecker,
    PresenceSettings, PresenceSummary, WHATSAPP_WEB_URL,
};
pub use chrome::{wait_for_page_target, ChromeLauncher, ChromeSession};
pub use error::PresenceError;
