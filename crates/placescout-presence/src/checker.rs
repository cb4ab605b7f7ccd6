//! Session state machine for the WhatsApp presence check.
//!
//! 1. **Init**: launch the browser, open WhatsApp Web, wait for the operator
//!    to confirm login, then settle.
//! 2. **Per record**: navigate to the number's deep link, settle, read the
//!    DOM for the invalid-number popup.
//! 3. **Teardown**: close the browser on every path after a successful launch.
//!
//! Only a launch or init failure aborts the run. A failed number check is
//! logged and the record left untouched.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use placescout_core::{normalize_phone, BrowserConfig, PlaceRecord, StoreEvent, NO_WHATSAPP};

use crate::error::PresenceError;

pub const WHATSAPP_WEB_URL: &str = "https://web.whatsapp.com";

/// Lower-cased fragment of WhatsApp's invalid-number popup text.
const INVALID_NUMBER_FRAGMENT: &str = "phone number shared via url is invalid";

/// A live browser page that can be pointed at WhatsApp Web.
#[async_trait]
pub trait MessagingSession: Send {
    /// Navigates the page to `url`.
    async fn open(&mut self, url: &str) -> Result<(), PresenceError>;

    /// Text of the popup element if one is on the page, `None` otherwise.
    async fn popup_text(&mut self) -> Result<Option<String>, PresenceError>;

    /// Releases the browser. Called exactly once per launched session.
    async fn close(&mut self);
}

/// Acquires a fresh [`MessagingSession`].
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Session: MessagingSession;

    async fn launch(&self) -> Result<Self::Session, PresenceError>;
}

/// Blocks until the operator confirms WhatsApp Web is logged in.
#[async_trait]
pub trait AuthGate: Send {
    async fn wait_for_login(&mut self) -> Result<(), PresenceError>;
}

/// Counts for one completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PresenceSummary {
    /// Numbers checked and presumed registered.
    pub checked: usize,
    /// Numbers checked and reported invalid; their phone is now "No WhatsApp".
    pub missing: usize,
    /// Rows with no usable number.
    pub skipped: usize,
    /// Checks that errored; phone left unchanged.
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct PresenceSettings {
    pub web_url: String,
    pub country_code: String,
    pub login_settle: Duration,
    pub navigation_settle: Duration,
}

impl PresenceSettings {
    #[must_use]
    pub fn from_config(browser: &BrowserConfig, country_code: &str) -> Self {
        Self {
            web_url: WHATSAPP_WEB_URL.to_owned(),
            country_code: country_code.to_owned(),
            login_settle: Duration::from_millis(browser.login_settle_ms),
            navigation_settle: Duration::from_millis(browser.navigation_settle_ms),
        }
    }

    fn deep_link(&self, digits: &str) -> String {
        format!("{}/send?phone={digits}", self.web_url.trim_end_matches('/'))
    }
}

/// True when `text` is WhatsApp's "phone number shared via url is invalid"
/// message, in any casing.
#[must_use]
pub fn is_invalid_number_message(text: &str) -> bool {
    text.to_lowercase().contains(INVALID_NUMBER_FRAGMENT)
}

pub struct PresenceChecker<L> {
    launcher: L,
    settings: PresenceSettings,
}

impl<L: BrowserLauncher> PresenceChecker<L> {
    #[must_use]
    pub fn new(launcher: L, settings: PresenceSettings) -> Self {
        Self { launcher, settings }
    }

    /// Checks every row of `records` in order, sending a
    /// [`StoreEvent::PhoneUpdated`] for each number WhatsApp rejects.
    ///
    /// Indices in the emitted events refer to positions in `records`.
    ///
    /// # Errors
    ///
    /// Returns the launch error, or the first error from opening WhatsApp Web
    /// or the login gate. Updates already sent stay sent; the browser is
    /// closed before returning.
    pub async fn check_all<G: AuthGate>(
        &self,
        records: &[PlaceRecord],
        gate: &mut G,
        updates: &mpsc::UnboundedSender<StoreEvent>,
    ) -> Result<PresenceSummary, PresenceError> {
        let mut session = self.launcher.launch().await?;
        tracing::info!(rows = records.len(), "browser launched for presence check");

        let outcome = self.drive(&mut session, records, gate, updates).await;
        session.close().await;

        match &outcome {
            Ok(summary) => tracing::info!(?summary, "presence check finished"),
            Err(e) => tracing::error!(error = %e, "presence check aborted"),
        }
        outcome
    }

    async fn drive<G: AuthGate>(
        &self,
        session: &mut L::Session,
        records: &[PlaceRecord],
        gate: &mut G,
        updates: &mpsc::UnboundedSender<StoreEvent>,
    ) -> Result<PresenceSummary, PresenceError> {
        session.open(&self.settings.web_url).await?;
        gate.wait_for_login().await?;
        tokio::time::sleep(self.settings.login_settle).await;

        let mut summary = PresenceSummary::default();

        for (index, record) in records.iter().enumerate() {
            let digits = if record.has_phone() {
                normalize_phone(&record.phone, &self.settings.country_code)
            } else {
                None
            };
            let Some(digits) = digits else {
                summary.skipped += 1;
                continue;
            };

            match self.check_number(session, &digits).await {
                Ok(true) => summary.checked += 1,
                Ok(false) => {
                    summary.missing += 1;
                    tracing::debug!(index, %digits, "number not on WhatsApp");
                    let event = StoreEvent::PhoneUpdated {
                        index,
                        phone: NO_WHATSAPP.to_owned(),
                    };
                    if updates.send(event).is_err() {
                        tracing::warn!(index, "result table gone — verdict dropped");
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(index, %digits, error = %e, "number check failed — skipping");
                }
            }
        }

        Ok(summary)
    }

    /// `Ok(true)` unless the invalid-number popup is showing.
    async fn check_number(&self, session: &mut L::Session, digits: &str) -> Result<bool, PresenceError> {
        session.open(&self.settings.deep_link(digits)).await?;
        tokio::time::sleep(self.settings.navigation_settle).await;
        let popup = session.popup_text().await?;
        Ok(!popup.is_some_and(|text| is_invalid_number_message(&text)))
    }
}
