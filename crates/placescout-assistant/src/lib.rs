//! Free-text assistant backed by a hosted chat-completion endpoint.
//!
//! [`ChatClient`] performs the single HTTP exchange; [`ChatPanel`] owns the
//! input buffer, the transcript and the one-request-at-a-time guard.

pub mod client;
pub mod error;
pub mod panel;

pub use client::{ChatClient, NO_RESULT_FALLBACK};
pub use error::AssistantError;
pub use panel::{ChatPanel, Exchange, PendingAsk, Transcript};
