//! Operator confirmation that WhatsApp Web is logged in.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use placescout_presence::{AuthGate, PresenceError};

use crate::shell::AppEvent;

pub(crate) const LOGIN_PROMPT: &str = "Lütfen WhatsApp Web'de QR kodunu taratın.\n\
     Tarama işlemi tamamlandıktan sonra Enter'a basın.";

/// Waits for Enter on stdin. Used by one-shot commands that own the terminal.
pub(crate) struct StdinGate;

#[async_trait]
impl AuthGate for StdinGate {
    async fn wait_for_login(&mut self) -> Result<(), PresenceError> {
        println!("{LOGIN_PROMPT}");
        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(0) => Err(PresenceError::LoginAbandoned),
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed while waiting for login");
                Err(PresenceError::LoginAbandoned)
            }
        }
    }
}

/// Asks the shell loop, which owns stdin, to collect the acknowledgement.
pub(crate) struct ShellGate {
    events: mpsc::UnboundedSender<AppEvent>,
}

impl ShellGate {
    pub(crate) fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl AuthGate for ShellGate {
    async fn wait_for_login(&mut self) -> Result<(), PresenceError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.events
            .send(AppEvent::LoginPrompt(ack_tx))
            .map_err(|_| PresenceError::LoginAbandoned)?;
        ack_rx.await.map_err(|_| PresenceError::LoginAbandoned)
    }
}
