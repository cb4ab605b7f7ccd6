//! `ask` and `chat` commands.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use placescout_assistant::{AssistantError, ChatClient, ChatPanel};
use placescout_core::AppConfig;

pub(crate) const EMPTY_PROMPT: &str = "Lütfen bir soru giriniz.";

pub(crate) fn build_chat_panel(config: &AppConfig) -> anyhow::Result<ChatPanel> {
    let client = ChatClient::new(
        &config.rapidapi_key,
        &config.rapidapi_host,
        config.request_timeout_secs,
    )
    .context("failed to build chat client")?;
    Ok(ChatPanel::new(client))
}

/// # Errors
///
/// Returns an error for a blank prompt or a failed request.
pub(crate) async fn run_ask(config: &AppConfig, prompt: &str) -> anyhow::Result<()> {
    let mut panel = build_chat_panel(config)?;
    panel.set_input(prompt);
    match panel.submit().await {
        Ok(exchange) => {
            println!("{}", exchange.answer);
            Ok(())
        }
        Err(AssistantError::EmptyPrompt) => anyhow::bail!(EMPTY_PROMPT),
        Err(e) => Err(e).context("AI cevabı alınırken bir hata oluştu"),
    }
}

/// Reads questions line by line until `quit`, `exit` or end of input.
/// Failed requests are reported and the session continues.
///
/// # Errors
///
/// Returns an error if the client cannot be built or stdin fails.
pub(crate) async fn run_chat(config: &AppConfig) -> anyhow::Result<()> {
    let mut panel = build_chat_panel(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Sorunuzu yazın (çıkmak için 'quit').");
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if matches!(trimmed, "quit" | "exit") {
            break;
        }
        panel.set_input(trimmed);
        match panel.submit().await {
            Ok(exchange) => print!("{exchange}"),
            Err(AssistantError::EmptyPrompt) => println!("{EMPTY_PROMPT}"),
            Err(e) => eprintln!("error: AI cevabı alınırken bir hata oluştu: {e}"),
        }
    }

    tracing::debug!(exchanges = panel.transcript().len(), "chat session ended");
    Ok(())
}
