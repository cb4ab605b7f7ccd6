//! Local Chrome process with remote debugging enabled.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::process::{Child, Command};

use placescout_core::BrowserConfig;

use crate::cdp::CdpPage;
use crate::checker::{BrowserLauncher, MessagingSession};
use crate::error::PresenceError;

/// How long to wait for the debugging endpoint after spawning Chrome.
const READY_TIMEOUT: Duration = Duration::from_secs(30);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);
const DISCOVERY_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Reads the text of WhatsApp's popup dialog, or `null` when absent.
const POPUP_TEXT_JS: &str = r#"(() => {
  const el = document.querySelector("div[data-testid='popup-text']");
  return el ? el.innerText : null;
})()"#;

/// Entry from the `/json/list` discovery endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetEntry {
    #[serde(rename = "type")]
    target_type: String,
    web_socket_debugger_url: Option<String>,
}

/// Spawns Chrome with a dedicated profile directory so a WhatsApp Web login
/// survives between runs.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    chrome_path: String,
    debug_port: u16,
    profile_dir: PathBuf,
    headless: bool,
}

impl ChromeLauncher {
    #[must_use]
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            debug_port: config.debug_port,
            profile_dir: config.profile_dir.clone(),
            headless: config.headless,
        }
    }

    fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.debug_port))
            .arg(format!("--user-data-dir={}", self.profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        if self.headless {
            cmd.arg("--headless=new");
        }
        cmd.arg("about:blank")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self) -> Result<ChromeSession, PresenceError> {
        std::fs::create_dir_all(&self.profile_dir).map_err(|e| {
            PresenceError::Launch(format!(
                "cannot create profile dir {}: {e}",
                self.profile_dir.display()
            ))
        })?;

        let client = discovery_client()?;
        let endpoint = self.endpoint();
        if endpoint_answers(&client, &endpoint).await {
            return Err(PresenceError::Launch(format!(
                "debugging port {} is already in use by another process",
                self.debug_port
            )));
        }

        // Dropping `child` on any early return kills the process.
        let mut child = self
            .command()
            .spawn()
            .map_err(|e| PresenceError::Launch(format!("{}: {e}", self.chrome_path)))?;
        tracing::debug!(
            chrome = %self.chrome_path,
            port = self.debug_port,
            headless = self.headless,
            "spawned chrome"
        );

        let ws_url = poll_page_target(&client, &endpoint, READY_TIMEOUT, || {
            ensure_running(&mut child)
        })
        .await?;
        let page = CdpPage::connect(&ws_url).await?;
        Ok(ChromeSession { child, page })
    }
}

/// Polls `{endpoint}/json/list` until a page target with a debugger URL
/// appears, returning that URL.
///
/// # Errors
///
/// Returns [`PresenceError::BrowserNotReady`] once `timeout` elapses.
pub async fn wait_for_page_target(
    endpoint: &str,
    timeout: Duration,
) -> Result<String, PresenceError> {
    poll_page_target(&discovery_client()?, endpoint, timeout, || Ok(())).await
}

fn discovery_client() -> Result<reqwest::Client, PresenceError> {
    Ok(reqwest::Client::builder()
        .timeout(DISCOVERY_REQUEST_TIMEOUT)
        .build()?)
}

/// True if anything answers HTTP on the endpoint, whatever the status.
async fn endpoint_answers(client: &reqwest::Client, endpoint: &str) -> bool {
    let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
    client.get(version_url).send().await.is_ok()
}

/// Fails once the spawned browser has exited.
fn ensure_running(child: &mut Child) -> Result<(), PresenceError> {
    match child.try_wait() {
        Ok(None) => Ok(()),
        Ok(Some(status)) => Err(PresenceError::Launch(format!(
            "chrome exited before its debugging endpoint came up ({status})"
        ))),
        Err(e) => Err(PresenceError::Launch(format!(
            "cannot query chrome process state: {e}"
        ))),
    }
}

/// Discovery loop shared by [`wait_for_page_target`] and the launcher.
///
/// `still_running` is checked before each poll and again before a found
/// target is returned.
async fn poll_page_target(
    client: &reqwest::Client,
    endpoint: &str,
    timeout: Duration,
    mut still_running: impl FnMut() -> Result<(), PresenceError>,
) -> Result<String, PresenceError> {
    let list_url = format!("{}/json/list", endpoint.trim_end_matches('/'));
    let started = Instant::now();

    loop {
        still_running()?;
        match fetch_targets(client, &list_url).await {
            Ok(targets) => {
                if let Some(url) = targets
                    .into_iter()
                    .filter(|t| t.target_type == "page")
                    .find_map(|t| t.web_socket_debugger_url)
                {
                    still_running()?;
                    return Ok(url);
                }
            }
            Err(e) => tracing::trace!(error = %e, "debugging endpoint not up yet"),
        }

        if started.elapsed() >= timeout {
            return Err(PresenceError::BrowserNotReady {
                endpoint: endpoint.to_owned(),
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
}

async fn fetch_targets(
    client: &reqwest::Client,
    list_url: &str,
) -> Result<Vec<TargetEntry>, reqwest::Error> {
    client
        .get(list_url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<TargetEntry>>()
        .await
}

/// A running Chrome process plus the CDP session on its first tab.
pub struct ChromeSession {
    child: Child,
    page: CdpPage,
}

#[async_trait]
impl MessagingSession for ChromeSession {
    async fn open(&mut self, url: &str) -> Result<(), PresenceError> {
        self.page.navigate(url).await
    }

    async fn popup_text(&mut self) -> Result<Option<String>, PresenceError> {
        let value = self.page.evaluate(POPUP_TEXT_JS).await?;
        Ok(match value {
            Value::String(text) => Some(text),
            _ => None,
        })
    }

    async fn close(&mut self) {
        // Ask politely first so Chrome flushes the profile, then make sure.
        let graceful = tokio::time::timeout(
            CLOSE_TIMEOUT,
            self.page.call("Browser.close", json!({})),
        )
        .await;
        if !matches!(graceful, Ok(Ok(_))) {
            tracing::debug!("Browser.close did not complete — killing chrome");
        }
        self.page.disconnect().await;

        match tokio::time::timeout(CLOSE_TIMEOUT, self.child.wait()).await {
            Ok(Ok(status)) => tracing::debug!(%status, "chrome exited"),
            _ => {
                if let Err(e) = self.child.kill().await {
                    tracing::warn!(error = %e, "failed to kill chrome");
                }
            }
        }
    }
}
