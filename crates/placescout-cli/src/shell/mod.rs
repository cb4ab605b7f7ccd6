//! Interactive shell.
//!
//! The loop task is the only owner of the [`ResultStore`]. Searches, presence
//! checks and assistant questions run on spawned tasks and report back as
//! [`AppEvent`]s; phone verdicts arrive as [`StoreEvent`]s on a separate
//! channel that is drained first so a check's updates land before its
//! completion message. Each operation has a busy flag that rejects a second
//! start while the first is running.

mod command;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use placescout_assistant::{AssistantError, ChatPanel, Exchange};
use placescout_core::{AppConfig, PlaceRecord, ResultStore, SearchQuery, StoreEvent};
use placescout_places::{PlacesClient, PlacesError};
use placescout_presence::{ChromeLauncher, PresenceChecker, PresenceError, PresenceSummary};

use crate::assistant::{build_chat_panel, EMPTY_PROMPT};
use crate::gate::{ShellGate, LOGIN_PROMPT};
use crate::search::{
    build_places_client, build_presence_checker, export_records, print_summary,
    resolve_export_path, NO_RESULTS,
};
use crate::table;

use command::{parse_command, ShellCommand, HELP};

/// Messages delivered to the shell loop.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Input(String),
    InputClosed,
    SearchFinished {
        query: SearchQuery,
        result: Result<Vec<PlaceRecord>, PlacesError>,
    },
    CheckFinished(Result<PresenceSummary, PresenceError>),
    /// The presence task is waiting for the operator to press Enter.
    LoginPrompt(oneshot::Sender<()>),
    AskFinished(Result<Exchange, AssistantError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct App {
    config: AppConfig,
    store: ResultStore,
    places: Arc<PlacesClient>,
    checker: Arc<PresenceChecker<ChromeLauncher>>,
    chat: ChatPanel,
    events: mpsc::UnboundedSender<AppEvent>,
    store_updates: mpsc::UnboundedSender<StoreEvent>,
    searching: bool,
    checking: bool,
    pending_login: Option<oneshot::Sender<()>>,
}

impl App {
    fn new(
        config: AppConfig,
        events: mpsc::UnboundedSender<AppEvent>,
        store_updates: mpsc::UnboundedSender<StoreEvent>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            places: Arc::new(build_places_client(&config)?),
            checker: Arc::new(build_presence_checker(&config)),
            chat: build_chat_panel(&config)?,
            config,
            store: ResultStore::new(),
            events,
            store_updates,
            searching: false,
            checking: false,
            pending_login: None,
        })
    }

    fn handle_event(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Input(line) => {
                if let Some(ack) = self.pending_login.take() {
                    // Any line, usually empty, confirms the login.
                    if ack.send(()).is_err() {
                        tracing::debug!("presence task gone before login was confirmed");
                    }
                    println!("Giriş onaylandı, numaralar kontrol ediliyor...");
                    return Flow::Continue;
                }
                match parse_command(&line) {
                    Ok(command) => return self.handle_command(command),
                    Err(message) => println!("{message}"),
                }
            }
            AppEvent::InputClosed => return Flow::Quit,
            AppEvent::SearchFinished { query, result } => self.finish_search(&query, result),
            AppEvent::CheckFinished(result) => {
                self.checking = false;
                self.pending_login = None;
                match result {
                    Ok(summary) => print_summary(&summary),
                    Err(e) => eprintln!("error: WhatsApp kontrolünde hata: {e}"),
                }
            }
            AppEvent::LoginPrompt(ack) => {
                self.pending_login = Some(ack);
                println!("{LOGIN_PROMPT}");
            }
            AppEvent::AskFinished(result) => match self.chat.finish(result) {
                Ok(exchange) => print!("{exchange}"),
                Err(e) => eprintln!("error: AI cevabı alınırken bir hata oluştu: {e}"),
            },
        }
        Flow::Continue
    }

    fn apply_update(&mut self, update: StoreEvent) {
        if let Err(e) = self.store.apply(update) {
            tracing::warn!(error = %e, "dropping stale table update");
        }
    }

    fn handle_command(&mut self, command: ShellCommand) -> Flow {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Search { sector, city } => self.start_search(&sector, &city),
            ShellCommand::Show => table::print_records(self.store.records()),
            ShellCommand::Export { path } => self.export(path),
            ShellCommand::Check => self.start_check(),
            ShellCommand::Ask { prompt } => self.start_ask(&prompt),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn start_search(&mut self, sector: &str, city: &str) {
        if self.searching {
            println!("Arama zaten sürüyor.");
            return;
        }
        if self.checking {
            println!("WhatsApp kontrolü bitene kadar yeni arama yapılamaz.");
            return;
        }
        let Ok(query) = SearchQuery::new(sector, city) else {
            println!("Lütfen sektör ve şehir giriniz.");
            return;
        };

        self.searching = true;
        println!("Veriler çekiliyor, lütfen bekleyin...");
        let places = Arc::clone(&self.places);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = placescout_places::collect_places(&places, &query).await;
            if events
                .send(AppEvent::SearchFinished { query, result })
                .is_err()
            {
                tracing::debug!("shell closed before search finished");
            }
        });
    }

    /// Replaces the table only on a non-empty success.
    fn finish_search(
        &mut self,
        query: &SearchQuery,
        result: Result<Vec<PlaceRecord>, PlacesError>,
    ) {
        self.searching = false;
        match result {
            Ok(records) if records.is_empty() => println!("{NO_RESULTS}"),
            Ok(records) => {
                tracing::info!(
                    sector = %query.sector,
                    city = %query.city,
                    rows = records.len(),
                    "result table replaced"
                );
                self.store.replace(records);
                table::print_records(self.store.records());
            }
            Err(e) => eprintln!("error: Veri çekerken bir hata oluştu: {e}"),
        }
    }

    fn export(&self, path: Option<PathBuf>) {
        let path = resolve_export_path(&self.config, path);
        if let Err(e) = export_records(self.store.records(), &path) {
            eprintln!("error: {e:#}");
        }
    }

    fn start_check(&mut self) {
        if self.checking {
            println!("WhatsApp kontrolü zaten sürüyor.");
            return;
        }
        if self.searching {
            println!("Arama bitene kadar WhatsApp kontrolü başlatılamaz.");
            return;
        }
        if self.store.is_empty() {
            println!("Tabloda kontrol edilecek kayıt yok.");
            return;
        }

        self.checking = true;
        let records = self.store.snapshot();
        let checker = Arc::clone(&self.checker);
        let events = self.events.clone();
        let updates = self.store_updates.clone();
        tokio::spawn(async move {
            let mut gate = ShellGate::new(events.clone());
            let result = checker.check_all(&records, &mut gate, &updates).await;
            if events.send(AppEvent::CheckFinished(result)).is_err() {
                tracing::debug!("shell closed before presence check finished");
            }
        });
    }

    fn start_ask(&mut self, prompt: &str) {
        self.chat.set_input(prompt);
        let pending = match self.chat.begin() {
            Ok(pending) => pending,
            Err(AssistantError::EmptyPrompt) => {
                println!("{EMPTY_PROMPT}");
                return;
            }
            Err(AssistantError::Busy) => {
                println!("Asistan önceki soruyu cevaplıyor.");
                return;
            }
            Err(e) => {
                eprintln!("error: {e}");
                return;
            }
        };

        let events = self.events.clone();
        tokio::spawn(async move {
            let result = pending.run().await;
            if events.send(AppEvent::AskFinished(result)).is_err() {
                tracing::debug!("shell closed before answer arrived");
            }
        });
    }
}

fn spawn_stdin_reader(events: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if events.send(AppEvent::Input(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    let _ = events.send(AppEvent::InputClosed);
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    let _ = events.send(AppEvent::InputClosed);
                    break;
                }
            }
        }
    });
}

/// Runs the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if a client cannot be built.
pub(crate) async fn run_shell(config: AppConfig) -> anyhow::Result<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (store_tx, mut store_rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, events_tx.clone(), store_tx)?;

    spawn_stdin_reader(events_tx);
    println!("{HELP}");

    loop {
        tokio::select! {
            biased;
            Some(update) = store_rx.recv() => app.apply_update(update),
            Some(event) = events_rx.recv() => {
                if app.handle_event(event) == Flow::Quit {
                    break;
                }
            }
            else => break,
        }
    }

    tracing::debug!(rows = app.store.len(), "shell exiting");
    Ok(())
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
