//! One-shot `search` command and the client builders shared with the shell.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;

use placescout_core::{AppConfig, PlaceRecord, ResultStore, SearchQuery};
use placescout_places::PlacesClient;
use placescout_presence::{ChromeLauncher, PresenceChecker, PresenceSettings, PresenceSummary};

use crate::gate::StdinGate;
use crate::table;

pub(crate) const NO_RESULTS: &str = "Sonuç bulunamadı.";

pub(crate) fn build_places_client(config: &AppConfig) -> anyhow::Result<PlacesClient> {
    let client = PlacesClient::new(
        &config.maps_api_key,
        &config.language,
        config.request_timeout_secs,
    )
    .context("failed to build Places client")?;
    Ok(client.with_page_token_delay(Duration::from_millis(config.page_token_delay_ms)))
}

pub(crate) fn build_presence_checker(config: &AppConfig) -> PresenceChecker<ChromeLauncher> {
    PresenceChecker::new(
        ChromeLauncher::from_config(&config.browser),
        PresenceSettings::from_config(&config.browser, &config.country_code),
    )
}

/// Explicit path, or a timestamped file in the working directory.
pub(crate) fn resolve_export_path(config: &AppConfig, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        PathBuf::from(placescout_export::default_filename_now(
            &config.export_prefix,
        ))
    })
}

pub(crate) fn export_records(records: &[PlaceRecord], path: &Path) -> anyhow::Result<()> {
    placescout_export::export(records, path)
        .with_context(|| format!("Excel dosyası oluşturulamadı: {}", path.display()))?;
    println!("Veriler başarıyla kaydedildi: {}", path.display());
    Ok(())
}

pub(crate) fn print_summary(summary: &PresenceSummary) {
    println!(
        "WhatsApp kontrolü tamamlandı: {} kayıtlı, {} WhatsApp yok, {} atlandı, {} hata",
        summary.checked, summary.missing, summary.skipped, summary.failed
    );
}

/// Search, optionally verify phones on WhatsApp, print, optionally export.
///
/// # Errors
///
/// Returns an error on an invalid query, a failed search, a failed presence
/// session, or a failed export.
pub(crate) async fn run_search(
    config: &AppConfig,
    sector: &str,
    city: &str,
    export: Option<Option<PathBuf>>,
    check_whatsapp: bool,
) -> anyhow::Result<()> {
    let query = SearchQuery::new(sector, city)?;
    let client = build_places_client(config)?;

    println!("Veriler çekiliyor, lütfen bekleyin...");
    let records = placescout_places::collect_places(&client, &query)
        .await
        .context("Veri çekerken bir hata oluştu")?;

    if records.is_empty() {
        println!("{NO_RESULTS}");
        return Ok(());
    }

    let mut store = ResultStore::new();
    store.replace(records);

    if check_whatsapp {
        let checker = build_presence_checker(config);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let snapshot = store.snapshot();
        let summary = checker
            .check_all(&snapshot, &mut StdinGate, &tx)
            .await
            .context("WhatsApp kontrolünde hata")?;
        drop(tx);
        while let Some(event) = rx.recv().await {
            store.apply(event)?;
        }
        print_summary(&summary);
    }

    table::print_records(store.records());

    if let Some(explicit) = export {
        let path = resolve_export_path(config, explicit);
        export_records(store.records(), &path)?;
    }

    Ok(())
}
