//! CLI commands writing documents to disk

use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

use f1_data_scraper::cli::{Cli, CliError};
use f1_data_scraper::output::{json_stats, save_json, JsonWriteOptions};
use f1_data_scraper::scraper::ScrapeOptions;
use f1_data_scraper::GrandPrixDocument;

use crate::support::scripted::{miami_weekend, scraper_over, Reply};

fn cli_for(temp_dir: &TempDir, args: &[&str]) -> Cli {
    let mut argv = vec!["f1-data-scraper", "--output-dir", temp_dir.path().to_str().unwrap()];
    argv.extend_from_slice(args);
    Cli::parse_from(argv)
}

#[tokio::test(start_paused = true)]
async fn test_latest_command_writes_named_document() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let cli = cli_for(&temp_dir, &["latest", "--sessions", "Race"]);

    let path = cli.execute_with(&scraper).await.unwrap();

    assert_eq!(path, temp_dir.path().join("2025_miami-grand-prix.json"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\n  \"meeting\""));

    let document: GrandPrixDocument = serde_json::from_str(&written).unwrap();
    assert_eq!(document.meeting.meeting_key, 1257);
    assert!(document.sessions.race.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_grand_prix_without_year_looks_meeting_up_by_key() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let cli = cli_for(&temp_dir, &["--compact", "grand-prix", "--meeting-key", "1257", "--sessions", "Qualifying"]);

    let path = cli.execute_with(&scraper).await.unwrap();

    assert_eq!(transport.calls_to("meetings?meeting_key=1257"), 1);
    assert_eq!(transport.calls_to("meetings?year=2025"), 0);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.contains('\n'));
    let value: Value = serde_json::from_str(&written).unwrap();
    assert!(value["sessions"]["qualifying"].is_object());
    assert!(value["sessions"].get("race").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_season_command_writes_array() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let cli = cli_for(&temp_dir, &["season", "--year", "2025", "--sessions", "Race"]);

    let path = cli.execute_with(&scraper).await.unwrap();

    assert_eq!(path, temp_dir.path().join("season-2025.json"));
    let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_failed_scrape_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(miami_weekend().always("meetings?meeting_key=latest", Reply::Status(503, "Service Unavailable")));
    let scraper = scraper_over(&transport);
    let cli = cli_for(&temp_dir, &["latest"]);

    let err = cli.execute_with(&scraper).await.unwrap_err();

    match err {
        CliError::FetcherError(inner) => {
            assert_eq!(inner.code(), "SCRAPE_FAILED");
            assert_eq!(inner.root_cause().code(), "SERVICE_UNAVAILABLE");
        }
        other => panic!("expected FetcherError, got {other:?}"),
    }
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_document_stats_describe_written_file() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let document = scraper
        .scrape_grand_prix(1257, 2025, &ScrapeOptions::new())
        .await
        .into_result()
        .unwrap();

    let path = temp_dir.path().join("doc.json");
    let options = JsonWriteOptions {
        pretty: false,
        ensure_dir: false,
    };
    save_json(&document, &path, options).unwrap();

    let stats = json_stats(&document).unwrap();
    assert_eq!(stats.size, std::fs::metadata(&path).unwrap().len());
    assert_eq!(stats.keys, Some(3));
    assert!(stats.depth.unwrap() >= 4);
}
