//! Scrape commands

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::CliError;
use crate::document::{GrandPrixDocument, SessionKind};
use crate::fetcher::openf1_config::OPENF1_BASE_URL;
use crate::fetcher::FetcherError;
use crate::output::{generate_gp_filename, json_stats, save_json, season_filename, JsonWriteOptions};
use crate::scraper::config::{
    ClientConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};
use crate::scraper::{GrandPrixScraper, ScrapeOptions};

/// F1 Data Scraper CLI
#[derive(Parser, Debug)]
#[command(name = "f1-data-scraper")]
#[command(about = "Scrape Formula 1 Grand Prix data from the OpenF1 API into JSON documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// OpenF1 API root
    #[arg(long, global = true, env = "OPENF1_BASE_URL", default_value = OPENF1_BASE_URL)]
    pub base_url: String,

    /// Time budget per request attempt, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout_secs: u64,

    /// Attempts per request, including the first one (range: 1-10)
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds; doubles on every further retry
    #[arg(long, global = true, default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// Directory the JSON documents are written to
    #[arg(long, global = true, env = "F1_SCRAPER_OUTPUT_DIR", default_value = "data")]
    pub output_dir: PathBuf,

    /// Write single-line JSON instead of indented JSON
    #[arg(long, global = true, default_value_t = false)]
    pub compact: bool,

    /// Expose Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape the most recent Grand Prix
    Latest(LatestArgs),

    /// Scrape one Grand Prix by meeting key
    GrandPrix(GrandPrixArgs),

    /// Scrape every Grand Prix of a season
    Season(SeasonArgs),
}

/// Session selection and optional resources shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Session names to keep, comma separated (e.g., "Qualifying,Race")
    #[arg(long, value_delimiter = ',')]
    pub sessions: Vec<String>,

    /// Include lap timing
    #[arg(long)]
    pub laps: bool,

    /// Include tyre stints
    #[arg(long)]
    pub stints: bool,

    /// Include pit stops
    #[arg(long)]
    pub pits: bool,

    /// Include race control messages
    #[arg(long)]
    pub race_control: bool,

    /// Include every optional resource
    #[arg(long)]
    pub all_extras: bool,
}

impl SelectionArgs {
    /// Convert to scrape options
    ///
    /// Session names are matched loosely (`race`, `PRACTICE-1`) and rewritten to the
    /// spelling OpenF1 uses; names that can never fill a slot are rejected.
    pub fn to_options(&self) -> Result<ScrapeOptions, CliError> {
        let mut names: Vec<&'static str> = Vec::new();
        for name in self.sessions.iter().map(|name| name.trim()) {
            if name.is_empty() {
                continue;
            }
            let kind = SessionKind::from_session_name(name).ok_or_else(|| {
                CliError::InvalidArgument(format!(
                    "unrecognized session name '{name}'. Valid names: Practice 1, Practice 2, Practice 3, Qualifying, Sprint, Race"
                ))
            })?;
            if !names.contains(&kind.upstream_name()) {
                names.push(kind.upstream_name());
            }
        }

        let mut options = ScrapeOptions::new()
            .with_laps(self.laps)
            .with_stints(self.stints)
            .with_pits(self.pits)
            .with_race_control(self.race_control);
        if self.all_extras {
            options = options.all_extras();
        }
        if !names.is_empty() {
            options = options.with_session_types(names);
        }
        Ok(options)
    }
}

/// Arguments for the latest Grand Prix
#[derive(Parser, Debug)]
pub struct LatestArgs {
    /// Session selection
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for one Grand Prix
#[derive(Parser, Debug)]
pub struct GrandPrixArgs {
    /// OpenF1 meeting key (e.g., 1257)
    #[arg(long)]
    pub meeting_key: u32,

    /// Season the meeting belongs to; when omitted the meeting is looked up by key
    #[arg(long)]
    pub year: Option<i32>,

    /// Session selection
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for a season
#[derive(Parser, Debug)]
pub struct SeasonArgs {
    /// Season year (e.g., 2025)
    #[arg(long)]
    pub year: i32,

    /// Session selection
    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl Cli {
    /// Client settings from the global flags
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_attempts(self.max_attempts)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
    }

    /// Run the command against the configured API and write its document
    ///
    /// Returns the path of the written file.
    pub async fn execute(&self) -> Result<PathBuf, CliError> {
        let scraper = GrandPrixScraper::with_config(&self.client_config());
        self.execute_with(&scraper).await
    }

    /// Run the command with an existing scraper
    pub async fn execute_with(&self, scraper: &GrandPrixScraper) -> Result<PathBuf, CliError> {
        match &self.command {
            Commands::Latest(args) => {
                let options = args.selection.to_options()?;
                let spinner = create_spinner("Scraping latest Grand Prix".to_string());
                let result = scraper.scrape_latest_grand_prix(&options).await;
                spinner.finish_and_clear();

                let document = result.into_result()?;
                self.write_grand_prix(&document)
            }
            Commands::GrandPrix(args) => {
                let options = args.selection.to_options()?;
                let spinner = create_spinner(format!("Scraping meeting {}", args.meeting_key));
                let result = match args.year {
                    Some(year) => scraper.scrape_grand_prix(args.meeting_key, year, &options).await,
                    None => match scraper.service().get_meeting(args.meeting_key).await.into_result() {
                        Ok(meeting) => scraper.scrape_meeting(meeting, &options).await,
                        Err(err) => {
                            spinner.finish_and_clear();
                            return Err(FetcherError::scrape_failed("resolve meeting", err).into());
                        }
                    },
                };
                spinner.finish_and_clear();

                let document = result.into_result()?;
                self.write_grand_prix(&document)
            }
            Commands::Season(args) => {
                let options = args.selection.to_options()?;
                let spinner = create_spinner(format!("Scraping season {}", args.year));
                let result = scraper.scrape_season(args.year, &options).await;
                spinner.finish_and_clear();

                let documents = result.into_result()?;
                info!(year = args.year, grands_prix = documents.len(), "Season scraped");
                self.write_document(&documents, season_filename(args.year))
            }
        }
    }

    fn write_grand_prix(&self, document: &GrandPrixDocument) -> Result<PathBuf, CliError> {
        info!(
            meeting = %document.meeting.meeting_name,
            sessions = document.sessions.len(),
            "Grand Prix scraped"
        );
        let file_name = generate_gp_filename(&document.meeting.meeting_name, document.meeting.year, "json");
        self.write_document(document, file_name)
    }

    fn write_document<T: Serialize + ?Sized>(&self, value: &T, file_name: String) -> Result<PathBuf, CliError> {
        let path = self.output_dir.join(file_name);
        let options = JsonWriteOptions {
            pretty: !self.compact,
            ensure_dir: true,
        };
        save_json(value, &path, options)?;

        let stats = json_stats(value)?;
        info!(
            path = %path.display(),
            size = %stats.size_formatted,
            keys = stats.keys.unwrap_or(0),
            depth = stats.depth.unwrap_or(0),
            "Document statistics"
        );

        Ok(path)
    }
}

/// Spinner shown while a scrape is running
fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("hardcoded template is valid"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
