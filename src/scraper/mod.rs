//! Session aggregation and event orchestration
//!
//! # Overview
//!
//! A scrape runs in three layers:
//!
//! 1. **Meeting resolution**: latest meeting, one meeting of a season, or every
//!    meeting of a season, via [`GrandPrixScraper`]
//! 2. **Session selection**: sessions are listed, filtered by name through
//!    [`ScrapeOptions`] and mapped onto [`crate::SessionKind`] slots
//! 3. **Aggregation**: [`aggregator::get_complete_session_data`] fetches drivers and
//!    results concurrently, then the requested extras
//!
//! # Quick Start
//!
//! ```no_run
//! use f1_data_scraper::scraper::{GrandPrixScraper, ScrapeOptions};
//!
//! # async fn example() {
//! let scraper = GrandPrixScraper::new();
//! let options = ScrapeOptions::new().with_laps(true);
//!
//! let season = scraper.scrape_season(2025, &options).await;
//! if let Some(documents) = season.data {
//!     println!("{} Grands Prix", documents.len());
//! }
//! # }
//! ```
//!
//! # Error Handling
//!
//! Operations return [`crate::ScrapeResult`] envelopes:
//! - Meeting or session listing failures fail the envelope with `ScrapeFailed`
//! - Mandatory session failures (drivers, results) drop the session
//! - Optional failures (laps, stints, pits, race control, grid) drop the field

pub mod aggregator;
pub mod config;
pub mod executor;
pub mod options;

pub use config::ClientConfig;
pub use executor::GrandPrixScraper;
pub use options::{ScrapeOptions, SessionFetchOptions};
