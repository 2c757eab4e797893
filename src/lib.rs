//! # F1 Data Scraper Library
//!
//! Retrieves Formula 1 event data from the public [OpenF1](https://openf1.org) REST API
//! and assembles it into a single hierarchical document per Grand Prix weekend.
//!
//! ## Features
//!
//! - **Resilient transport**: per-attempt timeouts, exponential backoff and a typed
//!   error taxonomy for every failure the upstream API can produce
//! - **Typed resources**: meetings, sessions, drivers, results, laps, stints, pit stops,
//!   race control messages and starting grids decode into strongly-typed records
//! - **Partial-failure tolerance**: a failed session or meeting is dropped from the
//!   output instead of aborting the whole scrape
//! - **Envelopes**: every accessor and orchestrator call returns a uniform
//!   [`envelope::ScrapeResult`] instead of raising
//!
//! ## Quick Start
//!
//! ```no_run
//! use f1_data_scraper::scraper::{GrandPrixScraper, ScrapeOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scraper = GrandPrixScraper::new();
//! let options = ScrapeOptions::new().with_session_types(["Race"]);
//!
//! let result = scraper.scrape_latest_grand_prix(&options).await;
//! let document = result.into_result()?;
//! println!("{} sessions scraped", document.sessions.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`fetcher`] - Transport client, error taxonomy and per-resource accessor
//! - [`scraper`] - Session aggregation and meeting/season orchestration
//! - [`document`] - Aggregated output documents
//! - [`envelope`] - Success/error envelope returned by every operation
//! - [`output`] - JSON persistence helpers used by the binary
//! - [`metrics`] - Request and scrape metrics
//!
//! ## Data Types
//!
//! Upstream records keep the OpenF1 field names so the produced JSON matches the API:
//!
//! - [`Meeting`] - One race weekend
//! - [`Session`] - One timed activity within a meeting
//! - [`Driver`] - Competitor entry scoped to a session
//! - [`SessionResult`] - One driver's classification in a session
//! - [`Lap`], [`Stint`], [`PitStop`], [`RaceControlMessage`], [`StartingGridSlot`] -
//!   optional per-session sub-resources

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CLI command implementations
pub mod cli;

/// Aggregated output documents
pub mod document;

/// Uniform operation envelopes
pub mod envelope;

/// Transport client and resource accessors
pub mod fetcher;

/// Observability metrics
pub mod metrics;

/// Document writers
pub mod output;

/// Session aggregation and event orchestration
pub mod scraper;

pub use document::{GrandPrixDocument, SessionDocument, SessionKind};
pub use envelope::ScrapeResult;
pub use fetcher::FetcherError;

/// One race weekend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    /// Unique meeting identifier
    pub meeting_key: u32,
    /// Season year
    pub year: i32,
    /// Short meeting name (e.g., "Italian Grand Prix")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub meeting_name: String,
    /// Official sponsored name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_official_name: Option<String>,
    /// City or area hosting the event
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// Numeric country identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_key: Option<u32>,
    /// ISO country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Country name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country_name: String,
    /// Numeric circuit identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_key: Option<u32>,
    /// Circuit short name (e.g., "Monza")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub circuit_short_name: String,
    /// Start of the weekend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<DateTime<Utc>>,
    /// Local offset from GMT (e.g., "02:00:00")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmt_offset: Option<String>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One timed activity within a meeting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Unique session identifier
    pub session_key: u32,
    /// Parent meeting identifier
    pub meeting_key: u32,
    /// Free-text session name (e.g., "Practice 1", "Sprint", "Race")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_name: String,
    /// Session type (e.g., "Practice", "Qualifying", "Race")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_type: String,
    /// Session start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<DateTime<Utc>>,
    /// Session end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<DateTime<Utc>>,
    /// Local offset from GMT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmt_offset: Option<String>,
    /// City or area hosting the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Numeric country identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_key: Option<u32>,
    /// ISO country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Country name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    /// Numeric circuit identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_key: Option<u32>,
    /// Circuit short name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_short_name: Option<String>,
    /// Season year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// Race-type sessions (grand prix and sprint) carry a starting grid
    pub fn is_race_type(&self) -> bool {
        self.session_type == "Race"
    }
}

/// Competitor entry scoped to a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    /// Car number, unique within a session
    pub driver_number: u32,
    /// Name as shown on broadcast graphics (e.g., "M VERSTAPPEN")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast_name: Option<String>,
    /// First name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Full name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Three-letter acronym (e.g., "VER")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_acronym: Option<String>,
    /// Team name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    /// Team colour as hex without the leading '#'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_colour: Option<String>,
    /// ISO country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Portrait URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headshot_url: Option<String>,
    /// Session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
    /// Meeting identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_key: Option<u32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Gap between a driver and the session leader
///
/// OpenF1 reports this in three shapes, which must survive a JSON round trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GapToLeader {
    /// Gap in seconds
    Seconds(f64),
    /// Lapped gap (e.g., "+1 LAP")
    Laps(String),
    /// One gap per qualifying segment (Q1, Q2, Q3)
    Segments(Vec<Option<f64>>),
}

/// Total time of a result entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResultDuration {
    /// Duration in seconds
    Seconds(f64),
    /// Best time per qualifying segment
    Segments(Vec<Option<f64>>),
}

/// One driver's classification in a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionResult {
    /// Car number
    pub driver_number: u32,
    /// Classified position, absent for unclassified entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Gap to the leader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_to_leader: Option<GapToLeader>,
    /// Total time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<ResultDuration>,
    /// Did not finish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnf: Option<bool>,
    /// Did not start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<bool>,
    /// Disqualified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsq: Option<bool>,
    /// Laps completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_laps: Option<u32>,
    /// Session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
    /// Meeting identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_key: Option<u32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionResult {
    /// Whether this entry takes part in the position ordering
    pub fn is_classified(&self) -> bool {
        !self.dnf.unwrap_or(false) && !self.dns.unwrap_or(false)
    }
}

/// One timed lap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lap {
    /// Car number
    pub driver_number: u32,
    /// Lap number
    pub lap_number: u32,
    /// Lap start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<DateTime<Utc>>,
    /// Lap time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_duration: Option<f64>,
    /// Sector 1 time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sector_1: Option<f64>,
    /// Sector 2 time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sector_2: Option<f64>,
    /// Sector 3 time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sector_3: Option<f64>,
    /// Speed at the first intermediate (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i1_speed: Option<f64>,
    /// Speed at the second intermediate (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i2_speed: Option<f64>,
    /// Speed trap reading (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st_speed: Option<f64>,
    /// Whether the lap started in the pit lane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pit_out_lap: Option<bool>,
    /// Mini-sector status codes for sector 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_sector_1: Option<Vec<Option<u32>>>,
    /// Mini-sector status codes for sector 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_sector_2: Option<Vec<Option<u32>>>,
    /// Mini-sector status codes for sector 3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_sector_3: Option<Vec<Option<u32>>>,
    /// Session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
    /// Meeting identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_key: Option<u32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One run on a single set of tyres
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stint {
    /// Car number
    pub driver_number: u32,
    /// Stint sequence number for the driver
    pub stint_number: u32,
    /// Tyre compound (e.g., "SOFT")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<String>,
    /// First lap of the stint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_start: Option<u32>,
    /// Last lap of the stint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_end: Option<u32>,
    /// Tyre age in laps when the stint started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tyre_age_at_start: Option<u32>,
    /// Session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
    /// Meeting identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_key: Option<u32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One pit lane visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PitStop {
    /// Car number
    pub driver_number: u32,
    /// Lap of the stop
    pub lap_number: u32,
    /// Time of the stop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Time spent in the pit lane in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pit_duration: Option<f64>,
    /// Session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
    /// Meeting identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_key: Option<u32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Race direction message (flags, penalties, track status)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaceControlMessage {
    /// Message category (e.g., "Flag", "SafetyCar")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    /// Message text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Time of the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Driver concerned, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_number: Option<u32>,
    /// Flag shown, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Lap of the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_number: Option<u32>,
    /// Scope ("Track", "Sector", "Driver")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Sector concerned, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<u32>,
    /// Session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
    /// Meeting identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_key: Option<u32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Grid position for a race start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartingGridSlot {
    /// Grid position
    pub position: u32,
    /// Car number
    pub driver_number: u32,
    /// Qualifying lap time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_duration: Option<f64>,
    /// Session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
    /// Meeting identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_key: Option<u32>,
    /// Upstream fields without a typed counterpart, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
