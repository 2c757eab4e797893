//! OpenF1 endpoint configuration
//!
//! Resource paths are plain configuration so the accessor layer never hard-codes URLs.
//! Every resource returns a JSON array of flat records filtered by equality query
//! parameters (`meeting_key`, `session_key`, `year`).

/// Public OpenF1 REST API root
pub const OPENF1_BASE_URL: &str = "https://api.openf1.org/v1";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("f1-data-scraper/", env!("CARGO_PKG_VERSION"));

/// Sentinel accepted by the `meeting_key` filter for the most recent meeting
pub const LATEST_MEETING: &str = "latest";

/// Resource paths for the OpenF1 API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenF1Endpoints {
    /// Race weekends
    pub meetings: &'static str,
    /// Timed sessions of a meeting
    pub sessions: &'static str,
    /// Drivers entered in a session
    pub drivers: &'static str,
    /// Final classification of a session
    pub session_result: &'static str,
    /// Lap timing
    pub laps: &'static str,
    /// Tyre stints
    pub stints: &'static str,
    /// Pit lane visits
    pub pit: &'static str,
    /// Race direction messages
    pub race_control: &'static str,
    /// Race starting grid
    pub starting_grid: &'static str,
}

/// OpenF1 v1 resource paths
pub const OPENF1_ENDPOINTS: OpenF1Endpoints = OpenF1Endpoints {
    meetings: "meetings",
    sessions: "sessions",
    drivers: "drivers",
    session_result: "session_result",
    laps: "laps",
    stints: "stints",
    pit: "pit",
    race_control: "race_control",
    starting_grid: "starting_grid",
};

/// Join the base URL and a resource path without doubling slashes
pub fn resource_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
