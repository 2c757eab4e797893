//! Typed per-resource accessor for the OpenF1 API
//!
//! One operation per upstream resource kind. Every operation returns a
//! [`ScrapeResult`] envelope; nothing here propagates an error by `Err`.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::openf1_config::{LATEST_MEETING, OPENF1_ENDPOINTS};
use super::openf1_http::{validate_array, OpenF1HttpClient};
use super::{FetcherError, FetcherResult};
use crate::envelope::ScrapeResult;
use crate::scraper::config::ClientConfig;
use crate::{
    Driver, Lap, Meeting, PitStop, RaceControlMessage, Session, SessionResult, StartingGridSlot,
    Stint,
};

/// Read-only accessor over [`OpenF1HttpClient`]
#[derive(Clone)]
pub struct OpenF1Service {
    client: OpenF1HttpClient,
}

impl OpenF1Service {
    /// Create an accessor over an existing client
    pub fn new(client: OpenF1HttpClient) -> Self {
        Self { client }
    }

    /// Create an accessor backed by the shared `reqwest` client
    pub fn with_config(config: &ClientConfig) -> Self {
        Self::new(OpenF1HttpClient::with_config(config))
    }

    /// Underlying transport client
    pub fn client(&self) -> &OpenF1HttpClient {
        &self.client
    }

    /// Fetch, validate and decode one resource listing
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> FetcherResult<Vec<T>> {
        let payload = self.client.get(endpoint, params).await?;
        let records = validate_array(payload, endpoint)?;

        let decoded = records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| FetcherError::InvalidResponse {
                context: endpoint.to_string(),
                received: format!("array with malformed record: {e}"),
            })?;

        debug!(endpoint, records = decoded.len(), "Decoded resource listing");
        Ok(decoded)
    }

    /// Same as [`Self::fetch_list`] but an empty listing is [`FetcherError::NoData`]
    async fn fetch_non_empty<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        empty_message: String,
    ) -> FetcherResult<Vec<T>> {
        let records = self.fetch_list(endpoint, params).await?;
        if records.is_empty() {
            return Err(FetcherError::NoData {
                message: empty_message,
            });
        }
        Ok(records)
    }

    fn envelope<T>(operation: &str, result: FetcherResult<T>) -> ScrapeResult<T> {
        if let Err(err) = &result {
            warn!(operation, code = err.code(), "OpenF1 request failed: {}", err);
        }
        result.into()
    }

    /// All meetings of a season
    pub async fn get_meetings(&self, year: i32) -> ScrapeResult<Vec<Meeting>> {
        let result = self
            .fetch_non_empty(
                OPENF1_ENDPOINTS.meetings,
                &[("year", year.to_string())],
                format!("no meetings found for {year}"),
            )
            .await;
        Self::envelope("get_meetings", result)
    }

    /// The most recent meeting
    pub async fn get_latest_meeting(&self) -> ScrapeResult<Meeting> {
        let result = self
            .fetch_non_empty::<Meeting>(
                OPENF1_ENDPOINTS.meetings,
                &[("meeting_key", LATEST_MEETING.to_string())],
                "no latest meeting available".to_string(),
            )
            .await
            .map(|meetings| meetings.into_iter().next());
        Self::envelope("get_latest_meeting", first_or_no_data(result, "latest meeting"))
    }

    /// One meeting by key
    pub async fn get_meeting(&self, meeting_key: u32) -> ScrapeResult<Meeting> {
        let result = self
            .fetch_non_empty::<Meeting>(
                OPENF1_ENDPOINTS.meetings,
                &[("meeting_key", meeting_key.to_string())],
                format!("meeting {meeting_key} not found"),
            )
            .await
            .map(|meetings| meetings.into_iter().next());
        Self::envelope("get_meeting", first_or_no_data(result, "meeting"))
    }

    /// Sessions of a meeting
    pub async fn get_sessions(&self, meeting_key: u32) -> ScrapeResult<Vec<Session>> {
        let result = self
            .fetch_non_empty(
                OPENF1_ENDPOINTS.sessions,
                &[("meeting_key", meeting_key.to_string())],
                format!("no sessions found for meeting {meeting_key}"),
            )
            .await;
        Self::envelope("get_sessions", result)
    }

    /// Drivers entered in a session
    pub async fn get_drivers(&self, session_key: u32) -> ScrapeResult<Vec<Driver>> {
        let result = self
            .fetch_list(OPENF1_ENDPOINTS.drivers, &session_filter(session_key))
            .await;
        Self::envelope("get_drivers", result)
    }

    /// Final classification of a session
    pub async fn get_session_results(&self, session_key: u32) -> ScrapeResult<Vec<SessionResult>> {
        let result = self
            .fetch_list(OPENF1_ENDPOINTS.session_result, &session_filter(session_key))
            .await;
        Self::envelope("get_session_results", result)
    }

    /// Lap timing of a session
    pub async fn get_laps(&self, session_key: u32) -> ScrapeResult<Vec<Lap>> {
        let result = self
            .fetch_list(OPENF1_ENDPOINTS.laps, &session_filter(session_key))
            .await;
        Self::envelope("get_laps", result)
    }

    /// Tyre stints of a session
    pub async fn get_stints(&self, session_key: u32) -> ScrapeResult<Vec<Stint>> {
        let result = self
            .fetch_list(OPENF1_ENDPOINTS.stints, &session_filter(session_key))
            .await;
        Self::envelope("get_stints", result)
    }

    /// Pit stops of a session
    pub async fn get_pits(&self, session_key: u32) -> ScrapeResult<Vec<PitStop>> {
        let result = self
            .fetch_list(OPENF1_ENDPOINTS.pit, &session_filter(session_key))
            .await;
        Self::envelope("get_pits", result)
    }

    /// Race control messages of a session
    pub async fn get_race_control(&self, session_key: u32) -> ScrapeResult<Vec<RaceControlMessage>> {
        let result = self
            .fetch_list(OPENF1_ENDPOINTS.race_control, &session_filter(session_key))
            .await;
        Self::envelope("get_race_control", result)
    }

    /// Starting grid of a race-type session
    pub async fn get_starting_grid(&self, session_key: u32) -> ScrapeResult<Vec<StartingGridSlot>> {
        let result = self
            .fetch_list(OPENF1_ENDPOINTS.starting_grid, &session_filter(session_key))
            .await;
        Self::envelope("get_starting_grid", result)
    }
}

fn session_filter(session_key: u32) -> [(&'static str, String); 1] {
    [("session_key", session_key.to_string())]
}

fn first_or_no_data<T>(result: FetcherResult<Option<T>>, what: &str) -> FetcherResult<T> {
    result?.ok_or_else(|| FetcherError::NoData {
        message: format!("no {what} available"),
    })
}
