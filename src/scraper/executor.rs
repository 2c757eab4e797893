//! Grand Prix orchestration
//!
//! Resolves a meeting, lists and filters its sessions, aggregates each one and
//! assembles a [`GrandPrixDocument`]. Sessions and meetings are processed one
//! after another; a failed session or meeting is logged and left out.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::aggregator;
use super::config::ClientConfig;
use super::options::{ScrapeOptions, SessionFetchOptions};
use crate::document::{GrandPrixDocument, SessionDocument, SessionKind, SessionMap};
use crate::envelope::ScrapeResult;
use crate::fetcher::{FetcherError, OpenF1Service};
use crate::metrics::{record_session_scraped, record_session_skipped, MeetingMetrics};
use crate::{Meeting, Session};

/// Entry point for meeting and season scrapes
#[derive(Clone)]
pub struct GrandPrixScraper {
    service: Arc<OpenF1Service>,
}

impl Default for GrandPrixScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl GrandPrixScraper {
    /// Scraper against the public API with default retry settings
    pub fn new() -> Self {
        Self::with_config(&ClientConfig::default())
    }

    /// Scraper with explicit client settings
    pub fn with_config(config: &ClientConfig) -> Self {
        Self::with_service(Arc::new(OpenF1Service::with_config(config)))
    }

    /// Scraper over an existing accessor (e.g., one built on a custom transport)
    pub fn with_service(service: Arc<OpenF1Service>) -> Self {
        Self { service }
    }

    /// Underlying resource accessor
    pub fn service(&self) -> &OpenF1Service {
        &self.service
    }

    /// Build the document for one session
    pub async fn get_complete_session_data(
        &self,
        session: &Session,
        options: &SessionFetchOptions,
    ) -> ScrapeResult<SessionDocument> {
        aggregator::get_complete_session_data(&self.service, session, options).await
    }

    /// Scrape the most recent meeting
    pub async fn scrape_latest_grand_prix(&self, options: &ScrapeOptions) -> ScrapeResult<GrandPrixDocument> {
        info!("Scraping latest Grand Prix");

        match self.service.get_latest_meeting().await.into_result() {
            Ok(meeting) => self.scrape_meeting(meeting, options).await,
            Err(err) => resolution_failure("resolve latest meeting", err),
        }
    }

    /// Scrape one meeting of a season
    ///
    /// The meeting is looked up in the season's listing; a key that is not
    /// listed fails with [`FetcherError::NoData`] wrapped in
    /// [`FetcherError::ScrapeFailed`].
    pub async fn scrape_grand_prix(
        &self,
        meeting_key: u32,
        year: i32,
        options: &ScrapeOptions,
    ) -> ScrapeResult<GrandPrixDocument> {
        info!(meeting_key, year, "Scraping Grand Prix");

        let meetings = match self.service.get_meetings(year).await.into_result() {
            Ok(meetings) => meetings,
            Err(err) => return resolution_failure("list season meetings", err),
        };

        match meetings.into_iter().find(|m| m.meeting_key == meeting_key) {
            Some(meeting) => self.scrape_meeting(meeting, options).await,
            None => resolution_failure(
                "resolve meeting",
                FetcherError::NoData {
                    message: format!("meeting {meeting_key} not found in {year}"),
                },
            ),
        }
    }

    /// Scrape every meeting of a season
    ///
    /// Meetings that fail are left out; the envelope only fails when the
    /// season listing itself cannot be fetched.
    pub async fn scrape_season(&self, year: i32, options: &ScrapeOptions) -> ScrapeResult<Vec<GrandPrixDocument>> {
        info!(year, "Scraping season");

        let meetings = match self.service.get_meetings(year).await.into_result() {
            Ok(meetings) => meetings,
            Err(err) => return resolution_failure("list season meetings", err),
        };

        let total = meetings.len();
        let mut documents = Vec::with_capacity(total);

        for meeting in meetings {
            let meeting_key = meeting.meeting_key;
            let meeting_name = meeting.meeting_name.clone();

            match self.scrape_meeting(meeting, options).await.into_result() {
                Ok(document) => documents.push(document),
                Err(err) => {
                    warn!(meeting_key, meeting_name = %meeting_name, code = err.code(), "Meeting left out of season: {}", err);
                }
            }
        }

        info!(year, scraped = documents.len(), total, "Season scrape completed");
        ScrapeResult::ok(documents)
    }

    /// Run the meeting flow for an already resolved meeting
    pub async fn scrape_meeting(&self, meeting: Meeting, options: &ScrapeOptions) -> ScrapeResult<GrandPrixDocument> {
        let metrics = MeetingMetrics::start(meeting.meeting_key);
        info!(
            meeting_key = meeting.meeting_key,
            meeting_name = %meeting.meeting_name,
            "Scraping meeting"
        );

        let sessions = match self.service.get_sessions(meeting.meeting_key).await.into_result() {
            Ok(sessions) => sessions,
            Err(err) => {
                let failure = FetcherError::scrape_failed("list sessions", err);
                metrics.record_failure(failure.code());
                error!(meeting_key = meeting.meeting_key, "Meeting scrape failed: {}", failure);
                return ScrapeResult::err(failure);
            }
        };

        let mut slots = SessionMap::default();

        for session in sessions {
            if session.meeting_key != meeting.meeting_key {
                warn!(
                    meeting_key = meeting.meeting_key,
                    session_key = session.session_key,
                    session_meeting_key = session.meeting_key,
                    "Session belongs to another meeting, skipping"
                );
                continue;
            }
            if !options.accepts_session(&session.session_name) {
                continue;
            }

            let Some(kind) = SessionKind::from_session_name(&session.session_name) else {
                info!(
                    session_key = session.session_key,
                    session_name = %session.session_name,
                    "Unrecognized session name, skipping"
                );
                continue;
            };

            let fetch_options = options.session_fetch_options(session.is_race_type());
            match self.get_complete_session_data(&session, &fetch_options).await.into_result() {
                Ok(document) => {
                    record_session_scraped(kind.as_str());
                    if slots.insert(kind, document).is_some() {
                        warn!(
                            meeting_key = meeting.meeting_key,
                            session = kind.as_str(),
                            "Duplicate session kind, keeping the later one"
                        );
                    }
                }
                Err(err) => {
                    record_session_skipped(kind.as_str(), err.code());
                    warn!(
                        session_key = session.session_key,
                        session = kind.as_str(),
                        code = err.code(),
                        "Session left out of document: {}",
                        err
                    );
                }
            }
        }

        metrics.record_success(slots.len());
        ScrapeResult::ok(GrandPrixDocument::new(meeting, slots))
    }
}

fn resolution_failure<T>(stage: &str, err: FetcherError) -> ScrapeResult<T> {
    let failure = FetcherError::scrape_failed(stage, err);
    error!(stage, code = failure.code(), "Scrape failed: {}", failure);
    ScrapeResult::err(failure)
}
