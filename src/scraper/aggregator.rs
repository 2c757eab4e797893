//! Session aggregation
//!
//! Drivers and results are mandatory and fetched concurrently. The optional
//! sub-resources follow one at a time; a failure there only leaves the field
//! out of the document.

use tracing::{debug, info, warn};

use super::options::SessionFetchOptions;
use crate::document::SessionDocument;
use crate::envelope::ScrapeResult;
use crate::fetcher::{FetcherError, OpenF1Service};
use crate::Session;

/// Build the complete document for one session
///
/// # Errors
/// The envelope fails when drivers or results cannot be fetched. If both fail,
/// the drivers error is the one reported.
pub async fn get_complete_session_data(
    service: &OpenF1Service,
    session: &Session,
    options: &SessionFetchOptions,
) -> ScrapeResult<SessionDocument> {
    let session_key = session.session_key;
    debug!(session_key, session_name = %session.session_name, "Fetching session data");

    let (drivers, results) = tokio::join!(
        service.get_drivers(session_key),
        service.get_session_results(session_key)
    );

    let drivers = match drivers.into_result() {
        Ok(drivers) => drivers,
        Err(err) => return mandatory_failure(session, "drivers", err),
    };
    let results = match results.into_result() {
        Ok(results) => results,
        Err(err) => return mandatory_failure(session, "results", err),
    };

    let mut document = SessionDocument::new(session.clone(), drivers, results);

    if options.include_laps {
        document.laps = optional(service.get_laps(session_key).await, "laps", session_key);
    }
    if options.include_stints {
        document.stints = optional(service.get_stints(session_key).await, "stints", session_key);
    }
    if options.include_pits {
        document.pits = optional(service.get_pits(session_key).await, "pits", session_key);
    }
    if options.include_race_control {
        document.race_control = optional(
            service.get_race_control(session_key).await,
            "race_control",
            session_key,
        );
    }
    if options.include_starting_grid {
        document.starting_grid = optional(
            service.get_starting_grid(session_key).await,
            "starting_grid",
            session_key,
        );
    }

    for problem in document.validate() {
        warn!(session_key, "Inconsistent session data: {}", problem);
    }

    info!(
        session_key,
        session_name = %session.session_name,
        drivers = document.drivers.len(),
        results = document.results.len(),
        "Session data assembled"
    );

    ScrapeResult::ok(document)
}

fn mandatory_failure(
    session: &Session,
    resource: &str,
    err: FetcherError,
) -> ScrapeResult<SessionDocument> {
    warn!(
        session_key = session.session_key,
        resource,
        code = err.code(),
        "Mandatory session resource failed: {}",
        err
    );
    ScrapeResult::err(err)
}

fn optional<T>(envelope: ScrapeResult<Vec<T>>, resource: &str, session_key: u32) -> Option<Vec<T>> {
    match envelope.into_result() {
        Ok(records) => Some(records),
        Err(err) => {
            warn!(
                session_key,
                resource,
                code = err.code(),
                "Optional session resource omitted: {}",
                err
            );
            None
        }
    }
}
