//! Session aggregation: mandatory vs optional resources

use serde_json::json;
use std::sync::Arc;

use f1_data_scraper::scraper::aggregator::get_complete_session_data;
use f1_data_scraper::scraper::SessionFetchOptions;
use f1_data_scraper::Session;

use crate::support::scripted::{
    drivers_json, grid_json, laps_json, network_error, race_results_json, service_over,
    session_json, Reply, ScriptedTransport,
};

fn race_session() -> Session {
    serde_json::from_value(session_json(9994, 1257, "Race", "Race")).unwrap()
}

fn healthy_race() -> ScriptedTransport {
    ScriptedTransport::new()
        .always("drivers?session_key=9994", Reply::Json(drivers_json(9994)))
        .always("session_result?session_key=9994", Reply::Json(race_results_json(9994)))
        .always("stints?session_key=9994", Reply::Json(json!([
            {"driver_number": 1, "stint_number": 1, "compound": "MEDIUM", "lap_start": 1, "lap_end": 30, "tyre_age_at_start": 0}
        ])))
        .always("pit?session_key=9994", Reply::Json(json!([
            {"driver_number": 1, "lap_number": 30, "pit_duration": 22.4}
        ])))
        .always("race_control?session_key=9994", Reply::Json(json!([
            {"category": "Flag", "message": "GREEN LIGHT - PIT EXIT OPEN", "flag": "GREEN", "scope": "Track"}
        ])))
        .always("starting_grid?session_key=9994", Reply::Json(grid_json(9994)))
}

#[tokio::test(start_paused = true)]
async fn test_mandatory_only_when_no_extras_requested() {
    let transport = Arc::new(healthy_race());
    let service = service_over(&transport);

    let document = get_complete_session_data(&service, &race_session(), &SessionFetchOptions::default())
        .await
        .into_result()
        .unwrap();

    assert_eq!(document.drivers.len(), 2);
    assert_eq!(document.results.len(), 2);
    assert!(document.laps.is_none());
    assert!(document.starting_grid.is_none());
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_laps_failure_is_absorbed() {
    let transport = Arc::new(healthy_race().always("laps?session_key=9994", Reply::Status(500, "Internal Server Error")));
    let service = service_over(&transport);
    let options = SessionFetchOptions {
        include_laps: true,
        include_stints: true,
        ..Default::default()
    };

    let envelope = get_complete_session_data(&service, &race_session(), &options).await;

    assert!(envelope.success);
    let document = envelope.data.unwrap();
    assert!(document.laps.is_none());
    assert_eq!(document.stints.as_ref().map(Vec::len), Some(1));

    let value = serde_json::to_value(&document).unwrap();
    assert!(value.get("laps").is_none());
    assert!(value.get("stints").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_all_extras_attach_when_fetched() {
    let transport = Arc::new(healthy_race().always("laps?session_key=9994", Reply::Json(laps_json(9994))));
    let service = service_over(&transport);
    let options = SessionFetchOptions {
        include_laps: true,
        include_stints: true,
        include_pits: true,
        include_race_control: true,
        include_starting_grid: true,
    };

    let document = get_complete_session_data(&service, &race_session(), &options)
        .await
        .into_result()
        .unwrap();

    assert_eq!(document.laps.as_ref().map(Vec::len), Some(1));
    assert_eq!(document.pits.as_ref().unwrap()[0].lap_number, 30);
    assert_eq!(document.race_control.as_ref().unwrap()[0].flag.as_deref(), Some("GREEN"));
    assert_eq!(document.starting_grid.as_ref().unwrap()[0].driver_number, 4);
}

#[tokio::test(start_paused = true)]
async fn test_drivers_failure_fails_the_session() {
    let transport = Arc::new(
        healthy_race().always("drivers?session_key=9994", Reply::Fail(network_error())),
    );
    let service = service_over(&transport);
    let options = SessionFetchOptions {
        include_laps: true,
        ..Default::default()
    };

    let envelope = get_complete_session_data(&service, &race_session(), &options).await;

    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.error.unwrap().root_cause().code(), "NETWORK_ERROR");
    assert_eq!(transport.calls_to("laps?session_key=9994"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_results_failure_fails_the_session() {
    let transport = Arc::new(
        healthy_race().always("session_result?session_key=9994", Reply::Json(json!({"detail": "bad"}))),
    );
    let service = service_over(&transport);

    let err = get_complete_session_data(&service, &race_session(), &SessionFetchOptions::default())
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_RESPONSE");
}

#[tokio::test(start_paused = true)]
async fn test_drivers_error_reported_first_when_both_fail() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .always("drivers?session_key=9994", Reply::Status(503, "Service Unavailable"))
            .always("session_result?session_key=9994", Reply::Status(400, "Bad Request")),
    );
    let service = service_over(&transport);

    let err = get_complete_session_data(&service, &race_session(), &SessionFetchOptions::default())
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(err.root_cause().code(), "SERVICE_UNAVAILABLE");
    assert_eq!(transport.calls_to("session_result?session_key=9994"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_inconsistent_results_are_kept() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .always("drivers?session_key=9994", Reply::Json(json!([{"driver_number": 1}, {"driver_number": 1}])))
            .always("session_result?session_key=9994", Reply::Json(race_results_json(9994))),
    );
    let service = service_over(&transport);

    let document = get_complete_session_data(&service, &race_session(), &SessionFetchOptions::default())
        .await
        .into_result()
        .unwrap();

    assert_eq!(document.drivers.len(), 2);
    assert_eq!(document.validate().len(), 1);
}
