//! Meeting and season orchestration against a scripted Miami 2025 weekend

use serde_json::json;
use std::sync::Arc;

use f1_data_scraper::fetcher::FetcherError;
use f1_data_scraper::scraper::ScrapeOptions;
use f1_data_scraper::{GapToLeader, GrandPrixDocument, SessionKind};

use crate::support::scripted::{
    drivers_json, meeting_json, miami_weekend, network_error, race_results_json, scraper_over,
    session_json, Reply, ScriptedTransport,
};

#[tokio::test(start_paused = true)]
async fn test_end_to_end_meeting_1257() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);

    let envelope = scraper.scrape_grand_prix(1257, 2025, &ScrapeOptions::new()).await;
    assert!(envelope.success);
    let document = envelope.data.unwrap();

    let race = document.sessions.race.as_ref().unwrap();
    assert_eq!(race.results[0].position, Some(1));
    assert_eq!(race.drivers[0].driver_number, 1);
    assert_eq!(document.metadata.season, 2025);
    assert_eq!(document.metadata.round, 57);
    assert_eq!(document.meeting.meeting_name, "Miami Grand Prix");
}

#[tokio::test(start_paused = true)]
async fn test_without_filter_every_recognized_session_is_present() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);

    let document = scraper
        .scrape_grand_prix(1257, 2025, &ScrapeOptions::new())
        .await
        .into_result()
        .unwrap();

    assert_eq!(
        document.sessions.keys(),
        vec![
            SessionKind::Practice1,
            SessionKind::Qualifying,
            SessionKind::Sprint,
            SessionKind::Race
        ]
    );
    // "Sprint Qualifying" has no slot and is never fetched
    assert_eq!(transport.calls_to("drivers?session_key=9988"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_race_filter_keeps_only_race() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let options = ScrapeOptions::new().with_session_types(["Race"]);

    let document = scraper.scrape_grand_prix(1257, 2025, &options).await.into_result().unwrap();

    assert_eq!(document.sessions.keys(), vec![SessionKind::Race]);
    assert!(document.sessions.sprint.is_none());
    assert_eq!(transport.calls_to("drivers?session_key=9989"), 0);

    let value = serde_json::to_value(&document).unwrap();
    let keys: Vec<&String> = value["sessions"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["race"]);
}

#[tokio::test(start_paused = true)]
async fn test_null_result_flags_keep_the_session() {
    let transport = Arc::new(miami_weekend().always(
        "session_result?session_key=9994",
        Reply::Json(json!([
            {"driver_number": 1, "position": 1, "dnf": null, "number_of_laps": 57}
        ])),
    ));
    let scraper = scraper_over(&transport);
    let options = ScrapeOptions::new().with_session_types(["Race"]);

    let document = scraper.scrape_grand_prix(1257, 2025, &options).await.into_result().unwrap();

    let race = document.sessions.race.as_ref().unwrap();
    assert_eq!(race.results.len(), 1);
    assert!(race.results[0].dnf.is_none());
    assert!(race.results[0].is_classified());
}

#[tokio::test(start_paused = true)]
async fn test_starting_grid_only_for_race_type_sessions() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);

    let document = scraper
        .scrape_grand_prix(1257, 2025, &ScrapeOptions::new())
        .await
        .into_result()
        .unwrap();

    assert!(document.sessions.race.as_ref().unwrap().starting_grid.is_some());
    assert!(document.sessions.sprint.as_ref().unwrap().starting_grid.is_some());
    assert!(document.sessions.qualifying.as_ref().unwrap().starting_grid.is_none());
    assert!(document.sessions.practice1.as_ref().unwrap().starting_grid.is_none());
    assert_eq!(transport.calls_to("starting_grid?session_key=9990"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_extras_follow_options() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let options = ScrapeOptions::new().with_session_types(["Qualifying"]).with_laps(true);

    let document = scraper.scrape_grand_prix(1257, 2025, &options).await.into_result().unwrap();
    let qualifying = document.sessions.qualifying.as_ref().unwrap();

    assert!(qualifying.laps.is_some());
    assert!(qualifying.stints.is_none());
    assert!(qualifying.pits.is_none());
    assert!(qualifying.race_control.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_failed_session_is_left_out() {
    let transport = Arc::new(
        miami_weekend().always("drivers?session_key=9987", Reply::Status(404, "Not Found")),
    );
    let scraper = scraper_over(&transport);

    let document = scraper
        .scrape_grand_prix(1257, 2025, &ScrapeOptions::new())
        .await
        .into_result()
        .unwrap();

    assert!(document.sessions.practice1.is_none());
    assert!(document.sessions.race.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_session_from_other_meeting_is_dropped() {
    let transport = Arc::new(miami_weekend().always(
        "sessions?meeting_key=1257",
        Reply::Json(json!([
            session_json(9994, 1257, "Race", "Race"),
            session_json(9000, 1256, "Qualifying", "Qualifying"),
        ])),
    ));
    let scraper = scraper_over(&transport);

    let document = scraper
        .scrape_grand_prix(1257, 2025, &ScrapeOptions::new())
        .await
        .into_result()
        .unwrap();

    assert_eq!(document.sessions.keys(), vec![SessionKind::Race]);
    assert_eq!(transport.calls_to("drivers?session_key=9000"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_absent_meeting_key_is_no_data() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);

    let err = scraper
        .scrape_grand_prix(4242, 2025, &ScrapeOptions::new())
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(err.code(), "SCRAPE_FAILED");
    assert!(matches!(err.root_cause(), FetcherError::NoData { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_session_listing_failure_fails_the_meeting() {
    let transport = Arc::new(miami_weekend().always("sessions?meeting_key=1257", Reply::Fail(network_error())));
    let scraper = scraper_over(&transport);

    let envelope = scraper.scrape_grand_prix(1257, 2025, &ScrapeOptions::new()).await;

    assert!(!envelope.success);
    let err = envelope.error.unwrap();
    assert_eq!(err.code(), "SCRAPE_FAILED");
    assert_eq!(err.root_cause().code(), "NETWORK_ERROR");
}

#[tokio::test(start_paused = true)]
async fn test_latest_grand_prix() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let options = ScrapeOptions::new().with_session_types(["Race"]);

    let document = scraper.scrape_latest_grand_prix(&options).await.into_result().unwrap();

    assert_eq!(document.meeting.meeting_key, 1257);
    assert!(document.sessions.race.is_some());
    assert_eq!(transport.calls_to("meetings?year=2025"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_latest_grand_prix_without_meeting_fails() {
    let transport = Arc::new(ScriptedTransport::new().always("meetings?meeting_key=latest", Reply::Json(json!([]))));
    let scraper = scraper_over(&transport);

    let err = scraper
        .scrape_latest_grand_prix(&ScrapeOptions::new())
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(err.code(), "SCRAPE_FAILED");
    assert_eq!(err.root_cause().code(), "NO_DATA");
}

#[tokio::test(start_paused = true)]
async fn test_season_keeps_only_successful_meetings() {
    // 1256 has no scripted sessions, so its listing keeps returning 404
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);
    let options = ScrapeOptions::new().with_session_types(["Race"]);

    let documents = scraper.scrape_season(2025, &options).await.into_result().unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].meeting.meeting_key, 1257);
    assert_eq!(transport.calls_to("sessions?meeting_key=1256"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_season_processes_meetings_in_listing_order() {
    let transport = Arc::new(
        miami_weekend()
            .always("sessions?meeting_key=1256", Reply::Json(json!([session_json(9900, 1256, "Race", "Race")])))
            .always("drivers?session_key=9900", Reply::Json(drivers_json(9900)))
            .always("session_result?session_key=9900", Reply::Json(race_results_json(9900))),
    );
    let scraper = scraper_over(&transport);
    let options = ScrapeOptions::new().with_session_types(["Race"]);

    let documents = scraper.scrape_season(2025, &options).await.into_result().unwrap();

    let keys: Vec<u32> = documents.iter().map(|d| d.meeting.meeting_key).collect();
    assert_eq!(keys, vec![1256, 1257]);
}

#[tokio::test(start_paused = true)]
async fn test_season_listing_failure_fails() {
    let transport = Arc::new(ScriptedTransport::new().always("meetings?year=2030", Reply::Json(json!([]))));
    let scraper = scraper_over(&transport);

    let envelope = scraper.scrape_season(2030, &ScrapeOptions::new()).await;

    assert!(!envelope.success);
    assert_eq!(envelope.error.unwrap().root_cause().code(), "NO_DATA");
}

#[tokio::test(start_paused = true)]
async fn test_document_survives_json_round_trip() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);

    let document = scraper
        .scrape_grand_prix(1257, 2025, &ScrapeOptions::new().all_extras())
        .await
        .into_result()
        .unwrap();

    let encoded = serde_json::to_string(&document).unwrap();
    let decoded: GrandPrixDocument = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, document);

    let race = decoded.sessions.race.as_ref().unwrap();
    assert_eq!(race.results[1].gap_to_leader, Some(GapToLeader::Laps("+1 LAP".to_string())));
    let qualifying = decoded.sessions.qualifying.as_ref().unwrap();
    assert_eq!(
        qualifying.results[0].gap_to_leader,
        Some(GapToLeader::Segments(vec![Some(0.0), Some(0.0), Some(0.0)]))
    );
}

#[tokio::test(start_paused = true)]
async fn test_consumer_fields_are_present() {
    let transport = Arc::new(miami_weekend());
    let scraper = scraper_over(&transport);

    let document = scraper
        .scrape_grand_prix(1257, 2025, &ScrapeOptions::new().with_session_types(["Race"]))
        .await
        .into_result()
        .unwrap();
    let value = serde_json::to_value(&document).unwrap();

    for field in ["meeting_name", "location", "country_name", "circuit_short_name", "date_start"] {
        assert!(!value["meeting"][field].is_null(), "missing meeting.{field}");
    }
    let driver = &value["sessions"]["race"]["drivers"][0];
    for field in ["driver_number", "full_name", "name_acronym", "team_name"] {
        assert!(!driver[field].is_null(), "missing driver {field}");
    }
    let result = &value["sessions"]["race"]["results"][0];
    for field in ["position", "driver_number", "gap_to_leader", "dnf", "number_of_laps"] {
        assert!(!result[field].is_null(), "missing result {field}");
    }
    assert!(value["metadata"]["scraped_at"].is_string());
}

#[test]
fn test_meeting_record_decodes_official_name() {
    let meeting: f1_data_scraper::Meeting = serde_json::from_value(meeting_json(1257, "Miami Grand Prix")).unwrap();
    assert_eq!(
        meeting.meeting_official_name.as_deref(),
        Some("FORMULA 1 MIAMI GRAND PRIX 2025")
    );
}
