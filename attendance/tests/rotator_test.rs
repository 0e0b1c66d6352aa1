mod support;

use attendance::location::LocationProvider;
use attendance::notifier::Notifier;
use attendance::rotator::{LocationReporter, TokenRotator};
use attendance::{AttendanceError, LocationError, Position, PositionErrorReason, RotatingToken};
use std::sync::Arc;
use std::time::Duration;
use support::{EventLog, Fix, MockPosition, MockServer, RecordingDisplay};

fn bangalore() -> Position {
    Position::new(12.971598, 77.594566).unwrap()
}

fn reporter(log: &EventLog, position: Arc<MockPosition>, server: Arc<MockServer>) -> LocationReporter {
    let display = RecordingDisplay::new(log);
    LocationReporter::new(
        LocationProvider::new(position),
        server,
        display.clone(),
        Notifier::new(display),
    )
}

#[tokio::test(start_paused = true)]
async fn starting_tracking_twice_runs_a_single_loop() {
    let log = EventLog::default();
    let server = MockServer::new(&log);
    let mut reporter = reporter(&log, MockPosition::always(Fix::At(bangalore()), &log), server.clone());

    assert!(reporter.start_tracking("Bus-10"));
    assert!(!reporter.start_tracking("Bus-10"));
    assert!(reporter.is_running());

    tokio::time::sleep(Duration::from_secs(35)).await;

    assert_eq!(server.updates.lock().unwrap().len(), 3);
    assert_eq!(log.count("toast.success:GPS Tracking Started"), 1);
}

#[tokio::test(start_paused = true)]
async fn each_tick_shows_coordinates_then_sends_update() {
    let log = EventLog::default();
    let server = MockServer::new(&log);
    let mut reporter = reporter(&log, MockPosition::always(Fix::At(bangalore()), &log), server.clone());

    reporter.start_tracking("Bus-10");
    tokio::time::sleep(Duration::from_millis(10_500)).await;

    let entries = log.entries();
    let status = log.position_of("status:").unwrap();
    let update = log.position_of("server.update:").unwrap();
    assert_eq!(entries[status], "status:Lat: 12.9716, Lng: 77.5946");
    assert!(status < update);

    let updates = server.updates.lock().unwrap();
    assert_eq!(updates[0].bus_no, "Bus-10");
    assert_eq!(updates[0].lat, 12.971598);
    assert_eq!(updates[0].lng, 77.594566);
}

#[tokio::test(start_paused = true)]
async fn failed_ticks_are_reported_and_the_loop_keeps_going() {
    let log = EventLog::default();
    let server = MockServer::new(&log);
    server.update_fails.lock().unwrap().extend([false, true, false]);
    let position = MockPosition::sequence(
        vec![
            Fix::Fails(LocationError::Position(PositionErrorReason::PermissionDenied)),
            Fix::At(bangalore()),
            Fix::At(bangalore()),
        ],
        Fix::At(bangalore()),
        &log,
    );
    let mut reporter = reporter(&log, position, server.clone());

    reporter.start_tracking("Bus-10");
    tokio::time::sleep(Duration::from_secs(45)).await;

    // Tick 1: location denied. Tick 2: update ok. Tick 3: update fails. Tick 4: ok.
    assert!(reporter.is_running());
    assert_eq!(log.count("location.fix"), 4);
    assert_eq!(server.updates.lock().unwrap().len(), 3);
    assert_eq!(log.count("status:GPS Error: User denied Geolocation"), 1);
    assert_eq!(log.count("status:GPS Error: Network error: connection reset"), 1);
    assert_eq!(log.count("toast.error:GPS Error:"), 2);
}

#[tokio::test(start_paused = true)]
async fn location_timeout_fails_the_tick_not_the_loop() {
    let log = EventLog::default();
    let server = MockServer::new(&log);
    let position = MockPosition::sequence(vec![Fix::Never], Fix::At(bangalore()), &log);
    let mut reporter = reporter(&log, position, server.clone());

    reporter.start_tracking("Bus-10");
    tokio::time::sleep(Duration::from_secs(25)).await;

    assert_eq!(log.count("status:GPS Error: Timeout expired"), 1);
    assert_eq!(server.updates.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_tracking_halts_reports() {
    let log = EventLog::default();
    let server = MockServer::new(&log);
    let mut reporter = reporter(&log, MockPosition::always(Fix::At(bangalore()), &log), server.clone());

    reporter.start_tracking("Bus-10");
    tokio::time::sleep(Duration::from_secs(15)).await;
    reporter.stop();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert!(!reporter.is_running());
    assert_eq!(server.updates.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rotation_clears_before_rendering_and_captions_short_code() {
    let log = EventLog::default();
    let server = MockServer::new(&log);
    server.tokens.lock().unwrap().extend([
        Ok(RotatingToken::new("Bus-10_A1B2")),
        Ok(RotatingToken::new("Bus-10_C3D4")),
    ]);
    let mut rotator = TokenRotator::new(server.clone(), RecordingDisplay::new(&log));

    assert!(rotator.start_rotation());
    assert!(!rotator.start_rotation());
    tokio::time::sleep(Duration::from_secs(21)).await;

    let code_events: Vec<String> = log
        .entries()
        .into_iter()
        .filter(|e| e.starts_with("code."))
        .collect();
    assert_eq!(
        code_events,
        vec![
            "code.clear",
            "code.render:Bus-10_A1B2",
            "code.caption:Refresh in 10s... Code: A1B2",
            "code.clear",
            "code.render:Bus-10_C3D4",
            "code.caption:Refresh in 10s... Code: C3D4",
        ]
    );
    assert_eq!(log.count("server.token"), 2);
}

#[tokio::test(start_paused = true)]
async fn rotation_failure_keeps_previous_code_and_continues() {
    let log = EventLog::default();
    let server = MockServer::new(&log);
    server.tokens.lock().unwrap().extend([
        Ok(RotatingToken::new("Bus-10_A1B2")),
        Err(AttendanceError::NetworkFailure("timeout".into())),
        Ok(RotatingToken::new("NODELIMITER")),
    ]);
    let mut rotator = TokenRotator::new(server.clone(), RecordingDisplay::new(&log));

    rotator.start_rotation();
    tokio::time::sleep(Duration::from_secs(31)).await;

    assert!(rotator.is_running());
    assert_eq!(log.count("server.token"), 3);
    assert_eq!(log.count("code.clear"), 2);
    assert_eq!(log.count("code.caption:Refresh in 10s... Code: NODELIMITER"), 1);
    assert_eq!(log.count("toast."), 0);
}
