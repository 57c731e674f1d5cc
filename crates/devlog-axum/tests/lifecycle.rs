//! End-to-end tests for `launch`.
//!
//! Each test starts a real server on an OS-assigned port inside a temporary
//! data directory and talks to it over HTTP.

mod common;

use std::fs;
use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use axum::Router;
use axum::http::StatusCode as AxumStatus;
use axum::routing::get;
use reqwest::{Method, StatusCode, header};
use serde_json::{Value, json};
use tempfile::tempdir;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use common::{Behavior, RecordingSignaler, client};
use devlog_axum::{LaunchError, ServerConfig, launch, launch_with_router};
use devlog_runtime::{SelfCheckError, TakeoverOutcome};

#[tokio::test]
async fn launch_serves_health_and_writes_records() {
    let tmp = tempdir().unwrap();
    let signaler = RecordingSignaler::new(Behavior::Dead);

    let server = launch(ServerConfig::new(tmp.path()), &signaler)
        .await
        .expect("launch failed");

    assert_ne!(server.port(), 0);
    assert_eq!(server.pid(), std::process::id());
    assert_eq!(server.takeover(), TakeoverOutcome::NoRecord);
    assert_eq!(
        fs::read_to_string(tmp.path().join("pid.txt")).unwrap(),
        std::process::id().to_string()
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("port.txt")).unwrap(),
        server.port().to_string()
    );

    let response = client()
        .get(format!("{}/health", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    server.shutdown().await.expect("shutdown failed");
}

#[tokio::test]
async fn launch_starts_with_empty_log() {
    let tmp = tempdir().unwrap();
    let log_file = tmp.path().join("dev-logs.json");
    fs::write(&log_file, r#"[{"from":"previous run"}]"#).unwrap();

    let server = launch(ServerConfig::new(tmp.path()), &RecordingSignaler::new(Behavior::Dead))
        .await
        .unwrap();

    assert!(!log_file.exists());
    let logs: Value = client()
        .get(format!("{}/logs", server.base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(logs, json!([]));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn launch_signals_recorded_live_instance() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("pid.txt"), "4242").unwrap();
    let signaler = RecordingSignaler::new(Behavior::ExitsOnTerm);

    let server = launch(ServerConfig::new(tmp.path()), &signaler)
        .await
        .unwrap();

    assert_eq!(signaler.terminated(), vec![4242]);
    assert!(signaler.killed().is_empty());
    assert_eq!(server.takeover(), TakeoverOutcome::Signaled { pid: 4242 });
    assert_eq!(
        fs::read_to_string(server.paths().pid_file()).unwrap(),
        std::process::id().to_string()
    );

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn launch_skips_recorded_dead_instance() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("pid.txt"), "4242\n").unwrap();
    let signaler = RecordingSignaler::new(Behavior::Dead);

    let server = launch(ServerConfig::new(tmp.path()), &signaler)
        .await
        .unwrap();

    assert!(signaler.terminated().is_empty());
    assert_eq!(server.takeover(), TakeoverOutcome::NotRunning { pid: 4242 });

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn posted_entries_reach_disk_and_read_back() {
    let tmp = tempdir().unwrap();
    let server = launch(ServerConfig::new(tmp.path()), &RecordingSignaler::new(Behavior::Dead))
        .await
        .unwrap();
    let http = client();

    let response = http
        .post(format!("{}/logs", server.base_url()))
        .json(&json!([
            { "sessionId": "s1", "type": "state", "data": { "count": 1 } },
            { "sessionId": "s1", "type": "event" }
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "success": true })
    );

    let response = http
        .post(server.base_url())
        .json(&json!({ "sessionId": "s2", "type": "state" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logs: Value = http
        .get(format!("{}/logs", server.base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let expected = json!([
        { "sessionId": "s1", "type": "state", "data": { "count": 1 } },
        { "sessionId": "s1", "type": "event" },
        { "sessionId": "s2", "type": "state" }
    ]);
    assert_eq!(logs, expected);

    let on_disk = fs::read_to_string(tmp.path().join("dev-logs.json")).unwrap();
    assert!(on_disk.starts_with("[\n  {"));
    assert_eq!(serde_json::from_str::<Value>(&on_disk).unwrap(), expected);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn preflight_over_the_wire() {
    let tmp = tempdir().unwrap();
    let server = launch(ServerConfig::new(tmp.path()), &RecordingSignaler::new(Behavior::Dead))
        .await
        .unwrap();

    let response = client()
        .request(Method::OPTIONS, format!("{}/logs", server.base_url()))
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert!(response.bytes().await.unwrap().is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_serving() {
    let tmp = tempdir().unwrap();
    let server = launch(ServerConfig::new(tmp.path()), &RecordingSignaler::new(Behavior::Dead))
        .await
        .unwrap();
    let health_url = format!("{}/health", server.base_url());

    server.shutdown().await.expect("graceful shutdown failed");

    assert!(client().get(&health_url).send().await.is_err());
    // Records are left for the next instance to inspect.
    assert!(tmp.path().join("pid.txt").exists());
    assert!(tmp.path().join("port.txt").exists());
}

#[tokio::test]
async fn unusable_data_dir_is_fatal() {
    let tmp = tempdir().unwrap();
    let not_a_dir = tmp.path().join("file");
    fs::write(&not_a_dir, "x").unwrap();

    let result = launch(ServerConfig::new(&not_a_dir), &RecordingSignaler::new(Behavior::Dead)).await;

    assert!(matches!(result, Err(LaunchError::DataDir(_))));
}

#[tokio::test]
async fn bind_failure_is_fatal() {
    let tmp = tempdir().unwrap();
    // TEST-NET-3: never assigned to a local interface.
    let host: IpAddr = "203.0.113.7".parse().unwrap();

    let result = launch(
        ServerConfig::new(tmp.path()).with_host(host),
        &RecordingSignaler::new(Behavior::Dead),
    )
    .await;

    assert!(
        matches!(result, Err(LaunchError::Bind { .. })),
        "expected bind failure"
    );
    assert!(!tmp.path().join("port.txt").exists());
}

#[tokio::test]
async fn instance_ignoring_sigterm_is_killed_before_log_is_cleared() {
    let tmp = tempdir().unwrap();
    let log_file = tmp.path().join("dev-logs.json");
    fs::write(&log_file, r#"[{"from":"old session"}]"#).unwrap();
    fs::write(tmp.path().join("pid.txt"), "4242").unwrap();
    let grace = Duration::from_millis(200);
    let signaler = RecordingSignaler::new(Behavior::IgnoresTerm).with_witness(&log_file);

    let started = Instant::now();
    let server = launch(
        ServerConfig::new(tmp.path()).with_takeover_grace(grace),
        &signaler,
    )
    .await
    .unwrap();

    assert_eq!(signaler.terminated(), vec![4242]);
    assert_eq!(signaler.killed(), vec![4242]);
    assert_eq!(server.takeover(), TakeoverOutcome::Killed { pid: 4242 });
    assert!(started.elapsed() >= grace);
    // The old log was still there when the old instance was confirmed gone,
    // so the clear happened strictly afterwards.
    assert_eq!(signaler.witness_seen_at_exit(), Some(true));
    assert!(!log_file.exists());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_drain_is_bounded_by_open_requests() {
    let tmp = tempdir().unwrap();
    let server = launch(ServerConfig::new(tmp.path()), &RecordingSignaler::new(Behavior::Dead))
        .await
        .unwrap();
    let port = server.port();

    // A request whose body never finishes arriving.
    let mut stalled = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    stalled
        .write_all(
            b"POST /logs HTTP/1.1\r\nhost: localhost\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"from\":",
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let limit = Duration::from_millis(300);
    let started = Instant::now();
    let err = server
        .shutdown_within(limit)
        .await
        .expect_err("drain should time out while a request is open");

    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    assert!(started.elapsed() >= limit);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    drop(stalled);
}

#[tokio::test]
async fn failed_self_check_stops_the_server() {
    let tmp = tempdir().unwrap();

    let result = launch_with_router(
        ServerConfig::new(tmp.path()),
        &RecordingSignaler::new(Behavior::Dead),
        |_ctx| Router::new().route("/health", get(|| async { AxumStatus::SERVICE_UNAVAILABLE })),
    )
    .await;

    assert!(
        matches!(
            result,
            Err(LaunchError::SelfCheck(SelfCheckError::Status(503)))
        ),
        "expected self-check failure"
    );

    // The port was recorded before the probe; nothing listens there any more.
    let port: u16 = fs::read_to_string(tmp.path().join("port.txt"))
        .unwrap()
        .parse()
        .unwrap();
    assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
}
