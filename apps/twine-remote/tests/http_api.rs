//! HTTP behaviour of the remote control
//!
//! The router is driven in-process with real filesystem and subprocess
//! adapters; `cat` and `sh` stand in for the Twine ingester.

#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use twine_remote::{routes::create_router, AppState};
use twine_remote_domain::{IngestCommand, IngestionConfig, IngestionService};
use twine_remote_process::{FilePayloadStore, ProcessIngestRunner};

struct TestServer {
    router: Router,
    data_dir: TempDir,
}

impl TestServer {
    fn with_command(command: IngestCommand) -> Self {
        Self::build(command, Duration::from_secs(30), 1024 * 1024)
    }

    fn build(command: IngestCommand, timeout: Duration, max_payload_size: usize) -> Self {
        Self::build_concurrent(command, timeout, max_payload_size, 1)
    }

    fn build_concurrent(
        command: IngestCommand,
        timeout: Duration,
        max_payload_size: usize,
        max_concurrent: usize,
    ) -> Self {
        let data_dir = tempfile::tempdir().expect("create payload dir");
        let service = IngestionService::new(
            FilePayloadStore::new(data_dir.path()),
            ProcessIngestRunner::new(timeout, max_concurrent),
            IngestionConfig {
                command,
                max_payload_size,
            },
        );

        Self {
            router: create_router(AppState::new(service)),
            data_dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String, Value) {
        let (status, content_type, body) = self.send_raw(request).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

        (status, content_type, json)
    }

    async fn send_raw(&self, request: Request<Body>) -> (StatusCode, String, Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| value.to_str().unwrap().to_string())
            .unwrap_or_default();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, content_type, body)
    }

    async fn post(&self, path: &str, body: impl Into<Body>) -> (StatusCode, String, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "text/x-nquads")
                .body(body.into())
                .unwrap(),
        )
        .await
    }

    fn leftover_payloads(&self) -> usize {
        payload_files(self.data_dir.path())
    }
}

fn payload_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

fn cat() -> IngestCommand {
    IngestCommand::new("cat", vec![])
}

fn sh(script: &str) -> IngestCommand {
    IngestCommand::new(
        "sh",
        vec!["-c".to_string(), script.to_string(), "sh".to_string()],
    )
}

#[tokio::test]
async fn get_any_path_returns_info_message() {
    let server = TestServer::with_command(cat());

    for path in ["/", "/status", "/ingest", "/update?all=true"] {
        let (status, content_type, body) = server
            .send(
                Request::builder()
                    .uri(path)
                    .header("X-Anything", "1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "GET {path}");
        assert_eq!(content_type, "text/json;charset=utf-8");
        assert_eq!(body, serde_json::json!({ "message": "Twine remote control" }));
    }
}

#[tokio::test]
async fn head_any_path_returns_info_headers() {
    let server = TestServer::with_command(cat());

    for path in ["/", "/ingest", "/status"] {
        let (status, content_type, body) = server
            .send_raw(
                Request::builder()
                    .method("HEAD")
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "HEAD {path}");
        assert_eq!(content_type, "text/json;charset=utf-8");
        assert!(body.is_empty(), "HEAD {path}");
    }
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn ingest_success_returns_command_and_logs() {
    let server = TestServer::with_command(cat());
    let payload = "<http://a> <http://b> <http://c> <http://g> .\n";

    let (status, content_type, body) = server.post("/ingest", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/json;charset=utf-8");
    assert_eq!(body["message"], "Ingest completed");
    // cat echoes the payload file, so logs prove the file matched the body
    assert_eq!(body["logs"], payload);

    let command = body["command"].as_str().unwrap();
    let expected_prefix = format!("cat {}/remote-data-", server.data_dir.path().display());
    assert!(command.starts_with(&expected_prefix), "{command}");
    assert!(command.ends_with(".nq"));
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn ingest_preserves_binary_payload() {
    let server = TestServer::with_command(sh("od -An -tx1 \"$1\" | tr -d ' \\n'"));

    let (status, _, body) = server.post("/ingest", vec![0x00u8, 0xff, 0x0a, 0x41]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"], "00ff0a41");
}

#[tokio::test]
async fn ingest_failure_returns_500_with_logs() {
    let server = TestServer::with_command(sh("echo 'line 1: bad quad' >&2; exit 4"));

    let (status, content_type, body) = server.post("/ingest", "garbage").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type, "text/json;charset=utf-8");
    assert_eq!(body["logs"], "line 1: bad quad\n");
    assert!(body.get("command").is_none());

    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Error: Command 'sh -c "), "{message}");
    assert!(message.ends_with("returned non-zero exit status 4."), "{message}");
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn post_to_unknown_path_is_not_found() {
    let server = TestServer::with_command(sh("echo ran > \"$(dirname \"$1\")/ran\""));

    let (status, _, body) = server.post("/upload", "<a> <b> <c> .\n").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Error: no handler for POST /upload");
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn sequential_ingests_each_see_their_own_body() {
    let server = TestServer::with_command(cat());

    let (first_status, _, first) = server.post("/ingest", "first\n").await;
    let (second_status, _, second) = server.post("/ingest", "second\n").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["logs"], "first\n");
    assert_eq!(second["logs"], "second\n");
    assert_ne!(first["command"], second["command"]);
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn concurrent_ingests_each_see_their_own_body() {
    let server = TestServer::build_concurrent(
        sh("sleep 0.2; cat \"$1\""),
        Duration::from_secs(30),
        1024,
        2,
    );

    let ((first_status, _, first), (second_status, _, second)) = tokio::join!(
        server.post("/ingest", "first\n"),
        server.post("/ingest", "second\n")
    );

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["logs"], "first\n");
    assert_eq!(second["logs"], "second\n");
    assert_ne!(first["command"], second["command"]);
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn abandoned_request_leaves_no_payload_file() {
    let marker = tempfile::tempdir().unwrap();
    let started = marker.path().join("started");
    let server = TestServer::with_command(sh(&format!(
        "touch '{}'; exec sleep 10",
        started.display()
    )));

    let abandoned =
        tokio::time::timeout(Duration::from_millis(500), server.post("/ingest", "x")).await;

    assert!(abandoned.is_err());
    assert!(started.exists());
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn empty_body_is_ingested() {
    let server = TestServer::with_command(sh("test -f \"$1\" && test ! -s \"$1\" && echo empty"));

    let (status, _, body) = server
        .send(
            Request::builder()
                .method("POST")
                .uri("/ingest")
                .header(header::CONTENT_LENGTH, "0")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"], "empty\n");
}

#[tokio::test]
async fn hanging_ingest_times_out() {
    let server = TestServer::build(
        sh("echo working; exec sleep 10"),
        Duration::from_millis(500),
        1024,
    );

    let (status, _, body) = server.post("/ingest", "x").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["logs"], "working\n");
    assert!(body["message"].as_str().unwrap().contains("timed out"));
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn missing_executable_is_reported() {
    let server = TestServer::with_command(IngestCommand::new("twine-remote-missing-binary", vec![]));

    let (status, _, body) = server.post("/ingest", "x").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(
        message.starts_with("Error: Failed to start 'twine-remote-missing-binary'"),
        "{message}"
    );
    assert!(body.get("logs").is_none());
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = TestServer::build(cat(), Duration::from_secs(30), 8);

    let (status, _, _) = server.post("/ingest", "0123456789abcdef").await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(server.leftover_payloads(), 0);
}

#[tokio::test]
async fn unsupported_methods_return_501() {
    let server = TestServer::with_command(cat());

    for path in ["/ingest", "/other"] {
        let (status, _, body) = server
            .send(
                Request::builder()
                    .method("DELETE")
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED, "DELETE {path}");
        assert_eq!(body["message"], "Error: unsupported method DELETE");
    }
}
