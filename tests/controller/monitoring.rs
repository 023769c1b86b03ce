use axum::http::StatusCode;
use serde_json::Value;

use crate::{fixture_server, server_for, test_config};

#[tokio::test]
async fn root_describes_the_service() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Welcome to Ontology Parse API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["api_prefix"], "/api/v1");
}

#[tokio::test]
async fn health_does_not_need_the_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, ctx) =
        server_for(test_config(dir.path().join("absent.owl"), dir.path())).await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ontology-parse-api");
    assert_eq!(ctx.ontology.build_count(), 0);
}

#[tokio::test]
async fn readiness_reports_term_count() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let body: Value = server.get("/_readiness").await.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["terms"], 6);
}

#[tokio::test]
async fn readiness_fails_softly_without_a_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) =
        server_for(test_config(dir.path().join("absent.owl"), dir.path())).await;

    let response = server.get("/_readiness").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
    assert_eq!(body["terms"], 0);
}
