use axum::http::StatusCode;
use ontograph::ontology::{ConceptNode, ExportDocument, GraphStatistics};
use serde_json::Value;

use crate::{fixture_document, fixture_server, server_for, test_config};

#[tokio::test]
async fn lists_every_term_in_document_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server.get("/api/v1/ontology/terms").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let terms: Vec<Value> = response.json();
    assert_eq!(terms.len(), 6);
    assert_eq!(terms[0]["id"], "MS:1000031");
    assert_eq!(terms[0]["label_zh"], "仪器型号");
    assert_eq!(terms[0]["isLeaf"], false);
    assert_eq!(terms[0]["children"][0]["childId"], "MS:1000463");
    assert_eq!(terms[0]["children"][0]["relationType"], "subClassOf");
}

#[tokio::test]
async fn returns_one_term() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server.get("/api/v1/ontology/terms/MS:1000458").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let term: ConceptNode = response.json();
    assert_eq!(term.label(), Some("source"));
    assert_eq!(term.parents()[0].parent_id, "MS:1000463");
    assert_eq!(term.parents()[0].relation_type.as_str(), "partOf");
}

#[tokio::test]
async fn unknown_term_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server.get("/api/v1/ontology/terms/MS:9999999").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["description"], "Term with ID 'MS:9999999' not found");
}

#[tokio::test]
async fn search_is_not_mistaken_for_a_term_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server
        .get("/api/v1/ontology/terms/search")
        .add_query_param("q", "仪器")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let hits: Vec<ConceptNode> = response.json();
    let ids: Vec<_> = hits.iter().map(ConceptNode::id).collect();
    assert_eq!(ids, vec!["MS:1000031", "MS:1000463"]);
}

#[tokio::test]
async fn search_without_query_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server.get("/api/v1/ontology/terms/search").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_query_matches_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let hits: Vec<Value> = server
        .get("/api/v1/ontology/terms/search")
        .add_query_param("q", "")
        .await
        .json();
    assert_eq!(hits.len(), 6);
}

#[tokio::test]
async fn stats_use_wire_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server.get("/api/v1/ontology/stats").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let raw: Value = response.json();
    assert_eq!(raw["subClassOf_relations"], 3);
    assert_eq!(raw["partOf_relations"], 1);

    let stats: GraphStatistics = response.json();
    assert_eq!(stats.total_terms, 6);
    assert_eq!(stats.total_relations, 4);
    assert_eq!(stats.leaf_nodes, 2);
}

#[tokio::test]
async fn requests_share_one_build() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, ctx) = fixture_server(dir.path()).await;

    server.get("/api/v1/ontology/terms").await;
    server.get("/api/v1/ontology/stats").await;
    server.get("/api/v1/ontology/terms/MS:1000031").await;
    assert_eq!(ctx.ontology.build_count(), 1);

    let response = server.post("/api/v1/ontology/cache/clear").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);

    server.get("/api/v1/ontology/terms").await;
    assert_eq!(ctx.ontology.build_count(), 2);
}

#[tokio::test]
async fn export_writes_into_the_export_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) = fixture_server(dir.path()).await;

    let response = server.post("/api/v1/ontology/export").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Ontology data exported successfully");
    assert_eq!(body["status"], "success");

    let path = std::path::PathBuf::from(body["file_path"].as_str().expect("file path"));
    assert!(path.starts_with(dir.path()));
    let document = ExportDocument::read(&path).expect("read export");
    assert_eq!(document.metadata.total_nodes, 6);
    assert!(document.nodes.contains_key("UO_0000000"));
}

#[tokio::test]
async fn export_failure_is_a_server_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").expect("write blocker");
    let (server, _ctx) = server_for(test_config(fixture_document(), &blocker)).await;

    let response = server.post("/api/v1/ontology/export").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["description"]
        .as_str()
        .is_some_and(|d| d.starts_with("Export failed: ")));
}

#[tokio::test]
async fn missing_document_is_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (server, _ctx) =
        server_for(test_config(dir.path().join("absent.owl"), dir.path())).await;

    let response = server.get("/api/v1/ontology/terms").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let response = server.get("/api/v1/ontology/stats").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}
