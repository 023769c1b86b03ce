//! Ontology term routes, mounted under `<api_prefix>/ontology`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppContext,
    controller::{format, Routes},
    ontology::{OntologyService, OntologyServiceError},
    Error, Result,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub message: String,
    pub file_path: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheCleared {
    pub ok: bool,
}

/// Runs a service call off the async runtime; rebuilds parse the whole document.
async fn with_service<T, F>(ctx: &AppContext, call: F) -> Result<T>
where
    F: FnOnce(&OntologyService) -> std::result::Result<T, OntologyServiceError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&ctx.ontology);
    let outcome = tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(Error::wrap)?;
    Ok(outcome?)
}

/// Lists every term.
///
/// # Errors
/// 503 when the ontology cannot be loaded.
pub async fn list(State(ctx): State<AppContext>) -> Result<Response> {
    format::json(with_service(&ctx, OntologyService::get_all).await?)
}

/// Returns one term, or 404.
///
/// # Errors
/// 404 for an unknown id, 503 when the ontology cannot be loaded.
pub async fn get_one(
    State(ctx): State<AppContext>,
    Path(term_id): Path<String>,
) -> Result<Response> {
    let lookup = term_id.clone();
    let term = with_service(&ctx, move |service| service.get_by_id(&lookup)).await?;
    match term {
        Some(term) => format::json(term),
        None => Err(Error::NotFound(format!("Term with ID '{term_id}' not found"))),
    }
}

/// Case-insensitive search over labels and definitions.
///
/// # Errors
/// 400 without `q`, 503 when the ontology cannot be loaded.
pub async fn search(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let query = params
        .q
        .ok_or_else(|| Error::BadRequest("query parameter `q` is required".to_string()))?;
    format::json(with_service(&ctx, move |service| service.search(&query)).await?)
}

/// Writes the snapshot to the configured export directory.
///
/// # Errors
/// 500 with `Export failed: ...` when the file cannot be written.
pub async fn export(State(ctx): State<AppContext>) -> Result<Response> {
    let path = with_service(&ctx, |service| service.export_snapshot(None)).await?;
    format::json(ExportResponse {
        message: "Ontology data exported successfully".to_string(),
        file_path: path.display().to_string(),
        status: "success".to_string(),
    })
}

/// # Errors
/// 503 when the ontology cannot be loaded.
pub async fn stats(State(ctx): State<AppContext>) -> Result<Response> {
    format::json(with_service(&ctx, OntologyService::statistics).await?)
}

/// # Errors
/// Never fails.
pub async fn clear_cache(State(ctx): State<AppContext>) -> Result<Response> {
    ctx.ontology.clear_cache();
    format::json(CacheCleared { ok: true })
}

pub fn routes() -> Routes {
    Routes::new()
        .prefix("ontology")
        .add("/terms", get(list))
        .add("/terms/search", get(search))
        .add("/terms/{term_id}", get(get_one))
        .add("/export", post(export))
        .add("/stats", get(stats))
        .add("/cache/clear", post(clear_cache))
}
