//! Service information, health and readiness routes. These are mounted at the
//! root, outside the API prefix, so load balancers can reach them directly.

use std::sync::Arc;

use axum::{extract::State, response::Response, routing::get};
use serde::Serialize;

use super::{format, routes::Routes};
use crate::{app::AppContext, Result};

pub const SERVICE_NAME: &str = "ontology-parse-api";

#[derive(Serialize)]
pub struct Info {
    pub message: String,
    pub version: String,
    pub api_prefix: String,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct Readiness {
    pub ok: bool,
    pub terms: usize,
}

/// Describes the running service.
///
/// # Errors
/// Never fails.
pub async fn info(State(ctx): State<AppContext>) -> Result<Response> {
    format::json(Info {
        message: "Welcome to Ontology Parse API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_prefix: ctx.config.server.api_prefix.clone(),
    })
}

/// Liveness probe. Does not touch the ontology.
///
/// # Errors
/// Never fails.
pub async fn health() -> Result<Response> {
    format::json(Health {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

/// Reports whether a snapshot can be served, building one if needed.
///
/// # Errors
/// All errors are logged, and the readiness status is returned as a JSON response.
pub async fn readiness(State(ctx): State<AppContext>) -> Result<Response> {
    let service = Arc::clone(&ctx.ontology);
    let snapshot = tokio::task::spawn_blocking(move || service.snapshot()).await;

    let readiness = match snapshot {
        Ok(Ok(graph)) => Readiness {
            ok: true,
            terms: graph.len(),
        },
        Ok(Err(error)) => {
            tracing::error!(err.msg = %error, err.detail = ?error, "readiness_ontology_error");
            Readiness { ok: false, terms: 0 }
        }
        Err(error) => {
            tracing::error!(err.msg = %error, err.detail = ?error, "readiness_join_error");
            Readiness { ok: false, terms: 0 }
        }
    };
    format::json(readiness)
}

/// Defines and returns the monitoring routes.
pub fn routes() -> Routes {
    Routes::new()
        .add("/", get(info))
        .add("/health", get(health))
        .add("/_readiness", get(readiness))
}
