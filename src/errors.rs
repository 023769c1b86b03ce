//! # Application Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::ontology::{MarkupError, OntologyServiceError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// Resource lookup miss, rendered as 404 with the given description.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Ontology(#[from] OntologyServiceError),

    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Tera(#[from] tera::Error),

    #[error(transparent)]
    JSON(#[from] serde_json::Error),

    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Any(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Any(Box::new(err))
    }

    pub fn msg(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Message(err.to_string())
    }

    #[must_use]
    pub fn string(s: &str) -> Self {
        Self::Message(s.to_string())
    }

    /// HTTP status and short error code this error maps to.
    #[must_use]
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::Ontology(OntologyServiceError::SourceUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "source_unavailable")
            }
            Self::Ontology(OntologyServiceError::ExportFailed { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "export_failed")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error"),
        }
    }

    fn description(&self) -> String {
        match self {
            Self::Ontology(OntologyServiceError::ExportFailed { reason, .. }) => {
                format!("Export failed: {reason}")
            }
            Self::NotFound(description) | Self::BadRequest(description) => description.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub error: String,
    pub description: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!(err.msg = %self, err.detail = ?self, "controller_error");
        } else {
            tracing::debug!(err.msg = %self, "controller_rejection");
        }
        let body = ErrorDetail {
            error: code.to_string(),
            description: self.description(),
        };
        (status, Json(body)).into_response()
    }
}
