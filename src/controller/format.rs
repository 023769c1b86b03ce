//! Response helpers shared by the controllers.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::Result;

/// Returns a JSON response.
///
/// # Errors
/// Currently infallible; the `Result` keeps handler signatures uniform.
pub fn json<T: Serialize>(t: T) -> Result<Response> {
    Ok(Json(t).into_response())
}

/// Returns an empty JSON object, `{}`.
///
/// # Errors
/// Currently infallible.
pub fn empty_json() -> Result<Response> {
    json(serde_json::json!({}))
}
