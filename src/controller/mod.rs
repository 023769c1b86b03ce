//! Transport boundary: the HTTP routes exposing the ontology service.
//!
//! Routes are grouped in [`Routes`] values and assembled into an axum
//! [`Router`] by [`AppRoutes`]. Handlers return [`crate::Result`], so any
//! [`crate::Error`] becomes a JSON error response with the matching status.

use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{app::AppContext, config, Result};

pub mod format;
pub mod monitoring;
pub mod ontology;
mod routes;

pub use routes::{Handler, Routes};

/// A route as listed at boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoutes {
    pub uri: String,
}

/// All route groups of the application.
#[derive(Default)]
pub struct AppRoutes {
    prefix: Option<String>,
    routes: Vec<Routes>,
}

impl AppRoutes {
    /// Routes for monitoring and service information.
    #[must_use]
    pub fn with_default_routes() -> Self {
        Self::empty().add_route(monitoring::routes())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the prefix applied to every group added afterwards.
    #[must_use]
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    #[must_use]
    pub fn add_route(mut self, mut route: Routes) -> Self {
        let prefix = join_paths(self.prefix.as_deref(), route.prefix.as_deref());
        route.prefix = (!prefix.is_empty()).then_some(prefix);
        self.routes.push(route);
        self
    }

    /// Full URIs of every handler, in registration order.
    #[must_use]
    pub fn collect(&self) -> Vec<ListRoutes> {
        self.routes
            .iter()
            .flat_map(|group| {
                group.handlers.iter().map(|handler| ListRoutes {
                    uri: join_paths(group.prefix.as_deref(), Some(handler.uri.as_str())),
                })
            })
            .collect()
    }

    /// Builds the axum router with tracing and CORS layers.
    ///
    /// # Errors
    /// Fails when a configured CORS origin is not a valid header value.
    pub fn to_router(&self, ctx: AppContext) -> Result<Router> {
        let mut router = Router::new();
        for group in &self.routes {
            for handler in &group.handlers {
                let uri = join_paths(group.prefix.as_deref(), Some(handler.uri.as_str()));
                tracing::debug!(uri = %uri, "route_registered");
                router = router.route(&uri, handler.method.clone());
            }
        }
        let cors = cors_layer(&ctx.config.server)?;
        Ok(router
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(ctx))
    }
}

fn cors_layer(server: &config::Server) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if server.cors_allow_origins.iter().any(|origin| origin == "*") {
        return Ok(layer.allow_origin(Any));
    }
    let origins = server
        .cors_allow_origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .map_err(|_| crate::Error::Message(format!("invalid CORS origin `{origin}`")))
        })
        .collect::<Result<Vec<axum::http::HeaderValue>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Joins path segments with exactly one `/` between them and a leading `/`.
fn join_paths(base: Option<&str>, path: Option<&str>) -> String {
    let joined = [base, path]
        .into_iter()
        .flatten()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        if path.is_some() {
            "/".to_string()
        } else {
            String::new()
        }
    } else {
        format!("/{joined}")
    }
}
