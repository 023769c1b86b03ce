//! Application startup: context creation, router assembly and serving.

use std::sync::Arc;

use axum::Router;
use colored::Colorize;

use crate::{
    app::AppContext,
    config::Config,
    controller::{self, AppRoutes},
    environment::Environment,
    ontology::OntologyService,
    Error, Result,
};

/// Creates the shared context. With `ontology.preload` the first snapshot is
/// built here, so a broken document fails the boot instead of the first request.
///
/// # Errors
/// When preloading is enabled and the document cannot be loaded.
pub async fn create_context(environment: &Environment, config: Config) -> Result<AppContext> {
    let ontology = OntologyService::from_config(&config.ontology);
    tracing::info!(
        environment = %environment,
        document = %config.ontology.document.display(),
        ttl_secs = config.ontology.cache_ttl_secs,
        "ontology_service_configured"
    );
    let ctx = AppContext::new(environment.clone(), config, ontology);

    if ctx.config.ontology.preload {
        let service = Arc::clone(&ctx.ontology);
        let graph = tokio::task::spawn_blocking(move || service.snapshot())
            .await
            .map_err(Error::wrap)??;
        tracing::info!(nodes = graph.len(), "ontology_preloaded");
    }
    Ok(ctx)
}

/// Every route group of the application.
#[must_use]
pub fn routes(ctx: &AppContext) -> AppRoutes {
    AppRoutes::with_default_routes()
        .prefix(&ctx.config.server.api_prefix)
        .add_route(controller::ontology::routes())
}

/// Builds the axum router for `ctx`.
///
/// # Errors
/// When the CORS configuration is invalid.
pub fn router(ctx: &AppContext) -> Result<Router> {
    routes(ctx).to_router(ctx.clone())
}

/// Serves HTTP until Ctrl-C or SIGTERM.
///
/// # Errors
/// When the address cannot be bound or the server fails.
pub async fn serve(ctx: AppContext, binding: Option<String>, port: Option<u16>) -> Result<()> {
    let binding = binding.unwrap_or_else(|| ctx.config.server.binding.clone());
    let port = port.unwrap_or(ctx.config.server.port);
    let app_routes = routes(&ctx);
    for route in app_routes.collect() {
        tracing::debug!(uri = %route.uri, "route");
    }
    let router = app_routes.to_router(ctx.clone())?;

    let listener = tokio::net::TcpListener::bind(format!("{binding}:{port}")).await?;
    println!(
        "{} {} ({})",
        "listening on".green(),
        format!("http://{binding}:{port}").bold(),
        ctx.environment.to_string().cyan()
    );
    tracing::info!(binding = %binding, port, "server_started");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server_stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(err.msg = %error, "shutdown_signal_error");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(err.msg = %error, "shutdown_signal_error");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
