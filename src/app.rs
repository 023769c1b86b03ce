//! Shared application state handed to every controller and CLI command.

use std::sync::Arc;

use crate::{config::Config, environment::Environment, ontology::OntologyService};

/// Represents the application context for a web server.
///
/// Cloning is cheap. Every clone points at the same [`OntologyService`], so the
/// snapshot cache is shared process wide.
#[derive(Clone)]
pub struct AppContext {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// Configuration settings for the application.
    pub config: Arc<Config>,
    /// Cached concept graph queries.
    pub ontology: Arc<OntologyService>,
}

impl AppContext {
    #[must_use]
    pub fn new(environment: Environment, config: Config, ontology: OntologyService) -> Self {
        Self {
            environment,
            config: Arc::new(config),
            ontology: Arc::new(ontology),
        }
    }
}
