//! Compiles a bilingual OWL ontology into a concept graph and serves lookups,
//! search, export and statistics over a cached snapshot of it.
//!
//! The library is split the way the application runs:
//!
//! - [`ontology`] turns a document into an immutable [`ontology::ConceptGraph`]
//!   and caches it in [`ontology::OntologyService`].
//! - [`controller`] exposes the service over HTTP.
//! - [`boot`], [`config`], [`environment`] and [`logger`] wire everything up.

pub use self::errors::Error;

pub mod app;
pub mod boot;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod environment;
pub mod errors;
pub mod logger;
pub mod ontology;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
