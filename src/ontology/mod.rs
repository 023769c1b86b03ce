//! Ontology concept graph.
//!
//! A [`DocumentSource`] yields a [`TripleStore`], the [`GraphBuilder`] compiles
//! it into an immutable [`ConceptGraph`], and the [`OntologyService`] keeps the
//! latest snapshot cached for lookups, search, export and statistics.

pub mod builder;
pub mod document;
pub mod entities;
pub mod export;
pub mod graph;
pub mod markup;
pub mod resolver;
pub mod service;
pub mod triples;
pub mod value_objects;
pub mod vocab;

pub use builder::GraphBuilder;
pub use document::{DocumentSource, RdfXmlDocument, SourceError};
pub use entities::{ChildEdge, ConceptNode, ConceptText, ParentEdge, RelationType};
pub use export::{ExportDocument, ExportMetadata};
pub use graph::{ConceptGraph, GraphStatistics};
pub use markup::{MarkupCleaner, MarkupError};
pub use resolver::IdResolver;
pub use service::{OntologyService, OntologyServiceError};
pub use triples::{LanguageFilter, Statement, TriplePattern, TripleSource, TripleStore};
pub use value_objects::{Iri, IriError};
pub use vocab::{Vocabulary, VocabularySettings};
