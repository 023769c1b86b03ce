//! Loading an ontology document into a fresh [`TripleStore`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::{markup::MarkupCleaner, triples::TripleStore};

/// File extensions accepted for RDF/XML ontology documents.
pub const ALLOWED_EXTENSIONS: &[&str] = &["owl", "rdf", "xml"];

/// Default upper bound on document size (100 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 100 * 1024 * 1024;

/// Reasons a document could not be turned into triples.
///
/// Kept `Clone` so that a single failed rebuild can be reported to every
/// caller that was waiting on it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("cannot read ontology document `{path}`: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("ontology document `{path}` is {size} bytes, limit is {limit}")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("unsupported ontology document extension for `{path}`, expected one of .owl, .rdf, .xml")]
    UnsupportedExtension { path: PathBuf },
    #[error("malformed ontology document: {0}")]
    Malformed(String),
}

/// Supplies a freshly parsed triple set on every call.
pub trait DocumentSource: Send + Sync {
    /// Reads and parses the document.
    ///
    /// # Errors
    /// Any failure to read or parse the document.
    fn load(&self) -> Result<TripleStore, SourceError>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String {
        "in-memory triples".to_string()
    }
}

impl<F> DocumentSource for F
where
    F: Fn() -> Result<TripleStore, SourceError> + Send + Sync,
{
    fn load(&self) -> Result<TripleStore, SourceError> {
        self()
    }
}

/// RDF/XML document on the local file system.
#[derive(Debug, Clone)]
pub struct RdfXmlDocument {
    path: PathBuf,
    cleaner: Option<MarkupCleaner>,
    max_bytes: u64,
}

impl RdfXmlDocument {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cleaner: Some(MarkupCleaner::default()),
            max_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }

    /// Enables or disables markup cleaning before parsing.
    #[must_use]
    pub fn clean_markup(mut self, enabled: bool) -> Self {
        self.cleaner = enabled.then(MarkupCleaner::default);
        self
    }

    #[must_use]
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_extension(&self) -> Result<(), SourceError> {
        let allowed = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ALLOWED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            });
        if allowed {
            Ok(())
        } else {
            Err(SourceError::UnsupportedExtension {
                path: self.path.clone(),
            })
        }
    }

    fn io_error(&self, err: &std::io::Error) -> SourceError {
        SourceError::Io {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

impl DocumentSource for RdfXmlDocument {
    fn load(&self) -> Result<TripleStore, SourceError> {
        self.check_extension()?;
        let size = fs::metadata(&self.path)
            .map_err(|err| self.io_error(&err))?
            .len();
        if size > self.max_bytes {
            return Err(SourceError::TooLarge {
                path: self.path.clone(),
                size,
                limit: self.max_bytes,
            });
        }

        let raw = fs::read_to_string(&self.path).map_err(|err| self.io_error(&err))?;
        let store = match &self.cleaner {
            Some(cleaner) => {
                let cleaned = cleaner.clean(&raw);
                if cleaned.rewritten > 0 {
                    tracing::info!(
                        path = %self.path.display(),
                        rewritten = cleaned.rewritten,
                        "ontology_markup_repaired"
                    );
                }
                TripleStore::parse_rdf_xml(&cleaned.content)
            }
            None => TripleStore::parse_rdf_xml(&raw),
        }
        .map_err(SourceError::Malformed)?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = size,
            statements = store.len(),
            "ontology_document_parsed"
        );
        Ok(store)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
