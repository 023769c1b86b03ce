use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError, RwLock,
    },
    time::{Duration, Instant},
};

use chrono::Local;
use moka::sync::Cache;

use crate::{
    config::OntologySettings,
    ontology::{
        builder::GraphBuilder,
        document::{DocumentSource, RdfXmlDocument, SourceError},
        entities::ConceptNode,
        export,
        graph::{ConceptGraph, GraphStatistics},
        vocab::Vocabulary,
    },
};

/// Handle to the document the service rebuilds from.
pub type SourceHandle = dyn DocumentSource + 'static;

/// Caching query service over the concept graph.
///
/// One instance is shared by every caller of the process. A snapshot stays
/// valid for `ttl`; after that the next operation rebuilds it. Concurrent
/// callers hitting an expired snapshot wait on a single rebuild. A `ttl` of
/// zero disables caching: every operation rebuilds, one at a time.
pub struct OntologyService {
    source: Arc<SourceHandle>,
    builder: GraphBuilder,
    cache: Option<Cache<(), Arc<ConceptGraph>>>,
    /// Serializes rebuilds when there is no cache to coalesce them.
    rebuilding: Mutex<()>,
    last_good: RwLock<Option<Arc<ConceptGraph>>>,
    builds: AtomicUsize,
    export_dir: PathBuf,
}

/// Errors raised by the query service.
#[derive(Debug, thiserror::Error)]
pub enum OntologyServiceError {
    /// The document could not be loaded and no earlier snapshot exists.
    #[error("ontology source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
    /// Writing an export failed. The cached graph is unaffected.
    #[error("failed to export snapshot to `{path}`: {reason}")]
    ExportFailed { path: PathBuf, reason: String },
}

impl OntologyService {
    /// Creates a new [`OntologyService`] from a document source.
    pub fn new(source: Arc<SourceHandle>, builder: GraphBuilder, ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(ttl)
                .build()
        });
        Self {
            source,
            builder,
            cache,
            rebuilding: Mutex::new(()),
            last_good: RwLock::new(None),
            builds: AtomicUsize::new(0),
            export_dir: PathBuf::from(crate::config::DEFAULT_EXPORT_DIR),
        }
    }

    /// Builds a service instance from configuration settings.
    #[must_use]
    pub fn from_config(settings: &OntologySettings) -> Self {
        let document = RdfXmlDocument::new(&settings.document)
            .clean_markup(settings.clean_markup)
            .max_bytes(settings.max_document_bytes);
        let builder = GraphBuilder::new(Vocabulary::from_settings(&settings.vocabulary));
        Self::new(
            Arc::new(document),
            builder,
            Duration::from_secs(settings.cache_ttl_secs),
        )
        .with_export_dir(&settings.export_dir)
    }

    /// Directory receiving exports without an explicit destination.
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Number of successful rebuilds since creation.
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Returns the current snapshot, rebuilding it when missing or expired.
    ///
    /// # Errors
    /// When a rebuild fails and no earlier snapshot exists.
    pub fn snapshot(&self) -> Result<Arc<ConceptGraph>, OntologyServiceError> {
        let built = match &self.cache {
            Some(cache) => cache
                .try_get_with((), || self.rebuild())
                .map_err(|err| (*err).clone()),
            None => {
                let _guard = self
                    .rebuilding
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                self.rebuild()
            }
        };
        built.or_else(|err| self.fall_back(err))
    }

    /// All nodes in snapshot order.
    ///
    /// # Errors
    /// See [`Self::snapshot`].
    pub fn get_all(&self) -> Result<Vec<ConceptNode>, OntologyServiceError> {
        Ok(self.snapshot()?.nodes().to_vec())
    }

    /// Looks up a node by id. A miss is `None`, not an error.
    ///
    /// # Errors
    /// See [`Self::snapshot`].
    pub fn get_by_id(&self, id: &str) -> Result<Option<ConceptNode>, OntologyServiceError> {
        Ok(self.snapshot()?.get(id).cloned())
    }

    /// Case-insensitive substring search over labels and definitions.
    ///
    /// # Errors
    /// See [`Self::snapshot`].
    pub fn search(&self, query: &str) -> Result<Vec<ConceptNode>, OntologyServiceError> {
        Ok(self.snapshot()?.search(query).cloned().collect())
    }

    /// # Errors
    /// See [`Self::snapshot`].
    pub fn statistics(&self) -> Result<GraphStatistics, OntologyServiceError> {
        Ok(self.snapshot()?.statistics())
    }

    /// Writes the current snapshot to `destination`, or to a timestamped file
    /// in the export directory.
    ///
    /// # Errors
    /// `SourceUnavailable` when there is no snapshot, `ExportFailed` when the
    /// file cannot be written.
    pub fn export_snapshot(
        &self,
        destination: Option<&Path>,
    ) -> Result<PathBuf, OntologyServiceError> {
        let graph = self.snapshot()?;
        let path = destination.map_or_else(
            || self.export_dir.join(export::default_file_name(Local::now())),
            Path::to_path_buf,
        );
        let written = export::write_snapshot(&graph, &path).map_err(|reason| {
            tracing::error!(path = %path.display(), err.msg = %reason, "ontology_export_failed");
            OntologyServiceError::ExportFailed {
                path: path.clone(),
                reason,
            }
        })?;
        tracing::info!(path = %written.display(), nodes = graph.len(), "ontology_exported");
        Ok(written)
    }

    /// Forces the next operation to rebuild.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&());
        }
        tracing::info!("ontology_cache_cleared");
    }

    fn rebuild(&self) -> Result<Arc<ConceptGraph>, SourceError> {
        let started = Instant::now();
        let source = self.source.describe();
        tracing::debug!(source = %source, "ontology_rebuild_started");

        let store = self.source.load()?;
        let graph = Arc::new(self.builder.build(&store));
        self.builds.fetch_add(1, Ordering::SeqCst);
        *self
            .last_good
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&graph));

        tracing::info!(
            source = %source,
            statements = store.len(),
            nodes = graph.len(),
            edges = graph.edge_count(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "ontology_rebuilt"
        );
        Ok(graph)
    }

    fn fall_back(&self, err: SourceError) -> Result<Arc<ConceptGraph>, OntologyServiceError> {
        let last_good = self
            .last_good
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match last_good {
            Some(graph) => {
                tracing::warn!(
                    err.msg = %err,
                    built_at = %graph.built_at(),
                    "ontology_rebuild_failed_serving_last_snapshot"
                );
                Ok(graph)
            }
            None => {
                tracing::error!(err.msg = %err, err.detail = ?err, "ontology_rebuild_failed");
                Err(err.into())
            }
        }
    }
}
