//! Persisted snapshot format.
//!
//! ```json
//! {
//!   "metadata": { "total_nodes": 2, "generated_at": "...", "description": "..." },
//!   "nodes": { "MS:1": { "id": "MS:1", ... }, "MS:2": { ... } }
//! }
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use super::{entities::ConceptNode, graph::ConceptGraph};

pub const EXPORT_DESCRIPTION: &str = "Parsed ontology nodes from OWL file";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub total_nodes: usize,
    pub generated_at: String,
    pub description: String,
}

/// An export as read back from disk.
#[derive(Clone, Debug, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub nodes: BTreeMap<String, ConceptNode>,
}

impl ExportDocument {
    /// Reads an export written by [`write_snapshot`].
    ///
    /// # Errors
    /// When the file cannot be read or is not a valid export.
    pub fn read(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|err| err.to_string())?;
        serde_json::from_str(&content).map_err(|err| err.to_string())
    }
}

#[derive(Serialize)]
struct ExportView<'a> {
    metadata: ExportMetadata,
    nodes: NodesById<'a>,
}

/// Serializes nodes as an id keyed map, in snapshot order.
struct NodesById<'a>(&'a [ConceptNode]);

impl Serialize for NodesById<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in self.0 {
            map.serialize_entry(node.id(), node)?;
        }
        map.end()
    }
}

/// Default export file name, `ontology_nodes_<YYYYmmdd_HHMMSS>.json`.
#[must_use]
pub fn default_file_name(at: DateTime<Local>) -> String {
    format!("ontology_nodes_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Writes `graph` to `destination` as pretty printed JSON, creating parent
/// directories as needed.
///
/// # Errors
/// Returns the failure reason when serialization or any file operation fails.
pub fn write_snapshot(graph: &ConceptGraph, destination: &Path) -> Result<PathBuf, String> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    let view = ExportView {
        metadata: ExportMetadata {
            total_nodes: graph.len(),
            generated_at: Local::now().to_rfc3339(),
            description: EXPORT_DESCRIPTION.to_string(),
        },
        nodes: NodesById(graph.nodes()),
    };
    let body = serde_json::to_string_pretty(&view).map_err(|err| err.to_string())?;
    fs::write(destination, body).map_err(|err| err.to_string())?;
    Ok(destination.to_path_buf())
}
