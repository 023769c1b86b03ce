//! Immutable concept graph snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::entities::{ConceptNode, RelationType};

/// Dense index of a node inside a [`ConceptGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) usize);

/// Complete result of one build pass. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct ConceptGraph {
    nodes: Vec<ConceptNode>,
    index: HashMap<String, NodeHandle>,
    built_at: DateTime<Local>,
}

/// Aggregate counters over a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_terms: usize,
    /// Every node is a class, so this always equals `total_terms`.
    pub total_classes: usize,
    pub total_relations: usize,
    #[serde(rename = "subClassOf_relations")]
    pub sub_class_of_relations: usize,
    #[serde(rename = "partOf_relations")]
    pub part_of_relations: usize,
    pub leaf_nodes: usize,
    /// Largest number of parent edges held by a single node. Not a path
    /// length, despite the name.
    pub max_depth: usize,
}

impl ConceptGraph {
    pub(crate) fn from_parts(nodes: Vec<ConceptNode>, index: HashMap<String, NodeHandle>) -> Self {
        Self {
            nodes,
            index,
            built_at: Local::now(),
        }
    }

    /// Graph without any node.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), HashMap::new())
    }

    /// Nodes in declaration / creation order.
    #[must_use]
    pub fn nodes(&self) -> &[ConceptNode] {
        &self.nodes
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ConceptNode> {
        self.index.get(id).map(|handle| &self.nodes[handle.0])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn built_at(&self) -> DateTime<Local> {
        self.built_at
    }

    /// Nodes whose text contains `query`, case-insensitively, in snapshot order.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a ConceptNode> + 'a {
        let needle = query.to_lowercase();
        self.nodes.iter().filter(move |node| node.matches(&needle))
    }

    /// Number of parent edges over the whole graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.parents().len()).sum()
    }

    #[must_use]
    pub fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics {
            total_terms: self.nodes.len(),
            total_classes: self.nodes.len(),
            ..GraphStatistics::default()
        };
        for node in &self.nodes {
            for parent in node.parents() {
                match parent.relation_type {
                    RelationType::SubClassOf => stats.sub_class_of_relations += 1,
                    RelationType::PartOf => stats.part_of_relations += 1,
                }
            }
            if node.is_leaf() {
                stats.leaf_nodes += 1;
            }
            stats.max_depth = stats.max_depth.max(node.parents().len());
        }
        stats.total_relations = stats.sub_class_of_relations + stats.part_of_relations;
        stats
    }
}

impl Default for ConceptGraph {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ConceptGraph {
        let mut instrument = ConceptNode::stub("MS:1")
            .with_label("Instrument")
            .with_label_zh("仪器");
        let mut model = ConceptNode::stub("MS:2").with_label("instrument model");
        let mut source = ConceptNode::stub("MS:3").with_label("ion source");

        instrument.attach_child("MS:2".into(), RelationType::SubClassOf);
        model.attach_parent("MS:1".into(), RelationType::SubClassOf);
        instrument.attach_child("MS:3".into(), RelationType::PartOf);
        source.attach_parent("MS:1".into(), RelationType::PartOf);
        model.attach_child("MS:3".into(), RelationType::SubClassOf);
        source.attach_parent("MS:2".into(), RelationType::SubClassOf);

        let mut nodes = vec![instrument, model, source];
        nodes.iter_mut().for_each(ConceptNode::derive);
        let index = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id().to_string(), NodeHandle(position)))
            .collect();
        ConceptGraph::from_parts(nodes, index)
    }

    #[test]
    fn looks_up_by_id() {
        let graph = graph();
        assert_eq!(graph.get("MS:2").and_then(ConceptNode::label), Some("instrument model"));
        assert!(graph.get("MS:404").is_none());
    }

    #[test]
    fn search_preserves_snapshot_order() {
        let graph = graph();
        let ids: Vec<_> = graph.search("INSTRUMENT").map(ConceptNode::id).collect();
        assert_eq!(ids, vec!["MS:1", "MS:2"]);
        assert_eq!(graph.search("").count(), 3);
        assert_eq!(graph.search("仪器").count(), 1);
        assert_eq!(graph.search("detector").count(), 0);
    }

    #[test]
    fn statistics_count_parent_edges() {
        let stats = graph().statistics();
        assert_eq!(stats.total_terms, 3);
        assert_eq!(stats.total_classes, 3);
        assert_eq!(stats.sub_class_of_relations, 2);
        assert_eq!(stats.part_of_relations, 1);
        assert_eq!(stats.total_relations, 3);
        assert_eq!(stats.leaf_nodes, 1);
        // MS:3 has two parents; the longest path is also two, but that is a coincidence.
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn max_depth_is_parent_count_not_path_length() {
        let mut a = ConceptNode::stub("A");
        let mut b = ConceptNode::stub("B");
        let mut c = ConceptNode::stub("C");
        a.attach_child("B".into(), RelationType::SubClassOf);
        b.attach_parent("A".into(), RelationType::SubClassOf);
        b.attach_child("C".into(), RelationType::SubClassOf);
        c.attach_parent("B".into(), RelationType::SubClassOf);
        let mut nodes = vec![a, b, c];
        nodes.iter_mut().for_each(ConceptNode::derive);
        let index = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id().to_string(), NodeHandle(position)))
            .collect();

        let stats = ConceptGraph::from_parts(nodes, index).statistics();
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn statistics_use_wire_names() {
        let value = serde_json::to_value(graph().statistics()).expect("serialize");
        assert_eq!(value["subClassOf_relations"], 2);
        assert_eq!(value["partOf_relations"], 1);
        assert_eq!(value["leaf_nodes"], 1);
        assert_eq!(value["max_depth"], 2);
    }

    #[test]
    fn empty_graph_has_zero_statistics() {
        assert_eq!(ConceptGraph::empty().statistics(), GraphStatistics::default());
    }
}
