use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Kind of edge between two concepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    /// Direct `rdfs:subClassOf` between two classes.
    #[serde(rename = "subClassOf")]
    SubClassOf,
    /// Part-of, encoded through an `owl:Restriction`.
    #[serde(rename = "partOf")]
    PartOf,
}

impl RelationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubClassOf => "subClassOf",
            Self::PartOf => "partOf",
        }
    }
}

impl Display for RelationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing edge from a parent to one of its children.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildEdge {
    #[serde(rename = "childId")]
    pub child_id: String,
    #[serde(rename = "relationType")]
    pub relation_type: RelationType,
}

/// Edge from a child up to one of its parents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentEdge {
    #[serde(rename = "parentId")]
    pub parent_id: String,
    #[serde(rename = "relationType")]
    pub relation_type: RelationType,
}

/// Descriptive text of a concept, in the source and the localized language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConceptText {
    pub label: Option<String>,
    pub label_zh: Option<String>,
    pub definition: Option<String>,
    pub definition_zh: Option<String>,
}

/// One ontology class in the concept graph.
///
/// Nodes referenced by a relation but never declared are stubs: no text and
/// no `iri`. They are still regular members of the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptNode {
    id: String,
    label: Option<String>,
    label_zh: Option<String>,
    definition: Option<String>,
    definition_zh: Option<String>,
    iri: Option<String>,
    #[serde(rename = "isLeaf")]
    is_leaf: bool,
    count: usize,
    children: Vec<ChildEdge>,
    parents: Vec<ParentEdge>,
}

impl ConceptNode {
    /// Creates a stub node with the supplied id.
    #[must_use]
    pub fn stub(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            label_zh: None,
            definition: None,
            definition_zh: None,
            iri: None,
            is_leaf: true,
            count: 0,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Creates a node for a declared class.
    #[must_use]
    pub fn declared(id: impl Into<String>, iri: impl Into<String>, text: ConceptText) -> Self {
        let mut node = Self::stub(id);
        node.declare(iri.into(), text);
        node
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_label_zh(mut self, label: impl Into<String>) -> Self {
        self.label_zh = Some(label.into());
        self
    }

    /// Replaces iri and text, keeping edges.
    pub(crate) fn declare(&mut self, iri: String, text: ConceptText) {
        self.iri = Some(iri);
        self.label = text.label;
        self.label_zh = text.label_zh;
        self.definition = text.definition;
        self.definition_zh = text.definition_zh;
    }

    pub(crate) fn attach_child(&mut self, child_id: String, relation_type: RelationType) {
        self.children.push(ChildEdge {
            child_id,
            relation_type,
        });
        self.is_leaf = false;
    }

    pub(crate) fn attach_parent(&mut self, parent_id: String, relation_type: RelationType) {
        self.parents.push(ParentEdge {
            parent_id,
            relation_type,
        });
    }

    /// Recomputes the derived attributes from the child edges.
    pub(crate) fn derive(&mut self) {
        self.count = self.children.len();
        self.is_leaf = self.children.is_empty();
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn label_zh(&self) -> Option<&str> {
        self.label_zh.as_deref()
    }

    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    #[must_use]
    pub fn definition_zh(&self) -> Option<&str> {
        self.definition_zh.as_deref()
    }

    /// The declaring resource, absent on stubs.
    #[must_use]
    pub fn iri(&self) -> Option<&str> {
        self.iri.as_deref()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Number of child edges.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn children(&self) -> &[ChildEdge] {
        &self.children
    }

    #[must_use]
    pub fn parents(&self) -> &[ParentEdge] {
        &self.parents
    }

    /// Returns `true` when the node was never declared as a class.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.iri.is_none()
    }

    /// Text fields in search priority order.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.label.as_deref(),
            self.label_zh.as_deref(),
            self.definition.as_deref(),
            self.definition_zh.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Case-insensitive substring match over the text fields. An empty needle
    /// matches every node, stubs included.
    #[must_use]
    pub fn matches(&self, lowercase_needle: &str) -> bool {
        lowercase_needle.is_empty()
            || self
                .text_fields()
                .any(|field| field.to_lowercase().contains(lowercase_needle))
    }
}
