//! Predicates and classes the graph builder looks for.

use oxrdf::NamedNode;
use serde::{Deserialize, Serialize};

use super::value_objects::{Iri, IriError};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";

/// `oboInOwl:id`, the external identifier annotation (e.g. `MS:1000031`).
pub const OBO_IN_OWL_ID: &str = "http://www.geneontology.org/formats/oboInOwl#id";
/// `IAO_0000115`, the textual definition annotation.
pub const IAO_DEFINITION: &str = "http://purl.obolibrary.org/obo/IAO_0000115";
/// `BFO_0000050`, the part-of object property.
pub const BFO_PART_OF: &str = "http://purl.obolibrary.org/obo/BFO_0000050";

pub const DEFAULT_LOCALIZED_LANGUAGE: &str = "zh";

/// Overridable part of the vocabulary, as found in the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularySettings {
    #[serde(default = "default_external_id")]
    pub external_id: Iri,
    #[serde(default = "default_part_of")]
    pub part_of: Iri,
    #[serde(default = "default_definition")]
    pub definition: Iri,
    /// Language tag feeding the `label_zh` / `definition_zh` fields.
    #[serde(default = "default_localized_language")]
    pub localized_language: String,
}

fn default_external_id() -> Iri {
    known(OBO_IN_OWL_ID)
}

fn default_part_of() -> Iri {
    known(BFO_PART_OF)
}

fn default_definition() -> Iri {
    known(IAO_DEFINITION)
}

fn default_localized_language() -> String {
    DEFAULT_LOCALIZED_LANGUAGE.to_string()
}

fn known(iri: &'static str) -> Iri {
    Iri::new_unchecked(iri)
}

impl Default for VocabularySettings {
    fn default() -> Self {
        Self {
            external_id: default_external_id(),
            part_of: default_part_of(),
            definition: default_definition(),
            localized_language: default_localized_language(),
        }
    }
}

/// Resolved vocabulary handed to the graph builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    pub sub_class_of: NamedNode,
    pub owl_class: NamedNode,
    pub owl_restriction: NamedNode,
    pub on_property: NamedNode,
    pub some_values_from: NamedNode,
    pub label: NamedNode,
    pub definition: NamedNode,
    pub external_id: NamedNode,
    pub part_of: NamedNode,
    pub localized_language: String,
}

impl Vocabulary {
    /// Builds the vocabulary from configuration overrides.
    #[must_use]
    pub fn from_settings(settings: &VocabularySettings) -> Self {
        Self {
            sub_class_of: NamedNode::new_unchecked(RDFS_SUB_CLASS_OF),
            owl_class: NamedNode::new_unchecked(OWL_CLASS),
            owl_restriction: NamedNode::new_unchecked(OWL_RESTRICTION),
            on_property: NamedNode::new_unchecked(OWL_ON_PROPERTY),
            some_values_from: NamedNode::new_unchecked(OWL_SOME_VALUES_FROM),
            label: NamedNode::new_unchecked(RDFS_LABEL),
            definition: settings.definition.to_named_node(),
            external_id: settings.external_id.to_named_node(),
            part_of: settings.part_of.to_named_node(),
            localized_language: settings.localized_language.clone(),
        }
    }

    /// Overrides the part-of property with a raw, validated IRI.
    pub fn with_part_of(mut self, part_of: &str) -> Result<Self, IriError> {
        self.part_of = Iri::new(part_of)?.to_named_node();
        Ok(self)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_settings(&VocabularySettings::default())
    }
}
