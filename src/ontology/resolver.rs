//! Canonical identifiers for graph entities.

use oxrdf::Term;

use super::{
    triples::{LanguageFilter, TripleSource},
    value_objects::last_path_segment,
    vocab::Vocabulary,
};

/// Maps an entity to the id used as the concept graph key.
///
/// The external id annotation wins; otherwise the text after the last `/` of
/// the IRI is used. Blank nodes fall back to their label. Two different IRIs
/// sharing a final segment collide, and nothing here tries to detect it.
pub struct IdResolver<'a, S: ?Sized> {
    source: &'a S,
    vocabulary: &'a Vocabulary,
}

impl<'a, S: TripleSource + ?Sized> IdResolver<'a, S> {
    pub fn new(source: &'a S, vocabulary: &'a Vocabulary) -> Self {
        Self { source, vocabulary }
    }

    #[must_use]
    pub fn resolve(&self, entity: &Term) -> String {
        if let Some(id) =
            self.source
                .literal(entity, &self.vocabulary.external_id, LanguageFilter::Neutral)
        {
            return id.to_string();
        }
        match entity {
            Term::NamedNode(node) => last_path_segment(node.as_str()).to_string(),
            Term::BlankNode(node) => node.as_str().to_string(),
            Term::Literal(literal) => literal.value().to_string(),
            #[allow(unreachable_patterns)]
            other => other.to_string(),
        }
    }
}
