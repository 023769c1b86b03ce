//! Compiles a triple set into a [`ConceptGraph`].
//!
//! The build runs four passes in a fixed order:
//!
//! 1. declare every `owl:Class` with its labels and definitions,
//! 2. add `subClassOf` edges whose object is not a restriction,
//! 3. turn `subClassOf` restrictions on the part-of property into `partOf` edges,
//! 4. derive `count` and `isLeaf` from the child edges.
//!
//! Pass 2 must skip restriction objects before pass 3 reinterprets them.
//! Malformed fragments are dropped without error; the build itself never fails.

use std::collections::{hash_map::Entry, HashMap};

use oxrdf::Term;

use super::{
    entities::{ConceptNode, ConceptText, RelationType},
    graph::{ConceptGraph, NodeHandle},
    resolver::IdResolver,
    triples::{LanguageFilter, TriplePattern, TripleSource},
    vocab::Vocabulary,
};

/// Builds concept graphs against a fixed vocabulary.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    vocabulary: Vocabulary,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Runs all passes over `source`.
    #[must_use]
    pub fn build<S: TripleSource + ?Sized>(&self, source: &S) -> ConceptGraph {
        let mut pass = BuildPass {
            source,
            vocabulary: &self.vocabulary,
            resolver: IdResolver::new(source, &self.vocabulary),
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        pass.declare_classes();
        pass.link_subclasses();
        pass.link_part_of_restrictions();
        pass.finish()
    }
}

struct BuildPass<'a, S: ?Sized> {
    source: &'a S,
    vocabulary: &'a Vocabulary,
    resolver: IdResolver<'a, S>,
    nodes: Vec<ConceptNode>,
    index: HashMap<String, NodeHandle>,
}

impl<'a, S: TripleSource + ?Sized> BuildPass<'a, S> {
    fn declare_classes(&mut self) {
        let source = self.source;
        let declarations = source.instances_of(&self.vocabulary.owl_class);

        for statement in declarations {
            let class = &statement.subject;
            let iri = match class {
                Term::NamedNode(node) => node.as_str().to_string(),
                other => other.to_string(),
            };
            let text = self.text_of(class);
            let id = self.resolver.resolve(class);
            match self.index.entry(id) {
                Entry::Occupied(entry) => {
                    tracing::debug!(id = %entry.key(), iri = %iri, "ontology_class_redeclared");
                    self.nodes[entry.get().0].declare(iri, text);
                }
                Entry::Vacant(entry) => {
                    let handle = NodeHandle(self.nodes.len());
                    self.nodes
                        .push(ConceptNode::declared(entry.key().clone(), iri, text));
                    entry.insert(handle);
                }
            }
        }
    }

    fn link_subclasses(&mut self) {
        let source = self.source;
        for statement in source.triples(TriplePattern::predicate(&self.vocabulary.sub_class_of)) {
            if self.is_restriction(&statement.object) {
                continue;
            }
            let child = self.resolver.resolve(&statement.subject);
            let parent = self.resolver.resolve(&statement.object);
            self.link(child, parent, RelationType::SubClassOf);
        }
    }

    fn link_part_of_restrictions(&mut self) {
        let source = self.source;
        let vocabulary = self.vocabulary;
        for statement in source.triples(TriplePattern::predicate(&vocabulary.sub_class_of)) {
            let restriction = &statement.object;
            if !self.is_restriction(restriction) {
                continue;
            }

            let on_part_of = source
                .triples(TriplePattern::subject_predicate(
                    restriction,
                    &vocabulary.on_property,
                ))
                .into_iter()
                .any(|on_property| {
                    matches!(&on_property.object, Term::NamedNode(property) if *property == vocabulary.part_of)
                });
            if !on_part_of {
                tracing::trace!(restriction = %restriction, "ontology_restriction_skipped_other_property");
                continue;
            }

            let targets = source.triples(TriplePattern::subject_predicate(
                restriction,
                &vocabulary.some_values_from,
            ));
            if targets.is_empty() {
                tracing::debug!(
                    child = %statement.subject,
                    restriction = %restriction,
                    "ontology_restriction_skipped_no_target"
                );
                continue;
            }

            let child = self.resolver.resolve(&statement.subject);
            for target in targets {
                let parent = self.resolver.resolve(&target.object);
                self.link(child.clone(), parent, RelationType::PartOf);
            }
        }
    }

    fn finish(mut self) -> ConceptGraph {
        self.nodes.iter_mut().for_each(ConceptNode::derive);
        ConceptGraph::from_parts(self.nodes, self.index)
    }

    fn text_of(&self, class: &Term) -> ConceptText {
        let vocabulary = self.vocabulary;
        let localized = LanguageFilter::Tagged(&vocabulary.localized_language);
        let lookup = |predicate, language| {
            self.source
                .literal(class, predicate, language)
                .map(str::to_string)
        };
        ConceptText {
            label: lookup(&vocabulary.label, LanguageFilter::Neutral),
            label_zh: lookup(&vocabulary.label, localized),
            definition: lookup(&vocabulary.definition, LanguageFilter::Neutral),
            definition_zh: lookup(&vocabulary.definition, localized),
        }
    }

    fn is_restriction(&self, entity: &Term) -> bool {
        self.source
            .has_type(entity, &self.vocabulary.owl_restriction)
    }

    /// Returns the handle of `id`, creating a stub on first reference.
    fn handle(&mut self, id: String) -> NodeHandle {
        match self.index.entry(id) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let handle = NodeHandle(self.nodes.len());
                self.nodes.push(ConceptNode::stub(entry.key().clone()));
                *entry.insert(handle)
            }
        }
    }

    /// Adds both directions of an edge in one step.
    fn link(&mut self, child_id: String, parent_id: String, relation_type: RelationType) {
        let child = self.handle(child_id.clone());
        let parent = self.handle(parent_id.clone());
        self.nodes[child.0].attach_parent(parent_id, relation_type);
        self.nodes[parent.0].attach_child(child_id, relation_type);
    }
}
