//! Triple Source contract and its in-memory adapter.
//!
//! The graph builder never walks RDF syntax itself. It only asks the source
//! for statements matching a pattern, for literal values and for type
//! membership. [`TripleStore`] answers these questions from an indexed,
//! de-duplicated list of statements kept in document order.

use std::collections::{HashMap, HashSet};

use oxrdf::{NamedNode, Term, Triple};
use oxrdfxml::RdfXmlParser;

use super::vocab::RDF_TYPE;

/// A single subject / predicate / object statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: Term,
    pub predicate: NamedNode,
    pub object: Term,
}

impl Statement {
    #[must_use]
    pub fn new(subject: impl Into<Term>, predicate: NamedNode, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl From<Triple> for Statement {
    fn from(triple: Triple) -> Self {
        Self {
            subject: triple.subject.into(),
            predicate: triple.predicate,
            object: triple.object,
        }
    }
}

/// Statement pattern where every position may be a wildcard (`None`).
#[derive(Clone, Copy, Debug, Default)]
pub struct TriplePattern<'a> {
    pub subject: Option<&'a Term>,
    pub predicate: Option<&'a NamedNode>,
    pub object: Option<&'a Term>,
}

impl<'a> TriplePattern<'a> {
    #[must_use]
    pub fn new(
        subject: Option<&'a Term>,
        predicate: Option<&'a NamedNode>,
        object: Option<&'a Term>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Matches every statement using `predicate`.
    #[must_use]
    pub fn predicate(predicate: &'a NamedNode) -> Self {
        Self::new(None, Some(predicate), None)
    }

    /// Matches every `(subject, predicate, ?)` statement.
    #[must_use]
    pub fn subject_predicate(subject: &'a Term, predicate: &'a NamedNode) -> Self {
        Self::new(Some(subject), Some(predicate), None)
    }

    fn matches(&self, statement: &Statement) -> bool {
        self.subject.map_or(true, |s| *s == statement.subject)
            && self.predicate.map_or(true, |p| *p == statement.predicate)
            && self.object.map_or(true, |o| *o == statement.object)
    }
}

/// Which literal to pick when a subject carries several values for a predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LanguageFilter<'a> {
    /// First literal without a language tag, otherwise the first literal in
    /// source order whatever its tag.
    Neutral,
    /// First literal whose language tag equals the given tag.
    Tagged(&'a str),
}

/// Query capability the graph builder consumes.
pub trait TripleSource {
    /// Returns the statements matching `pattern`, in source order.
    fn triples<'a>(&'a self, pattern: TriplePattern<'_>) -> Vec<&'a Statement>;

    /// Looks up a literal value of `(subject, predicate)`.
    fn literal<'a>(
        &'a self,
        subject: &Term,
        predicate: &NamedNode,
        language: LanguageFilter<'_>,
    ) -> Option<&'a str> {
        let mut fallback = None;
        for statement in self.triples(TriplePattern::subject_predicate(subject, predicate)) {
            let Term::Literal(literal) = &statement.object else {
                continue;
            };
            match (language, literal.language()) {
                (LanguageFilter::Tagged(wanted), Some(tag)) if tag.eq_ignore_ascii_case(wanted) => {
                    return Some(literal.value());
                }
                (LanguageFilter::Tagged(_), _) => {}
                (LanguageFilter::Neutral, None) => return Some(literal.value()),
                (LanguageFilter::Neutral, Some(_)) => {
                    fallback.get_or_insert(literal.value());
                }
            }
        }
        fallback
    }

    /// Returns the `(?, rdf:type, class)` statements, in source order.
    fn instances_of<'a>(&'a self, class: &NamedNode) -> Vec<&'a Statement> {
        let rdf_type = NamedNode::new_unchecked(RDF_TYPE);
        let class = Term::from(class.clone());
        self.triples(TriplePattern::new(None, Some(&rdf_type), Some(&class)))
    }

    /// Returns `true` when `(entity, rdf:type, class)` is asserted.
    fn has_type(&self, entity: &Term, class: &NamedNode) -> bool {
        let rdf_type = NamedNode::new_unchecked(RDF_TYPE);
        let class = Term::from(class.clone());
        !self
            .triples(TriplePattern::new(Some(entity), Some(&rdf_type), Some(&class)))
            .is_empty()
    }
}

/// Indexed in-memory statement set.
#[derive(Clone, Debug, Default)]
pub struct TripleStore {
    statements: Vec<Statement>,
    seen: HashSet<Statement>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<NamedNode, Vec<usize>>,
}

impl TripleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an RDF/XML document.
    ///
    /// # Errors
    /// Returns the parser message when the document is not well-formed.
    pub fn parse_rdf_xml(document: &str) -> Result<Self, String> {
        let mut store = Self::new();
        for triple in RdfXmlParser::new().for_reader(document.as_bytes()) {
            let triple = triple.map_err(|err| err.to_string())?;
            store.insert(Statement::from(triple));
        }
        Ok(store)
    }

    /// Adds a statement. Returns `false` when it was already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        if !self.seen.insert(statement.clone()) {
            return false;
        }
        let position = self.statements.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(position);
        self.by_predicate
            .entry(statement.predicate.clone())
            .or_default()
            .push(position);
        self.statements.push(statement);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// All statements in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }
}

impl FromIterator<Statement> for TripleStore {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        let mut store = Self::new();
        for statement in iter {
            store.insert(statement);
        }
        store
    }
}

impl TripleSource for TripleStore {
    fn triples<'a>(&'a self, pattern: TriplePattern<'_>) -> Vec<&'a Statement> {
        let statements = &self.statements;
        let positions = if let Some(subject) = pattern.subject {
            self.by_subject.get(subject)
        } else if let Some(predicate) = pattern.predicate {
            self.by_predicate.get(predicate)
        } else {
            return statements
                .iter()
                .filter(|statement| pattern.matches(statement))
                .collect();
        };

        positions
            .into_iter()
            .flatten()
            .map(|&position| &statements[position])
            .filter(|statement| pattern.matches(statement))
            .collect()
    }
}
