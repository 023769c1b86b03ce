use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::NamedNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value object ensuring that supplied text represents a valid IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Wraps text that is known to be a valid IRI, such as the vocabulary constants.
    pub(crate) fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the text after the final `/`, the fallback identifier of a
    /// resource that carries no external id annotation.
    #[must_use]
    pub fn last_segment(&self) -> &str {
        last_path_segment(&self.value)
    }

    /// Converts the value object into an `oxrdf` named node.
    #[must_use]
    pub fn to_named_node(&self) -> NamedNode {
        NamedNode::new_unchecked(self.value.clone())
    }
}

/// Returns everything after the last `/` of `iri`, or the whole text when it
/// contains no slash. Fragments (`#...`) are kept as part of the segment.
#[must_use]
pub fn last_path_segment(iri: &str) -> &str {
    iri.rsplit('/').next().unwrap_or(iri)
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Iri> for String {
    fn from(value: Iri) -> Self {
        value.value
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}
