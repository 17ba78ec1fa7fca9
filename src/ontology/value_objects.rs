use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Identifier of an ontology class, e.g. `MP:0003631`.
///
/// The text is shared behind an [`Arc`] so identifiers can be cloned freely
/// into cache keys and result sets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId {
    value: Arc<str>,
}

/// Identifier of an annotated entity such as a disease or a gene.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    value: Arc<str>,
}

impl ClassId {
    /// Validates and constructs a new [`ClassId`].
    ///
    /// Identifiers must be non-empty and free of tabs and line breaks, since
    /// they are written back into tab-separated reports.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
        Ok(Self {
            value: validate(value.as_ref())?.into(),
        })
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl EntityId {
    /// Validates and constructs a new [`EntityId`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
        Ok(Self {
            value: validate(value.as_ref())?.into(),
        })
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

fn validate(value: &str) -> Result<&str, IdentifierError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if trimmed.contains(|c: char| matches!(c, '\t' | '\n' | '\r')) {
        return Err(IdentifierError::Invalid {
            value: value.to_owned(),
        });
    }
    Ok(trimmed)
}

impl Display for ClassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for ClassId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for EntityId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClassId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for EntityId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for ClassId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl AsRef<str> for ClassId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Errors produced when validating an identifier.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier was empty or only whitespace.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier contained a tab or line break.
    #[error("invalid identifier: {value:?}")]
    Invalid { value: String },
}
