//! Crate-wide error type.
//!
//! Most failures are local to a single input row or a single source file and
//! are recovered from by the caller; see [`Error::MalformedRecord`] and
//! [`Error::MissingSource`].

use std::path::PathBuf;

use thiserror::Error;

use crate::ontology::value_objects::IdentifierError;

#[derive(Debug, Error)]
pub enum Error {
    /// A row could not be split into the two expected tab-separated fields.
    #[error("malformed record in `{origin}` at line {line}: expected two tab-separated fields")]
    MalformedRecord { origin: String, line: usize },

    /// An input source could not be opened or read.
    #[error("input source `{}` is unavailable: {source}", path.display())]
    MissingSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Wraps any displayable failure into [`Error::Message`].
    pub fn wrap(err: impl std::fmt::Display) -> Self {
        Self::Message(err.to_string())
    }

    pub(crate) fn missing_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingSource {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for failures that only affect part of the input and
    /// should be logged rather than abort a build.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. } | Self::MissingSource { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
