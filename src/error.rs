//! Error types for dataset access, lookups and validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// A level of the brand → model → engine → stage hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Brand,
    Model,
    Engine,
    Stage,
}

impl Level {
    /// Levels in resolution order
    pub const ALL: [Level; 4] = [Level::Brand, Level::Model, Level::Engine, Level::Stage];

    /// Lowercase level name, as used in error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Brand => "brand",
            Level::Model => "model",
            Level::Engine => "engine",
            Level::Stage => "stage",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of an [`Error`], for callers mapping failures onto
/// their own status codes (400 / 404 / 500 over HTTP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input: bad dataset shape, duplicate ids, missing parameters
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A hierarchy level did not contain the requested id
    #[error("{0} not found")]
    NotFound(Level),

    #[error("Backup not found: {0}")]
    BackupNotFound(String),

    /// Durable storage could not be read or written
    #[error("Storage error: {context}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Persisted content exists but does not parse as a dataset
    #[error("Corrupt dataset at {path:?}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Storage {
            context: context.into(),
            source,
        }
    }

    /// Which failure class this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) | Error::BackupNotFound(_) => ErrorKind::NotFound,
            Error::Storage { .. } | Error::Corrupt { .. } => ErrorKind::Storage,
        }
    }

    /// The missing hierarchy level, if this is a lookup failure
    pub fn missing_level(&self) -> Option<Level> {
        match self {
            Error::NotFound(level) => Some(*level),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_level() {
        let err = Error::NotFound(Level::Engine);
        assert_eq!(err.to_string(), "engine not found");
        assert_eq!(err.missing_level(), Some(Level::Engine));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::BackupNotFound("b.json".into()).kind(),
            ErrorKind::NotFound
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(Error::storage("write", io).kind(), ErrorKind::Storage);
    }
}
