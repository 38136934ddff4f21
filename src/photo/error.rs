//! Storage error taxonomy shared by every engine and both transports

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::photo::identifier::Identifier;

/// Boxed cause carried by I/O and open failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Engine-agnostic classification of a [`StorageError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The identifier has no current value
    NotFound,
    /// The storage medium failed
    IoFailure,
    /// The engine could not be constructed
    OpenFailure,
    /// The identifier is malformed for this engine
    InvalidInput,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::IoFailure => "i/o failure",
            ErrorKind::OpenFailure => "open failure",
            ErrorKind::InvalidInput => "invalid input",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`Repository`](crate::storage::Repository) implementations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("resource not found. such id as {0}")]
    NotFound(Identifier),

    #[error("photo {id} can't be accessed: {source}")]
    Io {
        id: Identifier,
        #[source]
        source: BoxError,
    },

    #[error("storage at {} can't be opened: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("invalid identifier {id:?}: {reason}")]
    InvalidInput { id: String, reason: &'static str },
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::NotFound(_) => ErrorKind::NotFound,
            StorageError::Io { .. } => ErrorKind::IoFailure,
            StorageError::Open { .. } => ErrorKind::OpenFailure,
            StorageError::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }

    pub fn not_found(id: &Identifier) -> Self {
        StorageError::NotFound(id.clone())
    }

    pub fn io(id: &Identifier, source: impl Into<BoxError>) -> Self {
        StorageError::Io {
            id: id.clone(),
            source: source.into(),
        }
    }

    pub fn open(path: impl AsRef<Path>, source: impl Into<BoxError>) -> Self {
        StorageError::Open {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    pub fn invalid(id: &Identifier, reason: &'static str) -> Self {
        StorageError::InvalidInput {
            id: id.value().to_string(),
            reason,
        }
    }
}

/// Result alias for repository operations
pub type StorageResult<T> = Result<T, StorageError>;
