//! Unified error type for the gallery workspace.
//!
//! Storage-layer constraint failures are surfaced as typed variants
//! ([`Error::ForeignKeyViolation`], [`Error::UniqueConstraintViolation`]) so
//! callers can tell a missing reference from a duplicate. The CLI derives its
//! exit status from [`Error::exit_code`].

use std::fmt;

/// Unified error type covering all failure modes in gallery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "collection", "photo").
        entity: String,
        /// The identifier or name that was looked up.
        id: String,
    },

    /// A referenced photo or collection does not exist.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A unique column (filename, thumbnail, collection name) already holds this value.
    #[error("Unique constraint violation: {0}")]
    UniqueConstraintViolation(String),

    /// Input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Decoding, resizing or encoding an image failed.
    #[error("Image error: {0}")]
    Image(String),

    /// An object storage upload failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to a process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound { .. } => 2,
            Error::ForeignKeyViolation(_) => 3,
            Error::UniqueConstraintViolation(_) => 4,
            Error::Validation(_) => 5,
            _ => 1,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Convenience constructor for [`Error::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Returns true for the "entity does not exist" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
