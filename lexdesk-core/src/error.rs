use thiserror::Error;

/// Failure inside a storage collaborator.
///
/// A missing record is not an error: lookups return `Ok(None)` so callers can
/// map it to a not-found response deterministically.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("duplicate value for {0}")]
    Duplicate(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// An insert payload that does not satisfy its entity's insert shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{0}`")]
    Invalid(&'static str),
}
