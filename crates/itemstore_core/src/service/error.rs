//! Caller-facing error taxonomy for resource store operations.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::{RecordId, RecordKind};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a resource store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Input is malformed or missing a required field.
    Validation(ValidationError),
    /// No live record has the requested id.
    NotFound { kind: RecordKind, id: RecordId },
    /// Another live item already uses this name.
    Conflict { name: String },
    /// Persistence failed; the unit of work was rolled back.
    Storage(RepoError),
}

impl StoreError {
    /// Maps a repository failure during a write that touched `name`.
    ///
    /// A storage-level uniqueness violation is reported as a conflict on
    /// `name`; everything else keeps the default mapping.
    pub(crate) fn from_name_write(err: RepoError, name: &str) -> Self {
        match err {
            RepoError::UniqueViolation(_) => Self::Conflict {
                name: name.to_string(),
            },
            other => Self::from(other),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, .. } => write!(f, "{kind} not found"),
            Self::Conflict { name } => write!(f, "Item with name '{name}' already exists"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound { .. } | Self::Conflict { .. } => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::from(value))
    }
}
