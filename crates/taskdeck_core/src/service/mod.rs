//! Core use-case services.
//!
//! # Responsibility
//! - Enforce lifecycle rules above the repository layer.
//! - Keep transport layers (HTTP, CLI) decoupled from storage details.
//!
//! # Invariants
//! - Validation runs before any repository mutation.
//! - Not-found is reported only from "no matching row", never inferred from
//!   a store failure.

use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod project_service;
pub mod section_service;
pub mod todo_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure taxonomy surfaced to every caller.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed or missing input; nothing was written.
    Validation(ValidationError),
    /// The targeted id has no row under the operation's visibility rule.
    NotFound { entity: EntityKind, id: i64 },
    /// The persistence collaborator failed.
    Store(RepoError),
}

impl ServiceError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Store(_) => "store",
        }
    }

    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Store(other),
        }
    }
}
