use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;
use tracing::error;

/// The kind of stored entity or relation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum EntityKind {
    User,
    Group,
    Policy,
    /// A user-in-group relation.
    Membership,
    /// A policy attached to a group or a user.
    Attachment,
}

/// Errors reported by a repository implementation.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} not found: {detail}")]
    NotFound { kind: EntityKind, detail: String },

    #[error("{kind} already exists: {detail}")]
    AlreadyExists { kind: EntityKind, detail: String },

    /// A relation between entities that may never exist, e.g. across organizations.
    #[error("invalid relation: {0}")]
    InvalidRelation(String),

    #[error("internal repository error: {0}")]
    Internal(String),
}

impl RepositoryError {
    pub fn not_found(kind: EntityKind, detail: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            kind,
            detail: detail.into(),
        }
    }

    pub fn already_exists(kind: EntityKind, detail: impl Into<String>) -> Self {
        RepositoryError::AlreadyExists {
            kind,
            detail: detail.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for RepositoryError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        RepositoryError::Internal(format!("poisoned lock: {err}"))
    }
}

/// Errors reported by the domain operations in [`crate::api`].
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{kind} not found: {detail}")]
    NotFound { kind: EntityKind, detail: String },

    #[error("{kind} already exists: {detail}")]
    AlreadyExists { kind: EntityKind, detail: String },

    #[error("principal {principal} is not allowed to access resource {urn}")]
    Unauthorized { principal: String, urn: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidParameter(message.into())
    }

    /// The HTTP status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidParameter(_) => 400,
            ApiError::Unauthorized { .. } => 403,
            ApiError::NotFound { .. } => 404,
            ApiError::AlreadyExists { .. } => 409,
            ApiError::Internal(_) => 500,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { kind, detail } => ApiError::NotFound { kind, detail },
            RepositoryError::AlreadyExists { kind, detail } => {
                ApiError::AlreadyExists { kind, detail }
            }
            RepositoryError::InvalidRelation(detail) => ApiError::InvalidParameter(detail),
            RepositoryError::Internal(detail) => {
                error!(event = "Repository", phase = "Internal", detail = detail);
                ApiError::Internal("unexpected repository failure".to_string())
            }
        }
    }
}
