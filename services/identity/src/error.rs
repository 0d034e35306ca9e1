//! Boundary error taxonomy for the identity service
//!
//! Store-layer failures are logged where they happen and translated into
//! `StoreUnavailable`; raw driver errors never reach a response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::response;

/// Error type mapped onto the standard response envelope
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request shape, rejected before the core is reached
    #[error("{0}")]
    InvalidInput(String),

    /// Missing, malformed, or expired authentication token
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but lacking a grant for the requested operation
    #[error("Module access not permitted")]
    ModuleAccessDenied,

    /// No matching credential, entity, or record
    #[error("{0}")]
    NotFound(String),

    /// Password verification failed
    #[error("incorrect password provided")]
    InvalidCredential,

    /// Unique-constraint collision on a permission set name
    #[error("Permission with same name already exist")]
    DuplicateName,

    /// Permission name did not resolve for the entity
    #[error("permission name provided doesn't exist")]
    UnknownPermissionName,

    /// Domain-rule violation
    #[error("{0}")]
    ValidationError(String),

    /// I/O failure against the backing store
    #[error("{0}")]
    StoreUnavailable(String),
}

impl ApiError {
    /// Log a store failure with context and surface it as `StoreUnavailable`
    /// carrying only the human-readable message.
    pub fn store(message: &str, err: sqlx::Error) -> Self {
        error!("{message}: {err}");
        ApiError::StoreUnavailable(message.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::NotFound(_)
            | ApiError::InvalidCredential
            | ApiError::DuplicateName
            | ApiError::UnknownPermissionName
            | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::ModuleAccessDenied => StatusCode::FORBIDDEN,
            ApiError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        response::failure(self.status(), &self.to_string())
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
