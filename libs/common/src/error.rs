//! Store-level error types shared by every service
//!
//! Repositories surface these instead of raw sqlx errors so callers can
//! translate them into their own boundary errors without leaking driver
//! details.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error type for operations against the backing store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error occurred while establishing a connection
    #[error("store connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred while executing a query
    #[error("store query error: {0}")]
    Query(#[source] SqlxError),

    /// Store configuration was invalid or missing
    #[error("store configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
