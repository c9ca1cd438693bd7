//! # ServiceError
//!
//! Domain failures are re-wrapped, never swallowed; repository failures pass
//! through as opaque internals the HTTP adapter maps to 500.

use domains::DomainError;
use thiserror::Error;

/// The primary error type for all service operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A repository lookup by id/email/username found nothing.
    #[error("{0} not found")]
    NotFound(String),

    /// A service-level uniqueness check (email/username/work id) failed.
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    /// Login or password verification failed. Deliberately carries no
    /// detail about which part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A domain invariant rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage-layer failure (connection, transaction, mapping).
    #[error("repository error: {0}")]
    Repository(#[from] anyhow::Error),
}

/// A specialized Result type for service logic.
pub type Result<T> = std::result::Result<T, ServiceError>;
