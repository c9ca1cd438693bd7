//! # DomainError
//!
//! Centralized error handling for the domain layer. Aggregate factories and
//! value-object constructors fail fast with one of these; the service layer
//! re-wraps them, never swallows them.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A required field was empty or absent at aggregate creation.
    #[error("missing required field: {0}")]
    MissingEntry(String),

    /// A value object's constraint was violated (length, word count,
    /// numeric range, malformed identifier string).
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Password fails the strength policy.
    #[error("password does not meet the policy requirements: {0}")]
    WeakPassword(String),

    /// Password and confirmation differ during registration.
    #[error("passwords do not match")]
    NonMatchingPasswords,

    /// Password verification failed during a change-password or login flow.
    #[error("incorrect credentials")]
    IncorrectCredentials,

    /// A non-admin attempted an admin-only action.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Attempted to add an already-present child entity to a collection.
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Attempted to attach a critique to a work that is not ACTIVE.
    #[error("this work is not available for critique")]
    NotAvailableForCritique,
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
