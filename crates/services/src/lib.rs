//! critique-wheel/crates/services/src/lib.rs
//!
//! Orchestration layer: validates primitive inputs into value objects,
//! drives the aggregates, and talks to storage through the repository ports.
//! Every function is generic over the ports so it runs unchanged against
//! SQLite adapters, in-memory fakes, or mocks.

pub mod credits;
pub mod critiques;
pub mod error;
pub mod iam;
pub mod ratings;
pub mod works;

pub use error::{Result, ServiceError};
