//! critique-wheel/crates/storage-adapters/src/lib.rs
//!
//! Implementations of the `domains` repository ports: SQLite adapters bound
//! to a transactional unit of work, and in-memory fakes for tests.

pub mod memory;
pub mod sqlite;

pub use memory::{InMemoryStore, InMemoryUnitOfWork};
pub use sqlite::{connect, SqliteUnitOfWork};
