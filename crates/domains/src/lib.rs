//! critique-wheel/crates/domains/src/lib.rs
//!
//! The central domain logic for Critique Wheel: validated value objects,
//! aggregates with invariant-enforcing lifecycles, and the repository ports
//! the rest of the workspace plugs into.

pub mod credit;
pub mod critique;
pub mod error;
pub mod ids;
pub mod member;
pub mod profile;
pub mod rating;
pub mod repository;
pub mod work;

// Re-exporting for easier access in other crates
pub use credit::*;
pub use critique::*;
pub use error::*;
pub use ids::*;
pub use member::*;
pub use profile::*;
pub use rating::*;
pub use repository::*;
pub use work::*;
