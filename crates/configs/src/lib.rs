//! critique-wheel/crates/configs/src/lib.rs
//!
//! Runtime configuration: environment-driven settings plus the two
//! declarative YAML rule files (role permissions and credit awards) that
//! are loaded once at startup and injected into the domain.

pub mod credit_rules;
pub mod error;
pub mod roles;
pub mod settings;

pub use credit_rules::{load_credit_rules, parse_credit_rules};
pub use error::ConfigError;
pub use roles::{load_roles, parse_roles};
pub use settings::Settings;
