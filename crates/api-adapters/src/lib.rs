//! critique-wheel/crates/api-adapters/src/lib.rs
//!
//! The HTTP surface: an axum router over the service layer. Handlers open
//! one unit of work per request and commit only on success, so a failing
//! request leaves no partial writes behind.

pub mod error;
pub mod handlers;
pub mod schemas;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use domains::{CreditRules, RolePermissions};
use services::critiques::CritiqueLimits;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub roles: Arc<RolePermissions>,
    pub credit_rules: Arc<CreditRules>,
    pub work_max_words: usize,
    pub critique_limits: CritiqueLimits,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .route("/members", post(handlers::register_member))
        .route("/members/login", post(handlers::login_member))
        .route("/members/{id}", get(handlers::get_member))
        .route("/members/{id}/credits", get(handlers::member_credits))
        .route("/works", post(handlers::create_work).get(handlers::list_works))
        .route("/works/{id}", get(handlers::get_work))
        .route("/works/{id}/approve", post(handlers::approve_work))
        .route("/works/{id}/critiques", post(handlers::create_critique))
        .route("/critiques/{id}/ratings", post(handlers::create_rating))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
