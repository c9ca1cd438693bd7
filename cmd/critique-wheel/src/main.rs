//! # Critique-Wheel Binary
//!
//! The entry point that assembles the application: settings, rule files,
//! database, and the HTTP router.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::{load_credit_rules, load_roles, Settings};
use services::critiques::CritiqueLimits;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::load().context("failed to load settings")?;

    let roles = load_roles(&settings.rules.roles_path)
        .with_context(|| format!("failed to load roles from {}", settings.rules.roles_path))?;
    let credit_rules = load_credit_rules(&settings.rules.credit_rules_path).with_context(|| {
        format!(
            "failed to load credit rules from {}",
            settings.rules.credit_rules_path
        )
    })?;

    let pool = storage_adapters::connect(settings.database.url())
        .await
        .context("failed to open the database")?;

    let state = AppState {
        pool,
        roles: Arc::new(roles),
        credit_rules: Arc::new(credit_rules),
        work_max_words: settings.limits.work_max_words,
        critique_limits: CritiqueLimits {
            about_min_words: settings.limits.about_min_words,
            successes_min_words: settings.limits.successes_min_words,
            weaknesses_min_words: settings.limits.weaknesses_min_words,
            ideas_min_words: settings.limits.ideas_min_words,
        },
    };

    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "critique-wheel listening");

    axum::serve(listener, router(state))
        .await
        .context("server exited with an error")?;
    Ok(())
}
