//! Environment-driven settings with sensible defaults.

use config::Config;
use domains::{
    DEFAULT_ABOUT_MIN_WORDS, DEFAULT_IDEAS_MIN_WORDS, DEFAULT_SUCCESSES_MIN_WORDS,
    DEFAULT_WEAKNESSES_MIN_WORDS, DEFAULT_WORK_MAX_WORDS,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub limits: LimitSettings,
    pub rules: RuleFileSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    url: SecretString,
}

impl DatabaseSettings {
    pub fn url(&self) -> &str {
        self.url.expose_secret()
    }
}

/// Word-count limits injected into the value-object constructors.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LimitSettings {
    pub work_max_words: usize,
    pub about_min_words: usize,
    pub successes_min_words: usize,
    pub weaknesses_min_words: usize,
    pub ideas_min_words: usize,
}

/// Paths to the declarative rule files.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleFileSettings {
    pub roles_path: String,
    pub credit_rules_path: String,
}

impl Settings {
    /// Loads `.env` if present, then layers `CW__`-prefixed environment
    /// variables over the defaults, e.g.
    /// `CW__DATABASE__URL=sqlite:critique_wheel.db`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let settings = Config::builder()
            .set_default("application.host", "127.0.0.1")?
            .set_default("application.port", 8000_i64)?
            .set_default("database.url", "sqlite:critique_wheel.db")?
            .set_default("limits.work_max_words", DEFAULT_WORK_MAX_WORDS as i64)?
            .set_default("limits.about_min_words", DEFAULT_ABOUT_MIN_WORDS as i64)?
            .set_default(
                "limits.successes_min_words",
                DEFAULT_SUCCESSES_MIN_WORDS as i64,
            )?
            .set_default(
                "limits.weaknesses_min_words",
                DEFAULT_WEAKNESSES_MIN_WORDS as i64,
            )?
            .set_default("limits.ideas_min_words", DEFAULT_IDEAS_MIN_WORDS as i64)?
            .set_default("rules.roles_path", "config/roles.yaml")?
            .set_default("rules.credit_rules_path", "config/credit_rules.yaml")?
            .add_source(config::Environment::with_prefix("CW").separator("__"))
            .build()?;
        let settings: Settings = settings.try_deserialize()?;
        debug!(
            host = %settings.application.host,
            port = settings.application.port,
            "settings loaded"
        );
        Ok(settings)
    }
}
