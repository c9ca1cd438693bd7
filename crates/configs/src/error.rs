use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// A structurally valid YAML document whose contents break the rule
    /// file contract.
    #[error("{0}")]
    InvalidRules(String),

    #[error(transparent)]
    Settings(#[from] config::ConfigError),
}
