use attrguard_validator::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a model configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not have the expected shape.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file is not valid JSON or does not have the expected shape.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule declaration could not be compiled.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
