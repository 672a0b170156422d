//! Error types for the grace layer.
//!
//! Grace state itself has no error cases ("not in grace" is an answer,
//! not a failure). Only loading configuration can fail.

use std::path::PathBuf;

/// Errors that can occur while loading a [`GraceConfig`](crate::GraceConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The default config file could not be written.
    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML is malformed or a value has the wrong type (e.g. a
    /// negative or fractional duration).
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The YAML parsed but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
