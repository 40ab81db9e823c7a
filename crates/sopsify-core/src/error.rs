//! Core error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Config file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Unknown cluster: {name} (not declared in config)")]
    UnknownCluster { name: String },

    #[error("Invalid template {}: {message}", .path.display())]
    Validation { path: PathBuf, message: String },

    #[error("Templates not found: {}", .path.display())]
    TemplatesNotFound { path: PathBuf },

    #[error("Failed to parse {}: {source}", .path.display())]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether this error comes from the configuration file rather than a template
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::InvalidConfig { .. } | Self::UnknownCluster { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
