//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use sopsify_core::CoreError;
use sopsify_engine::EngineError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Any fatal error raised while loading, validating or rendering
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    /// Warnings were reported and `--strict` was given
    #[error("{count} warning(s) reported in strict mode")]
    #[diagnostic(
        code(sopsify::cli::strict),
        help("fix the warnings above or run without --strict")
    )]
    StrictWarnings { count: usize },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(err) => engine_exit_code(err),
            CliError::StrictWarnings { .. } => exit_codes::VALIDATION_ERROR,
        }
    }
}

fn engine_exit_code(err: &EngineError) -> i32 {
    match err {
        EngineError::Core(core) => match core {
            CoreError::ConfigNotFound { .. }
            | CoreError::InvalidConfig { .. }
            | CoreError::UnknownCluster { .. } => exit_codes::CONFIG_ERROR,
            CoreError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CoreError::TemplatesNotFound { .. } | CoreError::YamlParse { .. } => {
                exit_codes::TEMPLATE_ERROR
            }
            CoreError::Io(_) => exit_codes::IO_ERROR,
        },
        EngineError::InvalidNamespace { .. } | EngineError::InvalidClusterName { .. } => {
            exit_codes::CONFIG_ERROR
        }
        EngineError::EmptyNamespaces { .. }
        | EngineError::DuplicateNamespace { .. }
        | EngineError::DuplicateValue { .. } => exit_codes::VALIDATION_ERROR,
        EngineError::MissingKey { .. } | EngineError::MissingNamespaceCoverage { .. } => {
            exit_codes::TEMPLATE_ERROR
        }
        EngineError::ClusterDirectory { .. } | EngineError::Io { .. } => exit_codes::IO_ERROR,
        EngineError::ExternalTool { .. } => exit_codes::EXTERNAL_TOOL_ERROR,
        EngineError::Yaml(_) => exit_codes::ERROR,
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Engine(err.into())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let missing_config: CliError = CoreError::ConfigNotFound {
            path: PathBuf::from(".sopsify.yaml"),
        }
        .into();
        assert_eq!(missing_config.exit_code(), exit_codes::CONFIG_ERROR);

        let coverage = CliError::from(EngineError::MissingNamespaceCoverage {
            key: "TOKEN".to_string(),
            missing: vec!["backend".to_string()],
            template: "api.yaml".to_string(),
            cluster: "production".to_string(),
        });
        assert_eq!(coverage.exit_code(), exit_codes::TEMPLATE_ERROR);

        let sops = CliError::from(EngineError::ExternalTool {
            path: PathBuf::from("db.yaml"),
            message: "exit status: 1".to_string(),
        });
        assert_eq!(sops.exit_code(), exit_codes::EXTERNAL_TOOL_ERROR);

        assert_eq!(
            CliError::StrictWarnings { count: 2 }.exit_code(),
            exit_codes::VALIDATION_ERROR
        );
    }
}
