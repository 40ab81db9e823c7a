//! Engine error types
//!
//! Every variant is fatal: the run stops at the first one.

use miette::Diagnostic;
use sopsify_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    #[error(transparent)]
    #[diagnostic(code(sopsify::core))]
    Core(#[from] CoreError),

    #[error("Value entry for `{key}` has no namespaces (template `{template}`, cluster `{cluster}`)")]
    #[diagnostic(
        code(sopsify::values::empty_namespaces),
        help("list at least one namespace under `namespaces:`")
    )]
    EmptyNamespaces {
        key: String,
        template: String,
        cluster: String,
    },

    #[error("Invalid namespace `{namespace}` in value entry for `{key}` (template `{template}`, cluster `{cluster}`)")]
    #[diagnostic(
        code(sopsify::values::invalid_namespace),
        help("namespaces must be DNS-1123 labels: lowercase letters, digits and '-', at most 63 characters")
    )]
    InvalidNamespace {
        namespace: String,
        key: String,
        template: String,
        cluster: String,
    },

    #[error("Duplicate namespace in value entry for `{key}`: [{}] (template `{template}`, cluster `{cluster}`)", .namespaces.join(", "))]
    #[diagnostic(
        code(sopsify::values::duplicate_namespace),
        help("each namespace may appear only once in an entry's `namespaces` list")
    )]
    DuplicateNamespace {
        key: String,
        namespaces: Vec<String>,
        template: String,
        cluster: String,
    },

    #[error("Duplicate value for `{key}` in namespace `{namespace}` (template `{template}`, cluster `{cluster}`)")]
    #[diagnostic(
        code(sopsify::values::duplicate_value),
        help("combine the namespaces under one entry with a single value, or split them into entries with distinct namespaces")
    )]
    DuplicateValue {
        key: String,
        namespace: String,
        template: String,
        cluster: String,
    },

    #[error("Placeholder `${{{key}}}` has no value entry (template `{template}`, cluster `{cluster}`)")]
    #[diagnostic(
        code(sopsify::placeholder::missing_key),
        help("add a value entry with this key to the template binding")
    )]
    MissingKey {
        key: String,
        template: String,
        cluster: String,
    },

    #[error("Placeholder `${{{key}}}` has no value for namespace(s) [{}] (template `{template}`, cluster `{cluster}`)", .missing.join(", "))]
    #[diagnostic(
        code(sopsify::placeholder::missing_namespace),
        help("every namespace the template renders for needs a value for every placeholder")
    )]
    MissingNamespaceCoverage {
        key: String,
        missing: Vec<String>,
        template: String,
        cluster: String,
    },

    #[error("Invalid cluster name `{cluster}`")]
    #[diagnostic(
        code(sopsify::cluster::name),
        help("cluster names must be DNS-1123 labels: lowercase letters, digits and '-', at most 63 characters")
    )]
    InvalidClusterName { cluster: String },

    #[error("Cluster directory not found: {}", .path.display())]
    #[diagnostic(
        code(sopsify::cluster::directory),
        help("create the cluster directory or check the --root option")
    )]
    ClusterDirectory { cluster: String, path: PathBuf },

    #[error("Encryption failed for {}: {message}", .path.display())]
    #[diagnostic(code(sopsify::sops))]
    ExternalTool { path: PathBuf, message: String },

    #[error("Failed to serialize rendered secret: {0}")]
    #[diagnostic(code(sopsify::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error at {}: {source}", .path.display())]
    #[diagnostic(code(sopsify::io))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
