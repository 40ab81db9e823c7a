//! Sopsify Core - Core types for rendering sops-encrypted Kubernetes secrets
//!
//! This crate provides the foundational types used throughout sopsify:
//! - `Config`: The `.sopsify.yaml` cluster/template/value bindings
//! - `SecretManifest`: The typed shape of a Secret template
//! - `Template`/`TemplateSet`: Loaded templates with name lookup
//! - `KeyedSection`: The validated `data`/`stringData` block of a template

pub mod config;
pub mod error;
pub mod template;

pub use config::{ClusterSpec, Config, DEFAULT_CONFIG_FILE, TemplateBinding, ValueEntry};
pub use error::{CoreError, Result};
pub use template::{KeyedSection, SECRET_KIND, SecretManifest, SectionKind, Template, TemplateSet};
