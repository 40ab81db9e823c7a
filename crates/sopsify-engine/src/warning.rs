//! Non-fatal findings collected during a run

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A binding names a template that was not loaded; the binding is skipped
    TemplateNotFound { cluster: String, template: String },

    /// A value key that no placeholder of its template consumed
    UnusedKey {
        cluster: String,
        template: String,
        key: String,
    },

    /// The template's own `metadata.namespace` was replaced at render time
    NamespaceOverridden {
        cluster: String,
        template: String,
        namespace: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateNotFound { cluster, template } => write!(
                f,
                "template `{template}` not found, skipping it for cluster `{cluster}`"
            ),
            Self::UnusedKey {
                cluster,
                template,
                key,
            } => write!(
                f,
                "key `{key}` is not used by template `{template}` (cluster `{cluster}`)"
            ),
            Self::NamespaceOverridden {
                cluster,
                template,
                namespace,
            } => write!(
                f,
                "template `{template}` sets namespace `{namespace}`, overridden per namespace (cluster `{cluster}`)"
            ),
        }
    }
}
