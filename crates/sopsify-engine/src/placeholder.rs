//! `${KEY}` placeholders
//!
//! A value is a placeholder only when the whole string is `${identifier}`,
//! with `identifier` matching `[A-Za-z_][A-Za-z0-9_-]*`. Anything else,
//! including embedded tokens like `prefix-${KEY}`, is a literal.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::collections::BTreeSet;

use crate::error::{EngineError, Result};
use crate::value_map::{BindingRef, ValueMap};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{([A-Za-z_][A-Za-z0-9_-]*)\}$").expect("valid regex"));

/// Identifier of a placeholder string, `None` for literals
pub fn parse_placeholder(value: &str) -> Option<&str> {
    PLACEHOLDER
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Identifier of a placeholder value; non-string values are literals
pub fn placeholder_of(value: &Value) -> Option<&str> {
    value.as_str().and_then(parse_placeholder)
}

/// Distinct identifiers used in a keyed section
pub fn collect_placeholders(entries: &IndexMap<String, Value>) -> BTreeSet<String> {
    entries
        .values()
        .filter_map(placeholder_of)
        .map(str::to_string)
        .collect()
}

/// Check that every placeholder has a value for every namespace of the binding
///
/// Identifiers are checked in sorted order. Returns the validated set.
pub fn resolve_placeholders(
    entries: &IndexMap<String, Value>,
    values: &ValueMap,
    binding: BindingRef<'_>,
) -> Result<BTreeSet<String>> {
    let placeholders = collect_placeholders(entries);

    for key in &placeholders {
        let Some(by_namespace) = values.namespaces_for(key) else {
            return Err(EngineError::MissingKey {
                key: key.clone(),
                template: binding.template.to_string(),
                cluster: binding.cluster.to_string(),
            });
        };

        let missing: Vec<String> = values
            .namespaces()
            .iter()
            .filter(|ns| !by_namespace.contains_key(*ns))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(EngineError::MissingNamespaceCoverage {
                key: key.clone(),
                missing,
                template: binding.template.to_string(),
                cluster: binding.cluster.to_string(),
            });
        }
    }

    Ok(placeholders)
}
