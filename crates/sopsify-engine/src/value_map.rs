//! Key → namespace → value table for one template binding

use sopsify_core::ValueEntry;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{EngineError, Result};
use crate::layout::is_dns_label;

/// Cluster and template a binding belongs to, for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingRef<'a> {
    pub cluster: &'a str,
    pub template: &'a str,
}

impl<'a> BindingRef<'a> {
    pub fn new(cluster: &'a str, template: &'a str) -> Self {
        Self { cluster, template }
    }
}

/// Resolved values of one binding, plus the union of its namespaces
///
/// A `(key, namespace)` pair is declared at most once across the binding:
/// namespaces sharing a value belong in one entry, different values go in
/// entries with disjoint namespace lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMap {
    values: BTreeMap<String, BTreeMap<String, String>>,
    namespaces: BTreeSet<String>,
}

impl ValueMap {
    /// Build the table from a binding's entries, in declaration order
    pub fn build(entries: &[ValueEntry], binding: BindingRef<'_>) -> Result<Self> {
        let mut map = Self::default();

        for entry in entries {
            if entry.namespaces.is_empty() {
                return Err(EngineError::EmptyNamespaces {
                    key: entry.key.clone(),
                    template: binding.template.to_string(),
                    cluster: binding.cluster.to_string(),
                });
            }

            if let Some(invalid) = entry.namespaces.iter().find(|ns| !is_dns_label(ns.as_str())) {
                return Err(EngineError::InvalidNamespace {
                    namespace: invalid.clone(),
                    key: entry.key.clone(),
                    template: binding.template.to_string(),
                    cluster: binding.cluster.to_string(),
                });
            }

            let mut seen = BTreeSet::new();
            if !entry.namespaces.iter().all(|ns| seen.insert(ns.as_str())) {
                return Err(EngineError::DuplicateNamespace {
                    key: entry.key.clone(),
                    namespaces: entry.namespaces.clone(),
                    template: binding.template.to_string(),
                    cluster: binding.cluster.to_string(),
                });
            }

            let by_namespace = map.values.entry(entry.key.clone()).or_default();
            for namespace in &entry.namespaces {
                map.namespaces.insert(namespace.clone());

                match by_namespace.entry(namespace.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(entry.value.clone());
                    }
                    Entry::Occupied(_) => {
                        return Err(EngineError::DuplicateValue {
                            key: entry.key.clone(),
                            namespace: namespace.clone(),
                            template: binding.template.to_string(),
                            cluster: binding.cluster.to_string(),
                        });
                    }
                }
            }
        }

        Ok(map)
    }

    /// Value of `key` for `namespace`
    pub fn get(&self, key: &str, namespace: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|by_ns| by_ns.get(namespace))
            .map(String::as_str)
    }

    /// All namespace → value pairs declared for `key`
    pub fn namespaces_for(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Declared keys, sorted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Every namespace referenced by the binding, sorted
    pub fn namespaces(&self) -> &BTreeSet<String> {
        &self.namespaces
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
