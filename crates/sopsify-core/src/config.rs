//! Cluster/template/value bindings loaded from `.sopsify.yaml`
//!
//! The file is a list of single-key mappings, one per cluster:
//!
//! ```yaml
//! - production:
//!     - template: db-credentials.yaml
//!       values:
//!         - key: DB_PASSWORD
//!           value: s3cret
//!           namespaces: [frontend, backend]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".sopsify.yaml";

/// A literal value bound to a key for a set of namespaces
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueEntry {
    /// Placeholder identifier this entry provides a value for
    pub key: String,

    /// The secret value (scalars are accepted and kept as written)
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,

    /// Namespaces receiving this value
    #[serde(default)]
    pub namespaces: Vec<String>,
}

impl ValueEntry {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        namespaces: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }
}

/// A template together with the values rendered into it for one cluster
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateBinding {
    /// Template file name, or a path suffix matching one loaded template
    pub template: String,

    #[serde(default)]
    pub values: Vec<ValueEntry>,
}

/// A deployment cluster and its template bindings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, Vec<TemplateBinding>>")]
pub struct ClusterSpec {
    pub name: String,
    pub bindings: Vec<TemplateBinding>,
}

impl TryFrom<IndexMap<String, Vec<TemplateBinding>>> for ClusterSpec {
    type Error = String;

    fn try_from(entry: IndexMap<String, Vec<TemplateBinding>>) -> std::result::Result<Self, Self::Error> {
        if entry.len() != 1 {
            let names: Vec<_> = entry.keys().map(String::as_str).collect();
            return Err(format!(
                "each cluster entry must have exactly one key (the cluster name), found {}: [{}]",
                entry.len(),
                names.join(", ")
            ));
        }

        let (name, bindings) = entry.into_iter().next().unwrap_or_default();
        Ok(Self { name, bindings })
    }
}

/// The whole `.sopsify.yaml` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub clusters: Vec<ClusterSpec>,
}

impl Config {
    /// Load the configuration, failing with `ConfigNotFound` when the file is absent
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CoreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content).map_err(|e| CoreError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            path = %path.display(),
            clusters = config.clusters.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parse configuration from a YAML string (an empty document is an empty config)
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Get a cluster by name
    pub fn cluster(&self, name: &str) -> Option<&ClusterSpec> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Clusters to process, in declaration order
    ///
    /// An empty filter selects every cluster. Names in the filter that are not
    /// declared fail with `UnknownCluster`.
    pub fn select(&self, only: &[String]) -> Result<Vec<&ClusterSpec>> {
        if let Some(unknown) = only.iter().find(|name| self.cluster(name).is_none()) {
            return Err(CoreError::UnknownCluster {
                name: unknown.clone(),
            });
        }

        Ok(self
            .clusters
            .iter()
            .filter(|c| only.is_empty() || only.contains(&c.name))
            .collect())
    }
}

fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "`value` must be a string, number or boolean, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
- production:
    - template: db-credentials.yaml
      values:
        - key: DB_PASSWORD
          value: s3cret
          namespaces: [frontend, backend]
        - key: DB_PORT
          value: 5432
          namespaces: [backend]
- staging:
    - template: api.yaml
      values: []
"#;

    #[test]
    fn test_parse_clusters_in_order() {
        let config = Config::from_yaml(SAMPLE).unwrap();

        let names: Vec<_> = config.clusters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["production", "staging"]);

        let production = config.cluster("production").unwrap();
        assert_eq!(production.bindings.len(), 1);
        assert_eq!(production.bindings[0].template, "db-credentials.yaml");
        assert_eq!(
            production.bindings[0].values[0],
            ValueEntry::new("DB_PASSWORD", "s3cret", ["frontend", "backend"])
        );
    }

    #[test]
    fn test_numeric_value_kept_as_string() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        let entry = &config.clusters[0].bindings[0].values[1];
        assert_eq!(entry.value, "5432");
    }

    #[test]
    fn test_cluster_entry_needs_single_key() {
        let yaml = r#"
- production: []
  staging: []
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("exactly one key"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
- production:
    - template: a.yaml
      valeus: []
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_empty_document() {
        let config = Config::from_yaml("  \n").unwrap();
        assert!(config.clusters.is_empty());
    }

    #[test]
    fn test_select_filters_clusters() {
        let config = Config::from_yaml(SAMPLE).unwrap();

        assert_eq!(config.select(&[]).unwrap().len(), 2);

        let only = config.select(&["staging".to_string()]).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name, "staging");

        let err = config.select(&["qa".to_string()]).unwrap_err();
        assert!(matches!(err, CoreError::UnknownCluster { name } if name == "qa"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::from_file(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, CoreError::ConfigNotFound { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "production: [").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }
}
