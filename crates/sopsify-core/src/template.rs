//! Secret templates: typed manifest, validation and loading

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// The only `kind` accepted for templates (compared case-insensitively)
pub const SECRET_KIND: &str = "Secret";

/// Which keyed section of a Secret holds the substitutable entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `data` (base64 values in a real Secret)
    Data,
    /// `stringData`
    StringData,
}

impl SectionKind {
    /// Field name as written in the manifest
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::StringData => "stringData",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A Kubernetes-Secret-shaped document
///
/// Fields other than the ones modelled here are kept in `extra` and written
/// back unchanged. Top-level keys are written in the order they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Mapping>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<IndexMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_data: Option<IndexMap<String, Value>>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,

    #[serde(skip)]
    field_order: Vec<String>,
}

/// The validated keyed section of a template
#[derive(Debug, Clone, Copy)]
pub struct KeyedSection<'a> {
    pub kind: SectionKind,
    pub entries: &'a IndexMap<String, Value>,
}

impl SecretManifest {
    /// Parse a manifest from YAML, remembering its top-level key order
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(yaml)?;
        let field_order = match &value {
            Value::Mapping(mapping) => mapping
                .keys()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        };

        let mut manifest: Self = serde_yaml::from_value(value)?;
        manifest.field_order = field_order;
        Ok(manifest)
    }

    /// Serialize the manifest back to YAML
    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        match serde_yaml::to_value(self)? {
            Value::Mapping(mapping) => serde_yaml::to_string(&self.in_source_order(mapping)),
            other => serde_yaml::to_string(&other),
        }
    }

    /// Reorder serialized keys to match the source document
    ///
    /// Keys absent from the source (a `metadata` created for the namespace)
    /// go right after the key that precedes them in field order.
    fn in_source_order(&self, mut mapping: Mapping) -> Mapping {
        let mut keys: Vec<Value> = self
            .field_order
            .iter()
            .map(|key| Value::from(key.as_str()))
            .filter(|key| mapping.contains_key(key))
            .collect();

        let mut previous: Option<usize> = None;
        for key in mapping.keys() {
            match keys.iter().position(|k| k == key) {
                Some(index) => previous = Some(index),
                None => {
                    let at = previous.map_or(0, |index| index + 1);
                    keys.insert(at, key.clone());
                    previous = Some(at);
                }
            }
        }

        keys.into_iter()
            .filter_map(|key| mapping.remove(&key).map(|value| (key, value)))
            .collect()
    }

    /// Check that this is a Secret with exactly one keyed section
    ///
    /// `path` only appears in error messages.
    pub fn validate(&self, path: &Path) -> Result<KeyedSection<'_>> {
        let invalid = |message: String| CoreError::Validation {
            path: path.to_path_buf(),
            message,
        };

        let kind = self.kind.as_deref().map(str::trim).unwrap_or_default();
        if kind.is_empty() {
            return Err(invalid("missing required field `kind`".to_string()));
        }
        if !kind.eq_ignore_ascii_case(SECRET_KIND) {
            return Err(invalid(format!(
                "field `kind` is `{}`, expected `{}`",
                kind, SECRET_KIND
            )));
        }

        match (&self.data, &self.string_data) {
            (Some(entries), None) => Ok(KeyedSection {
                kind: SectionKind::Data,
                entries,
            }),
            (None, Some(entries)) => Ok(KeyedSection {
                kind: SectionKind::StringData,
                entries,
            }),
            (None, None) => Err(invalid(
                "missing keyed section: expected `data` or `stringData`".to_string(),
            )),
            (Some(_), Some(_)) => Err(invalid(
                "both `data` and `stringData` are present, expected exactly one".to_string(),
            )),
        }
    }

    /// Mutable slot of a keyed section
    pub fn section_slot(&mut self, kind: SectionKind) -> &mut Option<IndexMap<String, Value>> {
        match kind {
            SectionKind::Data => &mut self.data,
            SectionKind::StringData => &mut self.string_data,
        }
    }

    /// `metadata.namespace`, if set to a string
    pub fn namespace(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
    }

    /// Set or overwrite `metadata.namespace`, creating `metadata` when absent
    pub fn set_namespace(&mut self, namespace: &str) {
        self.metadata
            .get_or_insert_with(Mapping::new)
            .insert(Value::from("namespace"), Value::from(namespace));
    }
}

/// A secret template loaded from disk
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub path: PathBuf,
    pub manifest: SecretManifest,
}

impl Template {
    /// Load and parse a template file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(path, &content)
    }

    /// Parse a template from YAML, `path` being its identity
    pub fn from_yaml(path: impl Into<PathBuf>, yaml: &str) -> Result<Self> {
        let path = path.into();
        let manifest = SecretManifest::from_yaml(yaml).map_err(|source| CoreError::YamlParse {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, manifest })
    }

    /// Validate the template, returning its keyed section
    pub fn validate(&self) -> Result<KeyedSection<'_>> {
        self.manifest.validate(&self.path)
    }

    /// File name of the template (`db.yaml`)
    pub fn base_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("secret.yaml")
    }

    /// Whether `name` designates this template
    pub fn matches(&self, name: &str) -> bool {
        path_matches(&self.path, name)
    }
}

/// Template sources found under a directory, keyed by path
///
/// Files are only parsed when a binding looks them up, so YAML files that
/// no binding refers to never fail a run.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    sources: BTreeMap<PathBuf, String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `.yaml`/`.yml` file below `dir`
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CoreError::TemplatesNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut set = Self::new();
        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_yaml_file(path) {
                set.insert(path, std::fs::read_to_string(path)?);
            }
        }

        tracing::debug!(dir = %dir.display(), templates = set.len(), "collected templates");
        Ok(set)
    }

    /// Load a single template file as a one-element set
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CoreError::TemplatesNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut set = Self::new();
        set.insert(path, std::fs::read_to_string(path)?);
        Ok(set)
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, yaml: impl Into<String>) {
        self.sources.insert(path.into(), yaml.into());
    }

    /// Parse the template a binding refers to (first match in path order)
    ///
    /// `None` when no file matches; a parse failure of the matched file is an error.
    pub fn find(&self, name: &str) -> Option<Result<Template>> {
        self.sources
            .iter()
            .find(|(path, _)| path_matches(path, name))
            .map(|(path, yaml)| Template::from_yaml(path.clone(), yaml))
    }

    /// Paths of every collected file, sorted
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sources.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// `name` matches when it is a trailing run of path components, with or
/// without the `.yaml`/`.yml` extension.
fn path_matches(path: &Path, name: &str) -> bool {
    let name = name.trim_start_matches("./");
    if name.is_empty() {
        return false;
    }
    path.ends_with(name)
        || path.ends_with(format!("{name}.yaml"))
        || path.ends_with(format!("{name}.yml"))
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "yaml" | "yml"))
}
