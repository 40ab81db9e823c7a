//! Per-namespace rendering of a validated template

use indexmap::IndexMap;
use serde_yaml::Value;
use sopsify_core::{KeyedSection, SecretManifest};
use std::collections::BTreeSet;

use crate::error::{EngineError, Result};
use crate::placeholder::placeholder_of;
use crate::value_map::{BindingRef, ValueMap};

/// A template rendered for one namespace
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub namespace: String,
    pub manifest: SecretManifest,
}

impl RenderedDocument {
    pub fn to_yaml(&self) -> Result<String> {
        Ok(self.manifest.to_yaml()?)
    }
}

/// Every document of a binding plus the keys they consumed
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    pub documents: Vec<RenderedDocument>,
    pub used_keys: BTreeSet<String>,
}

impl RenderOutput {
    /// Keys of `values` that no placeholder consumed
    pub fn unused_keys<'a>(&'a self, values: &'a ValueMap) -> impl Iterator<Item = &'a str> + 'a {
        values.keys().filter(|key| !self.used_keys.contains(*key))
    }
}

/// Renders one template against the values of a binding
///
/// The placeholders are expected to be resolved already; a gap found while
/// rendering is still reported as `MissingNamespaceCoverage`.
pub struct Renderer<'a> {
    manifest: &'a SecretManifest,
    section: KeyedSection<'a>,
    values: &'a ValueMap,
    binding: BindingRef<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(
        manifest: &'a SecretManifest,
        section: KeyedSection<'a>,
        values: &'a ValueMap,
        binding: BindingRef<'a>,
    ) -> Self {
        Self {
            manifest,
            section,
            values,
            binding,
        }
    }

    /// Render the template for `namespace`, recording consumed keys in `used`
    pub fn render_namespace(
        &self,
        namespace: &str,
        used: &mut BTreeSet<String>,
    ) -> Result<RenderedDocument> {
        let mut entries = IndexMap::with_capacity(self.section.entries.len());

        for (field, value) in self.section.entries {
            let rendered = match placeholder_of(value) {
                Some(key) => {
                    let resolved = self.values.get(key, namespace).ok_or_else(|| {
                        EngineError::MissingNamespaceCoverage {
                            key: key.to_string(),
                            missing: vec![namespace.to_string()],
                            template: self.binding.template.to_string(),
                            cluster: self.binding.cluster.to_string(),
                        }
                    })?;
                    used.insert(key.to_string());
                    Value::from(resolved)
                }
                None => value.clone(),
            };
            entries.insert(field.clone(), rendered);
        }

        let mut manifest = self.manifest.clone();
        *manifest.section_slot(self.section.kind) = Some(entries);
        manifest.set_namespace(namespace);

        Ok(RenderedDocument {
            namespace: namespace.to_string(),
            manifest,
        })
    }

    /// Render every namespace of the binding, in sorted order
    pub fn render_all(&self) -> Result<RenderOutput> {
        let mut output = RenderOutput::default();
        for namespace in self.values.namespaces() {
            let document = self.render_namespace(namespace, &mut output.used_keys)?;
            output.documents.push(document);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::resolve_placeholders;
    use sopsify_core::{Template, ValueEntry};

    const BINDING: BindingRef<'static> = BindingRef {
        cluster: "production",
        template: "db.yaml",
    };

    fn render(template_yaml: &str, entries: &[ValueEntry]) -> (RenderOutput, ValueMap) {
        let template = Template::from_yaml("templates/db.yaml", template_yaml).unwrap();
        let section = template.validate().unwrap();
        let values = ValueMap::build(entries, BINDING).unwrap();
        resolve_placeholders(section.entries, &values, BINDING).unwrap();

        let output = Renderer::new(&template.manifest, section, &values, BINDING)
            .render_all()
            .unwrap();
        (output, values)
    }

    fn field<'a>(doc: &'a RenderedDocument, name: &str) -> &'a Value {
        doc.manifest
            .string_data
            .as_ref()
            .and_then(|s| s.get(name))
            .unwrap()
    }

    #[test]
    fn test_one_document_per_namespace() {
        let (output, _) = render(
            "kind: Secret\nstringData:\n  password: ${DB_PASSWORD}\n",
            &[ValueEntry::new("DB_PASSWORD", "secret1", ["frontend", "backend"])],
        );

        let namespaces: Vec<_> = output.documents.iter().map(|d| d.namespace.as_str()).collect();
        assert_eq!(namespaces, vec!["backend", "frontend"]);

        for doc in &output.documents {
            assert_eq!(field(doc, "password"), &Value::from("secret1"));
            assert_eq!(doc.manifest.namespace(), Some(doc.namespace.as_str()));
        }
        assert!(output.used_keys.contains("DB_PASSWORD"));
    }

    #[test]
    fn test_values_differ_per_namespace() {
        let (output, _) = render(
            "kind: Secret\nstringData:\n  token: ${TOKEN}\n",
            &[
                ValueEntry::new("TOKEN", "a", ["frontend"]),
                ValueEntry::new("TOKEN", "b", ["backend"]),
            ],
        );

        assert_eq!(output.documents[0].namespace, "backend");
        assert_eq!(field(&output.documents[0], "token"), &Value::from("b"));
        assert_eq!(field(&output.documents[1], "token"), &Value::from("a"));
    }

    #[test]
    fn test_literals_untouched() {
        let (output, _) = render(
            "kind: Secret\nstringData:\n  mode: plain-text\n  odd: ${bad key}\n  key: ${KEY}\n",
            &[ValueEntry::new("KEY", "v", ["frontend", "backend"])],
        );

        for doc in &output.documents {
            assert_eq!(field(doc, "mode"), &Value::from("plain-text"));
            assert_eq!(field(doc, "odd"), &Value::from("${bad key}"));
            assert_eq!(field(doc, "key"), &Value::from("v"));
        }
    }

    #[test]
    fn test_literal_only_template_identical_across_namespaces() {
        let (output, _) = render(
            "kind: Secret\nmetadata:\n  name: static\nstringData:\n  mode: plain-text\n",
            &[ValueEntry::new("UNUSED", "x", ["frontend", "backend"])],
        );

        assert_eq!(output.documents.len(), 2);
        let backend = output.documents[0].to_yaml().unwrap();
        let frontend = output.documents[1].to_yaml().unwrap();
        assert_eq!(backend.replace("backend", "frontend"), frontend);
        assert!(backend.contains("mode: plain-text"));
    }

    #[test]
    fn test_unused_keys() {
        let (output, values) = render(
            "kind: Secret\ndata:\n  token: ${TOKEN}\n",
            &[
                ValueEntry::new("TOKEN", "a", ["frontend"]),
                ValueEntry::new("LEFTOVER", "b", ["frontend"]),
            ],
        );

        let unused: Vec<_> = output.unused_keys(&values).collect();
        assert_eq!(unused, vec!["LEFTOVER"]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let yaml = r#"apiVersion: v1
kind: Secret
metadata:
  name: db
  labels:
    app: db
type: Opaque
stringData:
  user: ${DB_USER}
  password: ${DB_PASSWORD}
  host: db.internal
"#;
        let entries = [
            ValueEntry::new("DB_USER", "app", ["frontend", "backend"]),
            ValueEntry::new("DB_PASSWORD", "pw", ["frontend", "backend"]),
        ];

        let (first, _) = render(yaml, &entries);
        let (second, _) = render(yaml, &entries);

        let first: Vec<_> = first.documents.iter().map(|d| d.to_yaml().unwrap()).collect();
        let second: Vec<_> = second.documents.iter().map(|d| d.to_yaml().unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rendered_yaml_shape() {
        let (output, _) = render(
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: db\ntype: Opaque\nimmutable: true\nstringData:\n  password: ${DB_PASSWORD}\n",
            &[ValueEntry::new("DB_PASSWORD", "secret1", ["backend"])],
        );

        let yaml = output.documents[0].to_yaml().unwrap();
        assert_eq!(
            yaml,
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: db\n  namespace: backend\ntype: Opaque\nimmutable: true\nstringData:\n  password: secret1\n"
        );
    }

    #[test]
    fn test_template_namespace_overwritten() {
        let (output, _) = render(
            "kind: Secret\nmetadata:\n  namespace: default\nstringData:\n  a: ${A}\n",
            &[ValueEntry::new("A", "1", ["frontend"])],
        );
        assert_eq!(output.documents[0].manifest.namespace(), Some("frontend"));
    }

    #[test]
    fn test_unresolved_gap_reported() {
        let template =
            Template::from_yaml("db.yaml", "kind: Secret\nstringData:\n  t: ${TOKEN}\n").unwrap();
        let section = template.validate().unwrap();
        let values = ValueMap::build(
            &[
                ValueEntry::new("TOKEN", "a", ["frontend"]),
                ValueEntry::new("OTHER", "b", ["backend"]),
            ],
            BINDING,
        )
        .unwrap();

        let err = Renderer::new(&template.manifest, section, &values, BINDING)
            .render_all()
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingNamespaceCoverage { .. }));
    }
}
