//! Run coordination: clusters → template bindings → namespaces
//!
//! Processing is sequential in declaration order and stops at the first fatal
//! error. Warnings and written files are recorded in a [`RunReport`] owned by
//! the caller, so whatever happened before a failure can still be shown.

use sopsify_core::{ClusterSpec, Config, TemplateBinding, TemplateSet};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::layout::{check_cluster_dir, target_path};
use crate::output::DocumentWriter;
use crate::placeholder::resolve_placeholders;
use crate::renderer::Renderer;
use crate::value_map::{BindingRef, ValueMap};
use crate::warning::Warning;

/// What a run did, filled in as it goes
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub warnings: Vec<Warning>,
    /// Final paths of written files
    pub written: Vec<PathBuf>,
    /// Bindings rendered successfully
    pub bindings: usize,
    /// Documents rendered across all bindings
    pub documents: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Drives validation, rendering and writing for a whole configuration
pub struct RunCoordinator<'a, W> {
    root: PathBuf,
    config: &'a Config,
    templates: &'a TemplateSet,
    writer: W,
    only_clusters: Vec<String>,
}

impl<'a, W: DocumentWriter> RunCoordinator<'a, W> {
    /// `root` is the directory containing `clusters/`
    pub fn new(
        root: impl Into<PathBuf>,
        config: &'a Config,
        templates: &'a TemplateSet,
        writer: W,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            templates,
            writer,
            only_clusters: Vec::new(),
        }
    }

    /// Restrict the run to these clusters (empty means all)
    pub fn only_clusters(mut self, clusters: &[String]) -> Self {
        self.only_clusters = clusters.to_vec();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Process every selected cluster, stopping at the first fatal error
    pub fn run(&self, report: &mut RunReport) -> Result<()> {
        for cluster in self.config.select(&self.only_clusters)? {
            self.run_cluster(cluster, report)?;
        }
        Ok(())
    }

    fn run_cluster(&self, cluster: &ClusterSpec, report: &mut RunReport) -> Result<()> {
        check_cluster_dir(&self.root, &cluster.name)?;
        tracing::debug!(cluster = %cluster.name, bindings = cluster.bindings.len(), "processing cluster");

        for binding in &cluster.bindings {
            self.run_binding(&cluster.name, binding, report)?;
        }
        Ok(())
    }

    fn run_binding(
        &self,
        cluster: &str,
        binding: &TemplateBinding,
        report: &mut RunReport,
    ) -> Result<()> {
        let Some(template) = self.templates.find(&binding.template) else {
            report.warn(Warning::TemplateNotFound {
                cluster: cluster.to_string(),
                template: binding.template.clone(),
            });
            return Ok(());
        };
        let template = template?;

        let context = BindingRef::new(cluster, &binding.template);
        let section = template.validate()?;
        let values = ValueMap::build(&binding.values, context)?;
        resolve_placeholders(section.entries, &values, context)?;

        tracing::debug!(
            cluster,
            template = %template.path.display(),
            section = %section.kind,
            namespaces = values.namespaces().len(),
            "rendering binding"
        );

        if let Some(existing) = template.manifest.namespace() {
            if values.namespaces().iter().any(|ns| ns != existing) {
                report.warn(Warning::NamespaceOverridden {
                    cluster: cluster.to_string(),
                    template: binding.template.clone(),
                    namespace: existing.to_string(),
                });
            }
        }

        let output = Renderer::new(&template.manifest, section, &values, context).render_all()?;

        for document in &output.documents {
            let target = target_path(&self.root, cluster, &document.namespace, template.base_name());

            if let Some(written) = self.writer.write(document, &target)? {
                tracing::debug!(path = %written.display(), "wrote secret");
                report.written.push(written);
            }
            report.documents += 1;
        }

        for key in output.unused_keys(&values) {
            report.warn(Warning::UnusedKey {
                cluster: cluster.to_string(),
                template: binding.template.clone(),
                key: key.to_string(),
            });
        }

        report.bindings += 1;
        Ok(())
    }
}
