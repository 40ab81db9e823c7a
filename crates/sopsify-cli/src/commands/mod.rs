//! CLI commands

pub mod check;
pub mod encrypt;
pub mod render;

use sopsify_core::{Config, TemplateSet};
use sopsify_engine::RunReport;

use crate::SourceArgs;
use crate::error::{CliError, Result};

/// Load the configuration and the templates named by the command line
pub(crate) fn load_inputs(source: &SourceArgs) -> Result<(Config, TemplateSet)> {
    let config = Config::from_file(&source.config)?;

    let templates = match &source.file {
        Some(file) => TemplateSet::load_file(file)?,
        None => TemplateSet::load_dir(&source.templates)?,
    };

    tracing::debug!(
        clusters = config.clusters.len(),
        templates = templates.len(),
        "inputs loaded"
    );
    Ok((config, templates))
}

/// Turn remaining warnings into an error in strict mode
pub(crate) fn finish(report: &RunReport, strict: bool) -> Result<()> {
    if strict && report.has_warnings() {
        return Err(CliError::StrictWarnings {
            count: report.warnings.len(),
        });
    }
    Ok(())
}
