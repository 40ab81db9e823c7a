//! Encrypt command - render every binding, write it and encrypt it with sops

use sopsify_engine::{EncryptingWriter, RunCoordinator, RunReport, SopsEncryptor};
use std::path::Path;

use crate::SourceArgs;
use crate::display;
use crate::error::Result;

pub fn run(source: &SourceArgs, sops: &Path) -> Result<()> {
    let (config, templates) = super::load_inputs(source)?;

    display::print_step(&format!(
        "Encrypting secrets for {} cluster(s) with {}",
        config.select(&source.clusters)?.len(),
        sops.display()
    ));

    let writer = EncryptingWriter::new(SopsEncryptor::new(sops));
    let coordinator = RunCoordinator::new(&source.root, &config, &templates, writer)
        .only_clusters(&source.clusters);

    let mut report = RunReport::new();
    let outcome = coordinator.run(&mut report);

    display::print_written(&report);
    display::print_warnings(&report);
    outcome?;

    display::print_summary(&report, "encrypted");
    super::finish(&report, source.strict)
}
