//! Check command - validate everything without writing files

use sopsify_engine::{DiscardWriter, RunCoordinator, RunReport};

use crate::SourceArgs;
use crate::display;
use crate::error::Result;

pub fn run(source: &SourceArgs) -> Result<()> {
    let (config, templates) = super::load_inputs(source)?;

    display::print_step(&format!(
        "Checking {} cluster(s) against {} template(s)",
        config.select(&source.clusters)?.len(),
        templates.len()
    ));

    let coordinator = RunCoordinator::new(&source.root, &config, &templates, DiscardWriter)
        .only_clusters(&source.clusters);

    let mut report = RunReport::new();
    let outcome = coordinator.run(&mut report);

    display::print_warnings(&report);
    outcome?;

    display::print_summary(&report, "validated");
    super::finish(&report, source.strict)
}
