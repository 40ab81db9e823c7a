//! Render command - print rendered secrets to stdout
//!
//! Nothing is written to disk and sops is never invoked. Each document is
//! preceded by a `# Source:` comment naming the file `encrypt` would write.

use console::style;
use sopsify_engine::{DocumentWriter, RenderedDocument, RunCoordinator, RunReport};
use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::SourceArgs;
use crate::display;
use crate::error::Result;

/// Prints documents as a multi-document YAML stream
#[derive(Default)]
struct StdoutWriter {
    printed: Cell<usize>,
}

impl DocumentWriter for StdoutWriter {
    fn write(
        &self,
        document: &RenderedDocument,
        target: &Path,
    ) -> sopsify_engine::Result<Option<PathBuf>> {
        let yaml = document.to_yaml()?;

        println!("---");
        println!("{}", style(format!("# Source: {}", target.display())).dim());
        print!("{}", yaml);

        self.printed.set(self.printed.get() + 1);
        Ok(None)
    }
}

pub fn run(source: &SourceArgs) -> Result<()> {
    let (config, templates) = super::load_inputs(source)?;

    let coordinator =
        RunCoordinator::new(&source.root, &config, &templates, StdoutWriter::default())
            .only_clusters(&source.clusters);

    let mut report = RunReport::new();
    let outcome = coordinator.run(&mut report);

    display::print_warnings(&report);
    outcome?;

    tracing::debug!(documents = coordinator.writer().printed.get(), "rendered to stdout");
    super::finish(&report, source.strict)
}
