//! Display formatting for CLI output
//!
//! Progress lines go to stdout, warnings to stderr so `render` output stays
//! valid YAML.

use console::style;
use sopsify_engine::{RunReport, Warning};

/// Print a step header
pub fn print_step(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Print every file the run wrote
pub fn print_written(report: &RunReport) {
    for path in &report.written {
        println!("  {} {}", style("✓").green(), path.display());
    }
}

/// Print collected warnings
pub fn print_warnings(report: &RunReport) {
    for warning in &report.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
        if let Some(hint) = hint_for(warning) {
            eprintln!("    {} {}", style("hint:").blue(), hint);
        }
    }
}

fn hint_for(warning: &Warning) -> Option<&'static str> {
    match warning {
        Warning::TemplateNotFound { .. } => {
            Some("check the `template` name against the files in the templates directory")
        }
        Warning::UnusedKey { .. } => Some("remove the entry or reference it as ${KEY} in the template"),
        Warning::NamespaceOverridden { .. } => None,
    }
}

/// Print the final summary line
pub fn print_summary(report: &RunReport, verb: &str) {
    let warnings = report.warnings.len();
    if warnings > 0 {
        println!(
            "{} {} {} secret(s) from {} binding(s) with {} warning(s)",
            style("⚠").yellow().bold(),
            capitalize(verb),
            report.documents,
            report.bindings,
            warnings
        );
    } else {
        println!(
            "{} {} {} secret(s) from {} binding(s)",
            style("✓").green().bold(),
            capitalize(verb),
            report.documents,
            report.bindings
        );
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
