//! Sopsify CLI - Render per-namespace Kubernetes secrets and encrypt them with sops

use clap::{Args, Parser, Subcommand};
use sopsify_core::DEFAULT_CONFIG_FILE;
use sopsify_engine::SopsEncryptor;
use std::path::PathBuf;

mod commands;
mod display;
mod error;
mod exit_codes;
mod logging;

#[derive(Parser)]
#[command(name = "sopsify")]
#[command(author = "Sopsify Contributors")]
#[command(version)]
#[command(about = "Render secret templates per cluster and namespace, then encrypt them with sops", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

/// Inputs shared by every command
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Configuration file with cluster/template/value bindings
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory containing secret templates
    #[arg(short, long, default_value = "templates", conflicts_with = "file")]
    pub templates: PathBuf,

    /// A single template file to use instead of a directory
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Directory containing `clusters/`
    #[arg(short = 'C', long, default_value = ".")]
    pub root: PathBuf,

    /// Only process these clusters
    #[arg(long = "cluster")]
    pub clusters: Vec<String>,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render, write and encrypt every secret
    Encrypt {
        #[command(flatten)]
        source: SourceArgs,

        /// sops executable
        #[arg(long, env = "SOPSIFY_SOPS", default_value = SopsEncryptor::DEFAULT_PROGRAM)]
        sops: PathBuf,
    },

    /// Render secrets to stdout without writing or encrypting
    Render {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Validate config, templates and placeholder coverage
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.debug);

    let result = match cli.command {
        Commands::Encrypt { source, sops } => commands::encrypt::run(&source, &sops),
        Commands::Render { source } => commands::render::run(&source),
        Commands::Check { source } => commands::check::run(&source),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
