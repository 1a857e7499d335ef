mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use phylodyn_sim::export::TaxonSelection;
use std::path::PathBuf;

use args::RunArgs;
use commands::{info, run, validate};

/// Phylodyn: simulated datasets for phylodynamic inference
///
/// Each dataset draws epidemic parameters from priors, simulates a
/// transmission tree under a birth-death-sampling model with occurrences,
/// evolves DNA sequences along it and writes trees, records and a Nexus
/// alignment to disk.
#[derive(Parser, Debug)]
#[command(name = "phylodyn")]
#[command(
    author,
    version,
    about = "Simulates phylodynamic datasets under the occurrence birth-death process",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a batch of datasets.
    ///
    /// Replicates share one seeded random stream, so the same seed and
    /// replicate count always give the same files.
    Run(Box<RunArgs>),

    /// Info: Show parameters and sizes of one dataset.
    Info {
        /// Dataset directory (e.g. output/dataset0)
        dataset: PathBuf,

        /// Alignment to inspect
        #[arg(long, default_value = defaults::SELECTION)]
        selection: TaxonSelection,
    },

    /// Validate the datasets of an output directory.
    ///
    /// Checks file presence, parameter bounds and tree/alignment consistency.
    /// Settings are taken from run.json when present.
    Validate {
        /// Output directory of a previous run
        output: PathBuf,

        /// Dataset directory prefix (default: from run.json, else "dataset")
        #[arg(long)]
        prefix: Option<String>,

        /// Alignment to check (default: from run.json, else extant-extinct)
        #[arg(long)]
        selection: Option<TaxonSelection>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            run::run_simulation(&args)?;
        }
        Commands::Info { dataset, selection } => {
            info::show_info(&dataset, selection)?;
        }
        Commands::Validate {
            output,
            prefix,
            selection,
        } => {
            validate::validate_output(&output, prefix.as_deref(), selection)?;
        }
    }

    Ok(())
}
