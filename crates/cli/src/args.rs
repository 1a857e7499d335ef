use clap::Args;
use phylodyn_sim::export::TaxonSelection;
use std::path::PathBuf;

use crate::defaults;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Output directory (dataset directories are created inside)
    #[arg(short, long, default_value = defaults::OUTPUT_DIR)]
    pub output: PathBuf,

    /// Load a full run configuration from JSON (e.g. a previous run.json)
    ///
    /// Flags given explicitly override the values in the file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of datasets to simulate [default: 1000]
    #[arg(short = 'n', long)]
    pub replicates: Option<usize>,

    /// Random seed shared by all replicates [default: 1]
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Dataset directory prefix [default: dataset]
    #[arg(long)]
    pub prefix: Option<String>,

    /// Alignment length in sites [default: 1000]
    #[arg(short = 'L', long)]
    pub sequence_length: Option<usize>,

    /// Taxa written to the alignment (extant, extinct, extant-extinct)
    /// [default: extant-extinct]
    #[arg(long)]
    pub selection: Option<TaxonSelection>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Print a summary of every dataset
    #[arg(short, long)]
    pub verbose: bool,
}
