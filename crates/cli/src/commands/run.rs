use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use phylodyn_sim::simulation::{run_batch, Configuration, RUN_CONFIG_FILE};
use std::fs;

use crate::args::RunArgs;
use crate::defaults::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use crate::printing::{print_configuration, print_dataset_summary};

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    println!("🧬 Phylodyn - Simulating Datasets");
    println!("============================================\n");

    let config = build_configuration(args)?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    print_configuration(&config, &args.output);

    let pb = if args.progress {
        let pb = ProgressBar::new(config.execution.replicates as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .context("Invalid progress bar template")?
                .progress_chars(PROGRESS_CHARS),
        );
        Some(pb)
    } else {
        None
    };

    let summaries = run_batch(&config, &args.output, |_, summary| match &pb {
        Some(pb) => {
            if args.verbose {
                pb.suspend(|| print_dataset_summary(summary));
            }
            pb.inc(1);
        }
        None => {
            if args.verbose {
                print_dataset_summary(summary);
            }
        }
    })
    .with_context(|| format!("Simulation aborted in {}", args.output.display()))?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let attempts: usize = summaries.iter().map(|s| s.attempts).sum();
    let leaves: usize = summaries.iter().map(|s| s.reconstructed_leaves).sum();
    println!("\n✓ Simulation complete!");
    println!("  Datasets: {}", summaries.len());
    if !summaries.is_empty() {
        println!(
            "  Mean sampled leaves: {:.1}",
            leaves as f64 / summaries.len() as f64
        );
        println!(
            "  Mean tree simulations per dataset: {:.1}",
            attempts as f64 / summaries.len() as f64
        );
    }
    println!(
        "  Configuration: {}",
        args.output.join(RUN_CONFIG_FILE).display()
    );

    Ok(())
}

/// Start from `--config` (or the defaults) and apply explicit flags.
fn build_configuration(args: &RunArgs) -> Result<Configuration> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        }
        None => Configuration::default(),
    };

    if let Some(replicates) = args.replicates {
        config.execution.replicates = replicates;
    }
    if let Some(seed) = args.seed {
        config.execution.seed = seed;
    }
    if let Some(prefix) = &args.prefix {
        config.execution.prefix = prefix.clone();
    }
    if let Some(length) = args.sequence_length {
        config.sequences.length = length;
    }
    if let Some(selection) = args.selection {
        config.sequences.selection = selection;
    }

    Ok(config)
}
