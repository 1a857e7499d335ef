//! The replicate loop.

use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{Configuration, DatasetDriver, DatasetSummary};
use crate::errors::DatasetError;
use crate::evolution::StrictClockJc69;
use crate::export::ExportError;

/// Serialized `Configuration` written to the output root.
pub const RUN_CONFIG_FILE: &str = "run.json";

/// Simulate `config.execution.replicates` datasets into `output`.
///
/// A single `Xoshiro256PlusPlus` seeded from `config.execution.seed` feeds
/// every replicate in order, so a seed and replicate count fully determine
/// the output. `on_dataset` is called after each completed dataset. The
/// first error stops the batch.
///
/// `run.json` is written once the first dataset is complete, so a batch that
/// fails on a directory left by an earlier run keeps that run's description.
pub fn run_batch<F>(
    config: &Configuration,
    output: &Path,
    mut on_dataset: F,
) -> Result<Vec<DatasetSummary>, DatasetError>
where
    F: FnMut(usize, &DatasetSummary),
{
    config.validate()?;
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| ExportError::Format(format!("serializing configuration: {e}")))?;

    fs::create_dir_all(output)?;

    let driver = DatasetDriver::new(
        config.conditioning,
        StrictClockJc69,
        config.priors.clone(),
        config.sequences.clone(),
    );
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.execution.seed);

    let mut summaries = Vec::with_capacity(config.execution.replicates);
    for index in 0..config.execution.replicates {
        let dir = output.join(config.execution.dataset_name(index));
        let summary = driver.simulate_dataset(&dir, &mut rng)?;
        if index == 0 {
            fs::write(output.join(RUN_CONFIG_FILE), &json)?;
        }
        on_dataset(index, &summary);
        summaries.push(summary);
    }

    Ok(summaries)
}
