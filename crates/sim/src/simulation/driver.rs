//! Per-dataset orchestration: priors, tree, sequences, files.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ParameterSet, PriorConfig, SequenceConfig};
use crate::birth_death::TreeSimulator;
use crate::errors::DatasetError;
use crate::evolution::SequenceSimulator;
use crate::export::{DatasetWriter, FULL_TREE_FILE, RECONSTRUCTED_TREE_FILE};

/// What one call to [`DatasetDriver::simulate_dataset`] produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Name of the dataset directory.
    pub name: String,
    pub parameters: ParameterSet,
    pub origin: f64,
    /// Observation counts in export order.
    pub observation_counts: [usize; 6],
    pub reconstructed_leaves: usize,
    pub full_leaves: usize,
    /// Taxa written to the alignment.
    pub alignment_taxa: usize,
    /// Tree simulations needed to meet the survival condition.
    pub attempts: usize,
}

/// Produces one dataset directory from a random stream.
///
/// Generic over the tree and sequence simulators; the driver only decides
/// the order in which they are called and where their output goes.
#[derive(Debug, Clone)]
pub struct DatasetDriver<T, S> {
    tree_simulator: T,
    sequence_simulator: S,
    priors: PriorConfig,
    sequences: SequenceConfig,
}

impl<T: TreeSimulator, S: SequenceSimulator> DatasetDriver<T, S> {
    pub fn new(
        tree_simulator: T,
        sequence_simulator: S,
        priors: PriorConfig,
        sequences: SequenceConfig,
    ) -> Self {
        Self {
            tree_simulator,
            sequence_simulator,
            priors,
            sequences,
        }
    }

    /// Simulate one dataset into `dir`, which must not exist yet.
    ///
    /// The first failure is returned as is; files already written stay on
    /// disk.
    pub fn simulate_dataset<R: Rng + ?Sized>(
        &self,
        dir: &Path,
        rng: &mut R,
    ) -> Result<DatasetSummary, DatasetError> {
        let writer = DatasetWriter::create(dir)?;

        let sample = self.priors.sample(rng)?;
        let parameters = sample.parameters;
        writer.write_parameters(&parameters.named())?;

        let trees = self.tree_simulator.simulate_conditioned_on_survival(
            &parameters.birth_death()?,
            sample.origin,
            rng,
        )?;
        writer.write_tree(RECONSTRUCTED_TREE_FILE, &trees.reconstructed)?;
        writer.write_tree(FULL_TREE_FILE, &trees.full)?;
        writer.write_occurrences(&trees.observations)?;
        writer.write_taxa(&trees.reconstructed)?;

        let seq_tree = self.sequence_simulator.simulate_along_tree(
            &parameters.clock()?,
            &trees.reconstructed,
            self.sequences.length,
            rng,
        )?;
        writer.write_alignment(&seq_tree, self.sequences.selection)?;

        let selection = self.sequences.selection;
        Ok(DatasetSummary {
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            parameters,
            origin: sample.origin,
            observation_counts: trees.observations.counts(),
            reconstructed_leaves: trees.reconstructed.leaves().len(),
            full_leaves: trees.full.leaves().len(),
            alignment_taxa: seq_tree
                .leaf_sequences()
                .iter()
                .filter(|(_, _, kind)| selection.includes(*kind))
                .count(),
            attempts: trees.attempts,
        })
    }
}
