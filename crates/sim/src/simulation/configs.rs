//! Run configuration.
//!
//! A `Configuration` fully describes a batch. It is written next to the
//! datasets as `run.json` and can be loaded back to reproduce the run.

use serde::{Deserialize, Serialize};

use super::PriorConfig;
use crate::birth_death::ForwardBirthDeath;
use crate::errors::ParameterError;
use crate::export::TaxonSelection;

/// The master configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub priors: PriorConfig,
    pub sequences: SequenceConfig,
    /// Limits of the rejection sampler used to condition on survival.
    pub conditioning: ForwardBirthDeath,
}

impl Configuration {
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.priors.validate()?;
        if self.execution.prefix.is_empty() || self.execution.prefix.contains(['/', '\\']) {
            return Err(ParameterError::InvalidConfig(format!(
                "dataset prefix '{}' must be a non-empty plain name",
                self.execution.prefix
            )));
        }
        if self.sequences.length == 0 {
            return Err(ParameterError::InvalidConfig(
                "sequence length must be at least 1".into(),
            ));
        }
        if self.conditioning.max_attempts == 0 || self.conditioning.max_lineages == 0 {
            return Err(ParameterError::InvalidConfig(
                "conditioning limits must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Batch-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Number of datasets to simulate
    pub replicates: usize,
    /// Seed of the single random stream shared by all replicates
    pub seed: u64,
    /// Dataset directories are named `{prefix}{index}`
    pub prefix: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            replicates: 1000,
            seed: 1,
            prefix: "dataset".to_string(),
        }
    }
}

impl ExecutionConfig {
    pub fn dataset_name(&self, index: usize) -> String {
        format!("{}{index}", self.prefix)
    }
}

/// Sequence simulation and alignment export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Alignment length in sites
    pub length: usize,
    /// Leaves written to the alignment
    pub selection: TaxonSelection,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            length: 1000,
            selection: TaxonSelection::ExtantExtinct,
        }
    }
}
