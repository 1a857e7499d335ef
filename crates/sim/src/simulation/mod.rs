//! Dataset simulation.
//!
//! - `PriorConfig`: random model parameters for each replicate
//! - `Configuration`: everything a batch needs, serializable to `run.json`
//! - `DatasetDriver`: one replicate, from prior draw to files on disk
//! - `run_batch`: the seeded loop over replicates

pub mod batch;
pub mod configs;
pub mod driver;
pub mod priors;

pub use batch::{run_batch, RUN_CONFIG_FILE};
pub use configs::{Configuration, ExecutionConfig, SequenceConfig};
pub use driver::{DatasetDriver, DatasetSummary};
pub use priors::{ParameterSet, PriorConfig, PriorSample};
