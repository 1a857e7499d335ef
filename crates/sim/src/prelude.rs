//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use phylodyn_sim::prelude::*;
//! use std::str::FromStr;
//!
//! let seq = Sequence::from_str("ACGT").unwrap();
//! assert_eq!(seq.len(), 4);
//! ```

pub use crate::base::{Nucleotide, Sequence};
pub use crate::birth_death::{
    BirthDeathParameters, ForwardBirthDeath, ObservationKind, Observations, SimulatedTrees,
    TreeSimulator,
};
pub use crate::errors::{self, DatasetError};
pub use crate::evolution::{ClockParameters, SequenceSimulator, SequencedTree, StrictClockJc69};
pub use crate::export::{ExportError, TaxonSelection};
pub use crate::simulation::{
    run_batch, Configuration, DatasetDriver, DatasetSummary, ParameterSet, PriorConfig,
};
pub use crate::tree::{parse_newick, write_newick, NodeKind, PhyloTree};
