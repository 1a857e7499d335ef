//! # Phylodynamic Dataset Simulation
//!
//! The `sim` crate generates simulated phylodynamic datasets. For each
//! replicate it draws model parameters from priors, simulates a tree under
//! the occurrence birth-death process conditioned on survival, evolves DNA
//! sequences along the reconstructed tree and writes trees, occurrence and
//! taxon tables, parameters and a Nexus alignment to disk.

pub mod base;
pub mod birth_death;
pub mod errors;
pub mod evolution;
pub mod export;
pub mod prelude;
pub mod simulation;
pub mod tree;

pub use base::{Nucleotide, Sequence};
