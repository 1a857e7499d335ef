//! Sequence evolution.
//!
//! - **Mutation**: per-branch JC69 substitution probabilities
//! - **Clock**: strict-clock evolution of sequences along a tree

pub mod clock;
pub mod mutation;

pub use clock::{ClockParameters, SequenceSimulator, SequencedTree, StrictClockJc69};
pub use mutation::SubstitutionModel;
