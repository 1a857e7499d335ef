//! Occurrence birth-death process (OBDP).
//!
//! Lineages are born at rate lambda, die at rate mu, are sequenced through
//! time at rate psi, leave unsequenced occurrences at rate omega, and are
//! sampled at present with probability rho. A sampled lineage is removed
//! with probability r.

mod observations;
mod parameters;
mod process;

pub use observations::{ObservationKind, ObservationRecord, Observations};
pub use parameters::BirthDeathParameters;
pub use process::{ForwardBirthDeath, SimulatedTrees, TreeSimulator};
