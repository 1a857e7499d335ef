//! Base types for sequence representation.
//!
//! Nucleotides and the sequences evolved along simulated trees.

mod nucleotide;
mod sequence;

pub use nucleotide::Nucleotide;
pub use sequence::Sequence;
