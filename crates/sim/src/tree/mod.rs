//! Phylogenetic tree model and Newick I/O.
//!
//! Trees are stored as node arenas with times measured backwards from the
//! present, which makes pruning to the reconstructed tree a single postorder
//! pass.

mod newick;
pub(crate) mod phylo;

pub use newick::{parse_newick, write_newick};
pub use phylo::{Node, NodeId, NodeKind, PhyloTree};
