use std::error;
use std::fmt;

use crate::export::ExportError;

/// Error returned when attempting to convert an invalid byte/character into
/// a `Nucleotide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidNucleotide(pub u8);

impl fmt::Display for InvalidNucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid nucleotide byte: {} ('{}')", self.0, self.0 as char)
    }
}

impl error::Error for InvalidNucleotide {}

/// Error type for failures when constructing a `Sequence`.
#[derive(Debug, Clone)]
pub enum InvalidSequence {
    /// A character was not recognized as a valid nucleotide.
    InvalidChar(char),
}

impl fmt::Display for InvalidSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar(c) => write!(f, "Invalid character in sequence: '{c}'"),
        }
    }
}

impl error::Error for InvalidSequence {}

/// Errors that can occur during mutation operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationError {
    /// Invalid per-branch change probability (must be between 0.0 and 1.0)
    InvalidMutationRate(f64),
    /// Invalid clock rate (must be finite and non-negative)
    InvalidClockRate(f64),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationError::InvalidMutationRate(mu) => {
                write!(
                    f,
                    "Invalid mutation rate: {mu} (must be between 0.0 and 1.0)"
                )
            }
            MutationError::InvalidClockRate(rate) => {
                write!(
                    f,
                    "Invalid clock rate: {rate} (must be finite and non-negative)"
                )
            }
        }
    }
}

impl error::Error for MutationError {}

/// Errors raised while validating model parameters or prior settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A rate is negative, NaN or infinite.
    InvalidRate(&'static str, f64),
    /// A probability lies outside [0, 1].
    InvalidProbability(&'static str, f64),
    /// The origin time is not a positive finite number.
    InvalidOrigin(f64),
    /// A prior setting is inconsistent.
    InvalidPrior(String),
    /// A run setting is out of range.
    InvalidConfig(String),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRate(name, val) => {
                write!(f, "Invalid rate for {name}: {val} (must be finite and >= 0)")
            }
            Self::InvalidProbability(name, val) => {
                write!(
                    f,
                    "Invalid probability for {name}: {val} (must be between 0.0 and 1.0)"
                )
            }
            Self::InvalidOrigin(t) => {
                write!(f, "Invalid origin time: {t} (must be finite and > 0)")
            }
            Self::InvalidPrior(msg) => write!(f, "Invalid prior: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl error::Error for ParameterError {}

/// Errors returned by a tree simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Model parameters were rejected before simulating.
    Parameter(ParameterError),
    /// No attempt produced a sampled lineage at present.
    NoSurvivingTree { attempts: usize },
    /// Too many lineages were alive at the same time.
    LineageLimit { limit: usize },
    /// The simulated nodes did not form a valid tree.
    Tree(TreeError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(e) => write!(f, "{e}"),
            Self::NoSurvivingTree { attempts } => {
                write!(
                    f,
                    "No tree with a sampled lineage at present after {attempts} attempts"
                )
            }
            Self::LineageLimit { limit } => {
                write!(f, "Number of live lineages exceeded the limit of {limit}")
            }
            Self::Tree(e) => write!(f, "{e}"),
        }
    }
}

impl error::Error for SimulationError {}

impl From<ParameterError> for SimulationError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

impl From<TreeError> for SimulationError {
    fn from(e: TreeError) -> Self {
        Self::Tree(e)
    }
}

/// Errors produced while reading or manipulating trees.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Malformed Newick input.
    Parse { position: usize, message: String },
    /// The operation needs at least one node.
    Empty,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { position, message } => {
                write!(f, "Newick parse error at byte {position}: {message}")
            }
            Self::Empty => write!(f, "Tree has no nodes"),
        }
    }
}

impl error::Error for TreeError {}

/// Any failure while producing one dataset.
///
/// Nothing is retried: the first error aborts the batch.
#[derive(Debug)]
pub enum DatasetError {
    Parameter(ParameterError),
    Simulation(SimulationError),
    Mutation(MutationError),
    Export(ExportError),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(e) => write!(f, "Parameter error: {e}"),
            Self::Simulation(e) => write!(f, "Tree simulation failed: {e}"),
            Self::Mutation(e) => write!(f, "Sequence simulation failed: {e}"),
            Self::Export(e) => write!(f, "Export failed: {e}"),
        }
    }
}

impl error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Parameter(e) => Some(e),
            Self::Simulation(e) => Some(e),
            Self::Mutation(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

impl From<ParameterError> for DatasetError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

impl From<SimulationError> for DatasetError {
    fn from(e: SimulationError) -> Self {
        Self::Simulation(e)
    }
}

impl From<MutationError> for DatasetError {
    fn from(e: MutationError) -> Self {
        Self::Mutation(e)
    }
}

impl From<ExportError> for DatasetError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        Self::Export(ExportError::Io(e))
    }
}
