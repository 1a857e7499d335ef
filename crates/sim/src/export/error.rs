use thiserror::Error;

/// Error type for dataset file writing and reading.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Format error: {0}")]
    Format(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
