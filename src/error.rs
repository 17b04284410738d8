use thiserror::Error;

/// Error taxonomy for the extractor: invalid configuration fails fast before any
/// pass runs, io errors propagate from readers and persistence, and a reader that
/// raises is never swallowed by the harness.
#[derive(Debug, Error)]
pub enum WordDetectorError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("reader failed: {0}")]
    Reader(String),
}
