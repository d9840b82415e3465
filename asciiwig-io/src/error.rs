use std::io;
use thiserror::Error;

/// Error type for asciiwig-io operations.
#[derive(Error, Debug)]
pub enum SourceError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file does not carry the bigWig magic number.
    #[error("Invalid file type {0}: not a bigWig file")]
    NotABigWig(String),

    /// bigtools reported an error while opening or querying.
    #[error("bigWig error: {0}")]
    BigWig(String),

    /// The TDF header, index or a tile could not be decoded.
    #[error("Invalid TDF file {path}: {reason}")]
    InvalidTdf { path: String, reason: String },

    /// A dataset name that is not in the TDF master index.
    #[error("Dataset not found in TDF file: {0}")]
    UnknownDataset(String),

    /// The companion `.tbi` of a bedGraph is missing or unreadable.
    #[error("Could not open tabix index for {0}")]
    MissingIndex(String),

    /// A tabix query against the store failed.
    #[error("Tabix query failed for {path}: {reason}")]
    Query { path: String, reason: String },
}

/// Result type alias for asciiwig-io operations.
pub type Result<T> = std::result::Result<T, SourceError>;
