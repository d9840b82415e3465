use thiserror::Error;

use asciiwig_core::CoreError;
use asciiwig_io::SourceError;

/// Error type for track operations.
#[derive(Error, Debug)]
pub enum TrackError {
    /// A setting the track cannot work with, e.g. a data column below 4.
    #[error("Invalid track configuration: {0}")]
    Config(String),

    /// The file is not a usable bigWig, TDF or bedGraph.
    #[error("Invalid track file: {0}")]
    Format(String),

    /// The track was closed and cannot be used anymore.
    #[error("Track {0} has been closed")]
    Closed(String),

    #[error(transparent)]
    Core(CoreError),

    #[error(transparent)]
    Source(SourceError),
}

impl From<CoreError> for TrackError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnknownFormat(_) => TrackError::Format(e.to_string()),
            other => TrackError::Core(other),
        }
    }
}

impl From<SourceError> for TrackError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NotABigWig(_) | SourceError::InvalidTdf { .. } => {
                TrackError::Format(e.to_string())
            }
            other => TrackError::Source(other),
        }
    }
}

impl From<std::io::Error> for TrackError {
    fn from(e: std::io::Error) -> Self {
        TrackError::Source(SourceError::Io(e))
    }
}

/// Result type alias for track operations.
pub type Result<T> = std::result::Result<T, TrackError>;
