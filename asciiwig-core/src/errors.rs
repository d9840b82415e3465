use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error("Invalid region {0}: start must be >= 1 and not greater than end")]
    InvalidRegion(String),

    #[error("Screen width must be at least 1")]
    ZeroWidth,

    #[error("Genome to screen mapping must be non-empty and non-decreasing")]
    InvalidMapping,

    #[error("Extension (i.e. file type) not recognized for {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
