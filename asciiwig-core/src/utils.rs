use std::ffi::OsStr;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::read::MultiGzDecoder;

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormat {
    BigWig,
    Tdf,
    BedGraph,
}

impl FromStr for TrackFormat {
    type Err = CoreError;

    ///
    /// Parse a file extension (without the leading dot and without `.gz`)
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bw" | "bigwig" => Ok(TrackFormat::BigWig),
            "tdf" => Ok(TrackFormat::Tdf),
            "bedgraph" | "bdg" => Ok(TrackFormat::BedGraph),
            _ => Err(CoreError::UnknownFormat(s.to_string())),
        }
    }
}

impl Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackFormat::BigWig => "bigWig",
            TrackFormat::Tdf => "TDF",
            TrackFormat::BedGraph => "bedGraph",
        };
        write!(f, "{}", name)
    }
}

pub struct FileInfo {
    pub file_format: TrackFormat,
    pub is_gzipped: bool,
}

///
/// Work out the track format from the file name, e.g. `x.bedGraph.gz` or `x.bw`.
/// Only bedGraph may be gzipped.
///
pub fn get_file_info(path: &Path) -> Result<FileInfo, CoreError> {
    let unknown = || CoreError::UnknownFormat(path.display().to_string());

    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(unknown)?;

    let (base_filename, is_gzipped) = match filename.strip_suffix(".gz") {
        Some(base) => (base, true),
        None => (filename, false),
    };

    let file_format = PathBuf::from(base_filename)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(unknown)
        .and_then(|ext| TrackFormat::from_str(ext).map_err(|_| unknown()))?;

    if is_gzipped && file_format != TrackFormat::BedGraph {
        return Err(unknown());
    }

    Ok(FileInfo {
        file_format,
        is_gzipped,
    })
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> std::io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Format `x` with `digits` significant digits, dropping trailing zeros.
///
pub fn round_to_significant(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 || x.is_infinite() {
        return format!("{}", x);
    }
    let magnitude = x.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    let scale = 10f64.powi(digits as i32 - 1 - magnitude);
    let rounded = (x * scale).round() / scale;

    let s = format!("{:.*}", decimals, rounded);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
