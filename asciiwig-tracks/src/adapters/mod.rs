//! Source adapters: one per kind of store, all producing one score per screen
//! column for a [`Viewport`].
//!
//! - [`DenseAdapter`] (bigWig): every base of every interval lands in its
//!   nearest column.
//! - [`TiledAdapter`] (TDF): every bin lands in the column nearest its start.
//! - [`SparseAdapter`] (bedGraph): every record is spread over all the columns
//!   it covers.
//!
pub mod dense;
pub mod sparse;
pub mod tiled;

use std::path::Path;

use asciiwig_core::models::{ScreenScores, Viewport};
use asciiwig_core::utils::TrackFormat;
use asciiwig_io::{BigWigSource, TabixSource, TdfReader};

use crate::error::Result;

pub use dense::DenseAdapter;
pub use sparse::{BedGraphRecord, LineKind, SparseAdapter, classify_line};
pub use tiled::TiledAdapter;

/// First column a bedGraph value can be read from (1-based).
pub const MIN_DATA_COLUMN: usize = 4;

///
/// Per-query settings that are not part of the viewport.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationParams {
    /// 1-based column holding the value of a bedGraph record
    pub data_column: usize,
}

impl Default for AggregationParams {
    fn default() -> Self {
        AggregationParams {
            data_column: MIN_DATA_COLUMN,
        }
    }
}

pub trait Aggregate {
    ///
    /// Fold the signal overlapping `viewport` into `viewport.width()` scores.
    /// Columns nothing lands in are NaN.
    ///
    fn aggregate(&mut self, viewport: &Viewport, params: &AggregationParams) -> Result<ScreenScores>;

    fn chromosome_names(&self) -> Vec<String>;

    /// Attribute stored with the data, e.g. `totalCount` for TDF.
    fn attribute(&self, _key: &str) -> Option<String> {
        None
    }

    /// Whether the store carries what RPM normalization needs.
    fn supports_normalization(&self) -> bool {
        false
    }
}

pub enum SourceAdapter {
    Dense(DenseAdapter),
    Tiled(TiledAdapter),
    Sparse(SparseAdapter),
}

impl SourceAdapter {
    ///
    /// Open `path` with the reader for `format`.
    ///
    /// A bedGraph must be bgzipped and tabix indexed at this point.
    ///
    pub fn open(format: TrackFormat, path: &Path) -> Result<Self> {
        let adapter = match format {
            TrackFormat::BigWig => {
                SourceAdapter::Dense(DenseAdapter::new(Box::new(BigWigSource::open(path)?)))
            }
            TrackFormat::Tdf => SourceAdapter::Tiled(TiledAdapter::new(
                Box::new(TdfReader::open(path)?),
                &path.display().to_string(),
            )),
            TrackFormat::BedGraph => SourceAdapter::Sparse(SparseAdapter::new(
                Box::new(TabixSource::open(path)?),
                &path.display().to_string(),
            )),
        };
        Ok(adapter)
    }

    fn inner(&self) -> &dyn Aggregate {
        match self {
            SourceAdapter::Dense(a) => a,
            SourceAdapter::Tiled(a) => a,
            SourceAdapter::Sparse(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Aggregate {
        match self {
            SourceAdapter::Dense(a) => a,
            SourceAdapter::Tiled(a) => a,
            SourceAdapter::Sparse(a) => a,
        }
    }
}

impl Aggregate for SourceAdapter {
    fn aggregate(&mut self, viewport: &Viewport, params: &AggregationParams) -> Result<ScreenScores> {
        self.inner_mut().aggregate(viewport, params)
    }

    fn chromosome_names(&self) -> Vec<String> {
        self.inner().chromosome_names()
    }

    fn attribute(&self, key: &str) -> Option<String> {
        self.inner().attribute(key)
    }

    fn supports_normalization(&self) -> bool {
        self.inner().supports_normalization()
    }
}
