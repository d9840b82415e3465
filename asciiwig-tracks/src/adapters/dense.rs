use log::debug;

use asciiwig_core::ScreenBins;
use asciiwig_core::models::{ScreenScores, Viewport};
use asciiwig_io::DenseSource;

use crate::adapters::{Aggregate, AggregationParams};
use crate::error::Result;

///
/// Aggregates a bigWig-like store base by base.
///
/// Every base of an interval inside the viewport adds the interval's value to
/// the column nearest that base, so a column's score is the mean over the
/// bases it represents.
///
pub struct DenseAdapter {
    source: Box<dyn DenseSource>,
}

impl DenseAdapter {
    pub fn new(source: Box<dyn DenseSource>) -> Self {
        DenseAdapter { source }
    }

    ///
    /// Per-column sums and counts for `viewport`, before averaging.
    ///
    pub fn accumulate(&mut self, viewport: &Viewport) -> Result<ScreenBins> {
        let mut bins = ScreenBins::new(viewport.width());
        let (from, to) = (viewport.from(), viewport.to());
        let mapping = viewport.mapping();

        for interval in self.source.intervals(viewport.chrom(), from, to)? {
            let interval = interval?;
            // intervals may stick out of the query on either side
            let start = interval.start.max(from);
            let end = interval.end.min(to);
            for pos in start..=end {
                bins.increment(mapping.closest_column(pos as f64), interval.value);
            }
        }
        Ok(bins)
    }
}

impl Aggregate for DenseAdapter {
    fn aggregate(&mut self, viewport: &Viewport, _params: &AggregationParams) -> Result<ScreenScores> {
        let bins = self.accumulate(viewport)?;
        debug!(
            "{} base values over {} columns for {}",
            bins.total_count(),
            bins.width(),
            viewport.region()
        );
        Ok(bins.finalize())
    }

    fn chromosome_names(&self) -> Vec<String> {
        self.source.chrom_names()
    }
}
