use log::debug;

use asciiwig_core::ScreenBins;
use asciiwig_core::models::{ScreenScores, Viewport};
use asciiwig_io::TiledSource;

use crate::adapters::{Aggregate, AggregationParams};
use crate::error::{Result, TrackError};

/// Pseudo-chromosome TDF files list first, covering the whole genome.
pub const WHOLE_GENOME_CHROMOSOME: &str = "All";

///
/// True for the raw (not zoomed) dataset of `chrom`, e.g. `/chr1/raw`.
///
pub fn is_raw_dataset(name: &str, chrom: &str) -> bool {
    name.split('/').nth(1) == Some(chrom) && name.contains("raw")
}

///
/// Aggregates a TDF-like store tile by tile.
///
/// Each bin overlapping the viewport adds its value once, to the column
/// nearest its first base.
///
pub struct TiledAdapter {
    source: Box<dyn TiledSource>,
    name: String,
}

impl TiledAdapter {
    pub fn new(source: Box<dyn TiledSource>, name: &str) -> Self {
        TiledAdapter {
            source,
            name: name.to_string(),
        }
    }
}

impl Aggregate for TiledAdapter {
    fn aggregate(&mut self, viewport: &Viewport, _params: &AggregationParams) -> Result<ScreenScores> {
        let mut bins = ScreenBins::new(viewport.width());
        let (from, to) = (viewport.from(), viewport.to());
        let mapping = viewport.mapping();

        let datasets: Vec<String> = self
            .source
            .dataset_names()
            .into_iter()
            .filter(|name| is_raw_dataset(name, viewport.chrom()))
            .collect();

        if !datasets.is_empty() && self.source.track_names().len() > 1 {
            return Err(TrackError::Format(format!(
                "More than one track found in tdf file {}",
                self.name
            )));
        }

        for dataset in &datasets {
            let tile_width = self.source.tile_width(dataset)?.max(1);
            for tile_number in (from / tile_width)..=(to / tile_width) {
                let Some(tile) = self.source.tile(dataset, tile_number)? else {
                    continue;
                };
                for bin in &tile.bins {
                    if i64::from(bin.start) > i64::from(to) {
                        break;
                    }
                    if i64::from(bin.end) >= i64::from(from) {
                        bins.increment(mapping.closest_column(bin.start as f64 + 1.0), bin.value);
                    }
                }
            }
        }

        debug!(
            "{} bins from {} dataset(s) over {} columns for {}",
            bins.total_count(),
            datasets.len(),
            bins.width(),
            viewport.region()
        );
        Ok(bins.finalize())
    }

    fn chromosome_names(&self) -> Vec<String> {
        let mut names = self.source.chromosome_names();
        if names.first().map(String::as_str) == Some(WHOLE_GENOME_CHROMOSOME) {
            names.remove(0);
        }
        names
    }

    fn attribute(&self, key: &str) -> Option<String> {
        self.source.attribute(key)
    }

    fn supports_normalization(&self) -> bool {
        true
    }
}
