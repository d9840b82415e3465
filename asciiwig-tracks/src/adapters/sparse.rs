use log::{debug, error};

use asciiwig_core::ScreenBins;
use asciiwig_core::models::{ScreenScores, Viewport};
use asciiwig_io::{SparseSource, is_header_line};

use crate::adapters::{Aggregate, AggregationParams};
use crate::error::Result;

///
/// A bedGraph data line: 0-based start, exclusive end and the value read from
/// the configured column.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BedGraphRecord {
    pub start: i64,
    pub end: i64,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    /// `#...`, `track ...` or `browser ...`; skipped.
    Header,
    /// Too few fields or something that does not parse; skipped.
    Invalid,
    Record(BedGraphRecord),
}

///
/// Decide what to do with one line of a bedGraph, reading the value from the
/// 1-based `data_column`.
///
pub fn classify_line(line: &str, data_column: usize) -> LineKind {
    if is_header_line(line) {
        return LineKind::Header;
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 || fields.len() < data_column || data_column == 0 {
        return LineKind::Invalid;
    }

    let start = fields[1].parse::<i64>();
    let end = fields[2].parse::<i64>();
    let value = fields[data_column - 1].parse::<f32>();
    match (start, end, value) {
        (Ok(start), Ok(end), Ok(value)) => LineKind::Record(BedGraphRecord { start, end, value }),
        _ => LineKind::Invalid,
    }
}

///
/// Aggregates a tabix-indexed bedGraph record by record.
///
/// A record adds its value once to every column from the one nearest its
/// first base to the one nearest its last base.
///
pub struct SparseAdapter {
    source: Box<dyn SparseSource>,
    name: String,
}

impl SparseAdapter {
    pub fn new(source: Box<dyn SparseSource>, name: &str) -> Self {
        SparseAdapter {
            source,
            name: name.to_string(),
        }
    }

    fn fill(&mut self, viewport: &Viewport, data_column: usize, bins: &mut ScreenBins) -> Result<usize> {
        let mapping = viewport.mapping();
        let mut invalid = 0;

        for line in self.source.query(viewport.chrom(), viewport.from(), viewport.to())? {
            let line = line?;
            match classify_line(&line, data_column) {
                LineKind::Record(record) => {
                    let first = mapping.closest_column(record.start as f64 + 1.0);
                    let last = mapping.closest_column(record.end as f64);
                    bins.increment_span(first, last, record.value);
                }
                LineKind::Invalid => invalid += 1,
                LineKind::Header => {}
            }
        }
        Ok(invalid)
    }
}

impl Aggregate for SparseAdapter {
    fn aggregate(&mut self, viewport: &Viewport, params: &AggregationParams) -> Result<ScreenScores> {
        let mut bins = ScreenBins::new(viewport.width());

        match self.fill(viewport, params.data_column, &mut bins) {
            Ok(invalid) if invalid > 0 => {
                debug!("Skipped {} invalid record(s) of {} in {}", invalid, self.name, viewport.region())
            }
            Ok(_) => {}
            Err(e) => {
                // keep what was read so far
                error!(
                    "Could not read {} in {}: {}. Is the file sorted and indexed? \
                     To prepare it: sort -k1,1 -k2,2n <file> | bgzip > <file>.gz && tabix -p bed <file>.gz",
                    self.name,
                    viewport.region(),
                    e
                );
            }
        }

        Ok(bins.finalize())
    }

    fn chromosome_names(&self) -> Vec<String> {
        self.source.sequence_names()
    }
}
