//! Running means, one per screen column.
//!
//! Adapters push every (column, value) pair they see into [`ScreenBins`] and
//! call [`ScreenBins::finalize`] once at the end of the pass.

use crate::models::ScreenScores;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenLocus {
    count: u64,
    sum: f64,
}

impl ScreenLocus {
    ///
    /// Add a value. A `NaN` value is still counted and makes the mean `NaN`.
    ///
    pub fn increment(&mut self, value: f32) {
        self.count += 1;
        self.sum += value as f64;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    ///
    /// `sum / count`, or `NaN` when nothing was added
    ///
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreenBins {
    loci: Vec<ScreenLocus>,
}

impl ScreenBins {
    pub fn new(width: usize) -> Self {
        ScreenBins {
            loci: vec![ScreenLocus::default(); width],
        }
    }

    pub fn width(&self) -> usize {
        self.loci.len()
    }

    ///
    /// Add `value` to column `index`.
    ///
    /// # Panics
    /// When `index >= width`. Columns come from the coordinate mapper, so an
    /// out of range index is a bug, not bad input.
    ///
    pub fn increment(&mut self, index: usize, value: f32) {
        let width = self.loci.len();
        match self.loci.get_mut(index) {
            Some(locus) => locus.increment(value),
            None => panic!("screen column {} out of range for width {}", index, width),
        }
    }

    ///
    /// Add `value` to every column in `from..=to`.
    ///
    pub fn increment_span(&mut self, from: usize, to: usize, value: f32) {
        for index in from..=to {
            self.increment(index, value);
        }
    }

    pub fn locus(&self, index: usize) -> Option<&ScreenLocus> {
        self.loci.get(index)
    }

    ///
    /// Number of increments over all columns
    ///
    pub fn total_count(&self) -> u64 {
        self.loci.iter().map(|l| l.count).sum()
    }

    pub fn finalize(self) -> ScreenScores {
        self.loci.iter().map(|l| l.mean() as f32).collect()
    }
}
