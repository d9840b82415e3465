use crate::errors::CoreError;
use crate::models::region::Region;

///
/// Index of the value in `sorted` closest to `pos`.
///
/// `sorted` must be non-decreasing and non-empty. Ties between two neighbours
/// go to the lower index; positions outside the table clamp to the first or
/// last index.
///
pub fn closest_index(pos: f64, sorted: &[f64]) -> usize {
    assert!(!sorted.is_empty(), "cannot search an empty mapping");

    let upper = sorted.partition_point(|&x| x < pos);
    let nearest = if upper == 0 {
        0
    } else if upper == sorted.len() {
        sorted.len() - 1
    } else {
        let below = pos - sorted[upper - 1];
        let above = sorted[upper] - pos;
        if below <= above { upper - 1 } else { upper }
    };

    // repeated coordinates: report the first column holding the value
    let value = sorted[nearest];
    sorted[..nearest].partition_point(|&x| x < value)
}

///
/// Genomic coordinate assigned to each screen column, left to right.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeToScreenMapping {
    positions: Vec<f64>,
}

impl GenomeToScreenMapping {
    pub fn new(positions: Vec<f64>) -> Result<Self, CoreError> {
        let sorted = positions.windows(2).all(|w| w[0] <= w[1]);
        if positions.is_empty() || !sorted || positions.iter().any(|x| x.is_nan()) {
            return Err(CoreError::InvalidMapping);
        }
        Ok(GenomeToScreenMapping { positions })
    }

    ///
    /// Spread `width` columns evenly over the region: column `i` sits at
    /// `from + i * (bases / width)`.
    ///
    pub fn linear(region: &Region, width: usize) -> Result<Self, CoreError> {
        if width == 0 {
            return Err(CoreError::ZeroWidth);
        }
        let step = region.width() as f64 / width as f64;
        let positions = (0..width)
            .map(|i| region.from as f64 + i as f64 * step)
            .collect();

        Ok(GenomeToScreenMapping { positions })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    ///
    /// Screen column whose assigned coordinate is closest to `pos`
    ///
    pub fn closest_column(&self, pos: f64) -> usize {
        closest_index(pos, &self.positions)
    }
}

///
/// A query region bound to the terminal columns it is drawn on.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    region: Region,
    mapping: GenomeToScreenMapping,
}

impl Viewport {
    pub fn new(region: Region, width: usize) -> Result<Self, CoreError> {
        let mapping = GenomeToScreenMapping::linear(&region, width)?;
        Ok(Viewport { region, mapping })
    }

    ///
    /// Use a mapping computed elsewhere, e.g. by the caller's own window logic.
    ///
    pub fn with_mapping(region: Region, mapping: GenomeToScreenMapping) -> Self {
        Viewport { region, mapping }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn mapping(&self) -> &GenomeToScreenMapping {
        &self.mapping
    }

    pub fn chrom(&self) -> &str {
        &self.region.chrom
    }

    pub fn from(&self) -> u32 {
        self.region.from
    }

    pub fn to(&self) -> u32 {
        self.region.to
    }

    pub fn width(&self) -> usize {
        self.mapping.len()
    }
}
