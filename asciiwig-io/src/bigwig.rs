use std::path::Path;

use bigtools::utils::reopen::ReopenableFile;
use bigtools::{BigWigRead, BigWigReadOpenError};

use crate::error::{Result, SourceError};
use crate::sources::{DenseInterval, DenseSource, IntervalIter};

///
/// bigWig file opened through bigtools. The handle stays open until the
/// source is dropped.
///
pub struct BigWigSource {
    path: String,
    reader: BigWigRead<ReopenableFile>,
}

impl BigWigSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().to_string();
        let reader = BigWigRead::open_file(&path).map_err(|e| match e {
            BigWigReadOpenError::NotABigWig => SourceError::NotABigWig(path.clone()),
            BigWigReadOpenError::IoError(e) => SourceError::Io(e),
            other => SourceError::BigWig(other.to_string()),
        })?;

        Ok(BigWigSource { path, reader })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl DenseSource for BigWigSource {
    fn chrom_names(&self) -> Vec<String> {
        self.reader.chroms().iter().map(|c| c.name.clone()).collect()
    }

    fn intervals(&mut self, chrom: &str, from: u32, to: u32) -> Result<IntervalIter<'_>> {
        // bigtools rejects unknown chromosomes; for a viewer that is just an empty region
        if !self.reader.chroms().iter().any(|c| c.name == chrom) {
            return Ok(Box::new(std::iter::empty()));
        }

        // bigtools works in 0-based, half-open coordinates
        let values = self
            .reader
            .get_interval(chrom, from.saturating_sub(1), to)
            .map_err(|e| SourceError::BigWig(e.to_string()))?;

        Ok(Box::new(values.map(|v| {
            v.map(|v| DenseInterval {
                start: v.start + 1,
                end: v.end,
                value: v.value,
            })
            .map_err(|e| SourceError::BigWig(e.to_string()))
        })))
    }
}
