use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use noodles::bgzf;
use noodles::core::{Position, Region};
use noodles::csi::{self, BinningIndex};
use noodles::tabix;

use crate::error::{Result, SourceError};
use crate::sources::{LineIter, SparseSource};

pub const TABIX_INDEX_EXTENSION: &str = ".tbi";

///
/// `<path>.tbi`
///
pub fn tabix_index_path(path: &Path) -> PathBuf {
    let mut index = OsString::from(path.as_os_str());
    index.push(TABIX_INDEX_EXTENSION);
    PathBuf::from(index)
}

///
/// True if `path` has a readable companion tabix index.
///
pub fn has_tabix_index(path: &Path) -> bool {
    let index = tabix_index_path(path);
    index.exists() && tabix::read(&index).is_ok()
}

fn position(pos: u32) -> io::Result<Position> {
    Position::try_from(pos.max(1) as usize)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

///
/// Block-gzipped, tabix-indexed text file.
///
pub struct TabixSource {
    path: String,
    sequence_names: Vec<String>,
    reader: csi::io::IndexedReader<bgzf::Reader<File>, tabix::Index>,
}

impl TabixSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let index = tabix::read(tabix_index_path(path))
            .map_err(|_| SourceError::MissingIndex(display.clone()))?;

        let sequence_names = index
            .header()
            .map(|header| {
                header
                    .reference_sequence_names()
                    .iter()
                    .map(|name| name.to_string())
                    .collect()
            })
            .unwrap_or_default();

        let reader = csi::io::IndexedReader::new(File::open(path)?, index);

        Ok(TabixSource {
            path: display,
            sequence_names,
            reader,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SparseSource for TabixSource {
    fn sequence_names(&self) -> Vec<String> {
        self.sequence_names.clone()
    }

    fn query(&mut self, chrom: &str, from: u32, to: u32) -> Result<LineIter<'_>> {
        if !self.sequence_names.iter().any(|name| name == chrom) {
            return Ok(Box::new(std::iter::empty()));
        }

        let region = Region::new(chrom, position(from)?..=position(to.max(from))?);
        let path = self.path.clone();
        let query_error = |e: io::Error| SourceError::Query {
            path: path.clone(),
            reason: e.to_string(),
        };

        // the query borrows the region, so lines are read before returning
        let lines: Vec<Result<String>> = self
            .reader
            .query(&region)
            .map_err(query_error)?
            .map(|record| {
                record
                    .map(|r| {
                        let line: &str = r.as_ref();
                        line.to_string()
                    })
                    .map_err(query_error)
            })
            .collect();

        Ok(Box::new(lines.into_iter()))
    }
}
