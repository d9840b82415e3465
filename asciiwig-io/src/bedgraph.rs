//! Sorted, block-gzipped and tabix-indexed copies of bedGraph files.
//!
//! A bedGraph without a `.tbi` cannot be queried by region, so a private copy
//! is written to the temp directory and indexed. The copy (data and index) is
//! deleted when the [`DerivedCopy`] is dropped.

use std::cmp::Ordering;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use noodles::bgzf;
use noodles::core::Position;
use noodles::csi::binning_index::index::header::Builder as IndexHeaderBuilder;
use noodles::csi::binning_index::index::reference_sequence::bin::Chunk;
use noodles::tabix;
use tempfile::TempPath;

use asciiwig_core::utils::get_dynamic_reader;

use crate::error::Result;
use crate::tabix::tabix_index_path;

pub const DERIVED_PREFIX: &str = ".asciiwig.";
pub const DERIVED_SUFFIX: &str = ".bedGraph.gz";

///
/// Header-ish lines a bedGraph may carry before (or between) records.
///
pub fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('#') || trimmed.starts_with("track ") || trimmed.starts_with("browser ")
}

#[derive(Debug)]
struct SortableRecord {
    chrom: String,
    start: u32,
    end: u32,
    line: String,
}

fn parse_positions(line: &str) -> Option<(String, u32, u32)> {
    let mut fields = line.split_whitespace();
    let chrom = fields.next()?;
    let start = fields.next()?.parse::<u32>().ok()?;
    let end = fields.next()?.parse::<u32>().ok()?;
    Some((chrom.to_string(), start, end))
}

///
/// On-disk copy owned by one track. Both files are removed on drop.
///
#[derive(Debug)]
pub struct DerivedCopy {
    data: TempPath,
    index: TempPath,
}

impl DerivedCopy {
    pub fn path(&self) -> &Path {
        &self.data
    }

    pub fn index_path(&self) -> &Path {
        &self.index
    }
}

///
/// Sort `input` by chromosome and start, compress it with bgzf and index it
/// with tabix.
///
/// `input` may be plain text, gzip or bgzf. Header lines are dropped, as are
/// lines whose positions cannot be parsed (they could not be indexed); lines
/// with a bad value column are kept, deciding on those is up to the reader.
///
/// # Arguments
/// - input: the bedGraph to copy
/// - tmp_dir: where to put the copy, the system temp dir if `None`
///
pub fn sort_bgzip_index<P: AsRef<Path>>(input: P, tmp_dir: Option<&Path>) -> Result<DerivedCopy> {
    let input = input.as_ref();
    let reader = get_dynamic_reader(input)?;

    let mut records = vec![];
    let mut dropped = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || is_header_line(&line) {
            continue;
        }
        match parse_positions(&line) {
            Some((chrom, start, end)) => records.push(SortableRecord {
                chrom,
                start,
                end,
                // tabix splits fields on tabs only
                line: line.split_whitespace().collect::<Vec<&str>>().join("\t"),
            }),
            None => {
                dropped += 1;
                warn!("Skipping unindexable line in {}: {}", input.display(), line);
            }
        }
    }

    records.sort_by(|a, b| match a.chrom.cmp(&b.chrom) {
        Ordering::Equal => (a.start, a.end).cmp(&(b.start, b.end)),
        other => other,
    });

    let basename = input
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    let prefix = format!("{}{}.", DERIVED_PREFIX, basename);
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(DERIVED_SUFFIX);
    let named = match tmp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    let (file, data) = named.into_parts();

    let mut writer = bgzf::Writer::new(file);
    let mut indexer = tabix::index::Indexer::default();
    indexer.set_header(IndexHeaderBuilder::bed().build());

    for record in &records {
        let chunk_start = writer.virtual_position();
        writeln!(writer, "{}", record.line)?;
        let chunk_end = writer.virtual_position();

        // tabix positions are 1-based and end-inclusive
        let start = to_position(record.start + 1)?;
        let end = to_position(record.end.max(record.start + 1))?;
        indexer.add_record(&record.chrom, start, end, Chunk::new(chunk_start, chunk_end))?;
    }
    writer.finish()?;

    let index_path: PathBuf = tabix_index_path(&data);
    tabix::write(&index_path, &indexer.build())?;
    let index = TempPath::try_from_path(index_path)?;

    debug!(
        "Indexed {} records of {} into {} ({} dropped)",
        records.len(),
        input.display(),
        data.display(),
        dropped
    );

    Ok(DerivedCopy { data, index })
}

fn to_position(pos: u32) -> io::Result<Position> {
    Position::try_from(pos as usize).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
