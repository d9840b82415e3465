//! Reader for IGV's tiled data format (TDF).
//!
//! Layout (all little-endian):
//! - 24 byte preamble: magic `TDF?`, version, master index position (i64),
//!   master index size, header size.
//! - header: window functions (version >= 2), track type, track line, track
//!   names, genome id and flags (version >= 3, bit 0 = zlib compressed tiles).
//! - master index: dataset and group names with their (position, size).
//! - datasets: attributes, data type, tile width and the tile index.
//! - tiles: `fixedStep`, `variableStep`, `bed` or `bedWithName` blocks.
//!
//! Strings are null-terminated.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;

use crate::error::{Result, SourceError};
use crate::sources::{Tile, TileBin, TiledSource};

const PREAMBLE_SIZE: usize = 24;
const COMPRESSED_FLAG: i32 = 0x1;
const ROOT_GROUP: &str = "/";

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    position: u64,
    size: usize,
}

#[derive(Debug, Clone)]
struct TdfDataset {
    tile_width: f32,
    tile_positions: Vec<i64>,
    tile_sizes: Vec<usize>,
}

pub struct TdfReader<R> {
    path: String,
    reader: R,
    version: i32,
    compressed: bool,
    track_names: Vec<String>,
    dataset_names: Vec<String>,
    dataset_index: HashMap<String, IndexEntry>,
    root_attributes: HashMap<String, String>,
    datasets: HashMap<String, TdfDataset>,
}

impl TdfReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        TdfReader::new(BufReader::new(file), &path.to_string_lossy())
    }
}

impl<R: Read + Seek> TdfReader<R> {
    ///
    /// Read header, master index and root group from `reader`. `name` is only
    /// used in error messages.
    ///
    pub fn new(reader: R, name: &str) -> Result<Self> {
        let mut tdf = TdfReader {
            path: name.to_string(),
            reader,
            version: 0,
            compressed: false,
            track_names: vec![],
            dataset_names: vec![],
            dataset_index: HashMap::new(),
            root_attributes: HashMap::new(),
            datasets: HashMap::new(),
        };

        let (index_position, index_size) = tdf.read_header()?;
        let groups = tdf.read_master_index(index_position, index_size)?;
        if let Some(entry) = groups.get(ROOT_GROUP) {
            let bytes = tdf.read_bytes(entry.position, entry.size)?;
            tdf.root_attributes = tdf.parse_attributes(&mut Cursor::new(bytes.as_slice()))?;
        }

        Ok(tdf)
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    fn invalid(&self, reason: impl Into<String>) -> SourceError {
        SourceError::InvalidTdf {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn read_bytes(&mut self, position: u64, size: usize) -> Result<Vec<u8>> {
        self.reader.seek(SeekFrom::Start(position))?;
        let mut bytes = vec![0u8; size];
        self.reader
            .read_exact(&mut bytes)
            .map_err(|e| self.invalid(format!("truncated block at {}: {}", position, e)))?;
        Ok(bytes)
    }

    fn read_header(&mut self) -> Result<(u64, usize)> {
        let preamble = self.read_bytes(0, PREAMBLE_SIZE)?;
        if &preamble[0..3] != b"TDF" {
            return Err(self.invalid("bad magic number"));
        }

        let mut cursor = Cursor::new(&preamble[4..]);
        self.version = cursor.read_i32::<LittleEndian>()?;
        let index_position = cursor.read_i64::<LittleEndian>()?;
        let index_size = cursor.read_i32::<LittleEndian>()?;
        let header_size = cursor.read_i32::<LittleEndian>()?;
        if index_position < 0 || index_size < 0 || header_size < 0 {
            return Err(self.invalid("negative offset in preamble"));
        }

        let header = self.read_bytes(PREAMBLE_SIZE as u64, header_size as usize)?;
        let mut cursor = Cursor::new(header.as_slice());

        if self.version >= 2 {
            let n_window_functions = read_count(&mut cursor)?;
            for _ in 0..n_window_functions {
                read_string(&mut cursor)?;
            }
        }
        let _track_type = read_string(&mut cursor)?;
        let _track_line = read_string(&mut cursor)?;

        let n_tracks = read_count(&mut cursor)?;
        self.track_names = (0..n_tracks)
            .map(|_| read_string(&mut cursor))
            .collect::<Result<Vec<_>>>()?;

        if self.version >= 3 {
            let _genome_id = read_string(&mut cursor)?;
            let flags = cursor.read_i32::<LittleEndian>()?;
            self.compressed = flags & COMPRESSED_FLAG != 0;
        }

        Ok((index_position as u64, index_size as usize))
    }

    fn read_master_index(
        &mut self,
        position: u64,
        size: usize,
    ) -> Result<HashMap<String, IndexEntry>> {
        let bytes = self.read_bytes(position, size)?;
        let mut cursor = Cursor::new(bytes.as_slice());

        let n_datasets = read_count(&mut cursor)?;
        for _ in 0..n_datasets {
            let (name, entry) = read_index_entry(&mut cursor)?;
            self.dataset_names.push(name.clone());
            self.dataset_index.insert(name, entry);
        }

        let n_groups = read_count(&mut cursor)?;
        let mut groups = HashMap::new();
        for _ in 0..n_groups {
            let (name, entry) = read_index_entry(&mut cursor)?;
            groups.insert(name, entry);
        }

        Ok(groups)
    }

    fn parse_attributes(&self, cursor: &mut Cursor<&[u8]>) -> Result<HashMap<String, String>> {
        let n = read_count(cursor)?;
        let mut attributes = HashMap::with_capacity(n);
        for _ in 0..n {
            let key = read_string(cursor)?;
            let value = read_string(cursor)?;
            attributes.insert(key, value);
        }
        Ok(attributes)
    }

    fn dataset(&mut self, name: &str) -> Result<TdfDataset> {
        if let Some(ds) = self.datasets.get(name) {
            return Ok(ds.clone());
        }

        let entry = *self
            .dataset_index
            .get(name)
            .ok_or_else(|| SourceError::UnknownDataset(name.to_string()))?;
        let bytes = self.read_bytes(entry.position, entry.size)?;
        let mut cursor = Cursor::new(bytes.as_slice());

        let _attributes = self.parse_attributes(&mut cursor)?;
        let _data_type = read_string(&mut cursor)?;
        let tile_width = cursor.read_f32::<LittleEndian>()?;

        let n_tiles = read_count(&mut cursor)?;
        let mut tile_positions = Vec::with_capacity(n_tiles);
        let mut tile_sizes = Vec::with_capacity(n_tiles);
        for _ in 0..n_tiles {
            tile_positions.push(cursor.read_i64::<LittleEndian>()?);
            tile_sizes.push(cursor.read_i32::<LittleEndian>()?.max(0) as usize);
        }

        if !(tile_width >= 1.0) {
            return Err(self.invalid(format!("dataset {} has tile width {}", name, tile_width)));
        }

        let ds = TdfDataset {
            tile_width,
            tile_positions,
            tile_sizes,
        };
        self.datasets.insert(name.to_string(), ds.clone());
        Ok(ds)
    }

    fn read_tile(&mut self, ds: &TdfDataset, tile_number: u32) -> Result<Option<Tile>> {
        let t = tile_number as usize;
        if t >= ds.tile_positions.len() || ds.tile_positions[t] < 0 || ds.tile_sizes[t] == 0 {
            return Ok(None);
        }

        let raw = self.read_bytes(ds.tile_positions[t] as u64, ds.tile_sizes[t])?;
        let bytes = if self.compressed {
            let mut inflated = Vec::new();
            ZlibDecoder::new(raw.as_slice())
                .read_to_end(&mut inflated)
                .map_err(|e| self.invalid(format!("cannot inflate tile {}: {}", t, e)))?;
            inflated
        } else {
            raw
        };

        let mut cursor = Cursor::new(bytes.as_slice());
        let tile_type = read_string(&mut cursor)?;
        let tile = match tile_type.as_str() {
            "fixedStep" => parse_fixed_tile(&mut cursor)?,
            "variableStep" => parse_variable_tile(&mut cursor)?,
            "bed" | "bedWithName" => parse_bed_tile(&mut cursor)?,
            other => return Err(self.invalid(format!("unknown tile type {}", other))),
        };

        Ok(Some(tile))
    }
}

impl<R: Read + Seek> TiledSource for TdfReader<R> {
    fn dataset_names(&self) -> Vec<String> {
        self.dataset_names.clone()
    }

    fn tile_width(&mut self, dataset: &str) -> Result<u32> {
        Ok(self.dataset(dataset)?.tile_width as u32)
    }

    fn tile(&mut self, dataset: &str, tile_number: u32) -> Result<Option<Tile>> {
        let ds = self.dataset(dataset)?;
        self.read_tile(&ds, tile_number)
    }

    fn track_names(&self) -> Vec<String> {
        self.track_names.clone()
    }

    ///
    /// From the `chromosomes` root attribute, falling back to the chromosome
    /// token of the dataset names (`/<chrom>/raw`).
    ///
    fn chromosome_names(&self) -> Vec<String> {
        if let Some(chroms) = self.root_attributes.get("chromosomes") {
            return chroms
                .split(',')
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string())
                .collect();
        }

        let mut chroms: Vec<String> = vec![];
        for name in &self.dataset_names {
            if let Some(chrom) = name.split('/').nth(1) {
                if !chroms.iter().any(|c| c == chrom) {
                    chroms.push(chrom.to_string());
                }
            }
        }
        chroms
    }

    fn attribute(&self, key: &str) -> Option<String> {
        self.root_attributes.get(key).cloned()
    }
}

// ──────────────────────────────────────────────
// Block parsers
// ──────────────────────────────────────────────

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let mut bytes = vec![];
    loop {
        match cursor.read_u8()? {
            0 => break,
            b => bytes.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_count(cursor: &mut Cursor<&[u8]>) -> Result<usize> {
    let n = cursor.read_i32::<LittleEndian>()?;
    Ok(n.max(0) as usize)
}

fn read_index_entry(cursor: &mut Cursor<&[u8]>) -> Result<(String, IndexEntry)> {
    let name = read_string(cursor)?;
    let position = cursor.read_i64::<LittleEndian>()?.max(0) as u64;
    let size = read_count(cursor)?;
    Ok((name, IndexEntry { position, size }))
}

///
/// Values of the first track; other tracks are skipped over.
///
fn read_first_track(cursor: &mut Cursor<&[u8]>, n_positions: usize) -> Result<Vec<f32>> {
    let n_tracks = read_count(cursor)?;
    let mut values = vec![f32::NAN; n_positions];
    for track in 0..n_tracks {
        for value in values.iter_mut() {
            let v = cursor.read_f32::<LittleEndian>()?;
            if track == 0 {
                *value = v;
            }
        }
    }
    Ok(values)
}

fn parse_fixed_tile(cursor: &mut Cursor<&[u8]>) -> Result<Tile> {
    let n_positions = read_count(cursor)?;
    let tile_start = cursor.read_i32::<LittleEndian>()?;
    let span = cursor.read_f32::<LittleEndian>()?;
    let values = read_first_track(cursor, n_positions)?;

    let bins = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| TileBin {
            start: tile_start + (i as f32 * span) as i32,
            end: tile_start + ((i + 1) as f32 * span) as i32,
            value,
        })
        .collect();
    Ok(Tile { bins })
}

fn parse_variable_tile(cursor: &mut Cursor<&[u8]>) -> Result<Tile> {
    let _tile_start = cursor.read_i32::<LittleEndian>()?;
    let span = cursor.read_f32::<LittleEndian>()?;
    let n_positions = read_count(cursor)?;
    let starts = (0..n_positions)
        .map(|_| cursor.read_i32::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;
    let values = read_first_track(cursor, n_positions)?;

    let bins = starts
        .into_iter()
        .zip(values)
        .map(|(start, value)| TileBin {
            start,
            end: start + span as i32,
            value,
        })
        .collect();
    Ok(Tile { bins })
}

fn parse_bed_tile(cursor: &mut Cursor<&[u8]>) -> Result<Tile> {
    let n_positions = read_count(cursor)?;
    let starts = (0..n_positions)
        .map(|_| cursor.read_i32::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;
    let ends = (0..n_positions)
        .map(|_| cursor.read_i32::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;
    let values = read_first_track(cursor, n_positions)?;

    let bins = starts
        .into_iter()
        .zip(ends)
        .zip(values)
        .map(|((start, end), value)| TileBin { start, end, value })
        .collect();
    Ok(Tile { bins })
}
