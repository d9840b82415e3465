//! Interfaces of the three kinds of store a track can be backed by.
//!
//! The aggregation code only talks to these traits, so any reader (a real file,
//! a remote resource, or an in-memory fixture in tests) can feed it.

use crate::error::Result;

///
/// A run of bases sharing one value, 1-based and end-inclusive.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenseInterval {
    pub start: u32,
    pub end: u32,
    pub value: f32,
}

pub type IntervalIter<'a> = Box<dyn Iterator<Item = Result<DenseInterval>> + 'a>;

///
/// bigWig-like store: a lazy stream of valued intervals per query.
///
pub trait DenseSource {
    fn chrom_names(&self) -> Vec<String>;

    /// Intervals overlapping `from..=to` on `chrom`.
    fn intervals(&mut self, chrom: &str, from: u32, to: u32) -> Result<IntervalIter<'_>>;
}

///
/// One bin of a tile; `start` is 0-based, `end` exclusive.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBin {
    pub start: i32,
    pub end: i32,
    pub value: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    pub bins: Vec<TileBin>,
}

impl Tile {
    pub fn size(&self) -> usize {
        self.bins.len()
    }
}

///
/// TDF-like store: datasets partitioned in fixed-width tiles.
///
pub trait TiledSource {
    fn dataset_names(&self) -> Vec<String>;

    fn tile_width(&mut self, dataset: &str) -> Result<u32>;

    /// `None` when the tile holds no data.
    fn tile(&mut self, dataset: &str, tile_number: u32) -> Result<Option<Tile>>;

    fn track_names(&self) -> Vec<String>;

    fn chromosome_names(&self) -> Vec<String>;

    /// Attribute of the root group, e.g. `totalCount`.
    fn attribute(&self, key: &str) -> Option<String>;
}

pub type LineIter<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

///
/// tabix-like store: raw text lines overlapping a region.
///
pub trait SparseSource {
    fn sequence_names(&self) -> Vec<String>;

    /// Lines overlapping `from..=to` (1-based) on `chrom`.
    fn query(&mut self, chrom: &str, from: u32, to: u32) -> Result<LineIter<'_>>;
}
