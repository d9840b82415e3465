//! Writers for the binary fixtures the integration tests open from disk.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bigtools::beddata::BedParserStreamingIterator;
use bigtools::{BigWigWrite, Value};
use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use tokio::runtime;

///
/// Write a bigWig with one `(chrom, start, end, value)` entry per interval.
/// Intervals are 0-based half-open and must be sorted.
///
pub fn write_bigwig(
    dir: &Path,
    name: &str,
    chrom_sizes: &[(&str, u32)],
    intervals: &[(&str, u32, u32, f32)],
) -> PathBuf {
    let path = dir.join(name);
    let chrom_map: HashMap<String, u32> = chrom_sizes
        .iter()
        .map(|(chrom, size)| (chrom.to_string(), *size))
        .collect();

    let mut outb = BigWigWrite::create_file(&path, chrom_map).unwrap();
    outb.options.channel_size = 0;
    let runtime = runtime::Builder::new_current_thread().build().unwrap();

    let values: Vec<(String, Value)> = intervals
        .iter()
        .map(|(chrom, start, end, value)| {
            (
                chrom.to_string(),
                Value {
                    start: *start,
                    end: *end,
                    value: *value,
                },
            )
        })
        .collect();
    let data = BedParserStreamingIterator::wrap_infallible_iter(values.into_iter(), false);
    outb.write(data, runtime).unwrap();
    path
}

fn put_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

fn bed_tile(bins: &[(i32, i32, f32)]) -> Vec<u8> {
    let mut buf = vec![];
    put_string(&mut buf, "bed");
    buf.write_i32::<LittleEndian>(bins.len() as i32).unwrap();
    for (start, _, _) in bins {
        buf.write_i32::<LittleEndian>(*start).unwrap();
    }
    for (_, end, _) in bins {
        buf.write_i32::<LittleEndian>(*end).unwrap();
    }
    // one track
    buf.write_i32::<LittleEndian>(1).unwrap();
    for (_, _, value) in bins {
        buf.write_f32::<LittleEndian>(*value).unwrap();
    }
    buf
}

///
/// Write a version 4 TDF with a single track and zlib-compressed bed tiles.
/// Each dataset is `(name, tile_width, tiles)`.
///
pub fn write_tdf(
    dir: &Path,
    name: &str,
    root_attributes: &[(&str, &str)],
    datasets: &[(&str, f32, Vec<Vec<(i32, i32, f32)>>)],
) -> PathBuf {
    const PREAMBLE_SIZE: usize = 24;

    let mut header = vec![];
    header.write_i32::<LittleEndian>(1).unwrap();
    put_string(&mut header, "mean");
    put_string(&mut header, "OTHER");
    put_string(&mut header, "");
    header.write_i32::<LittleEndian>(1).unwrap();
    put_string(&mut header, "sample");
    put_string(&mut header, "hg19");
    // compressed
    header.write_i32::<LittleEndian>(1).unwrap();

    let body_start = (PREAMBLE_SIZE + header.len()) as i64;
    let mut body = vec![];
    let mut entries = vec![];

    for (dataset, tile_width, tiles) in datasets {
        let mut tile_index = vec![];
        for bins in tiles {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(&bed_tile(bins)).unwrap();
            let bytes = enc.finish().unwrap();
            tile_index.push((body_start + body.len() as i64, bytes.len() as i32));
            body.extend_from_slice(&bytes);
        }

        let mut ds = vec![];
        ds.write_i32::<LittleEndian>(0).unwrap();
        put_string(&mut ds, "FLOAT");
        ds.write_f32::<LittleEndian>(*tile_width).unwrap();
        ds.write_i32::<LittleEndian>(tile_index.len() as i32).unwrap();
        for (position, size) in tile_index {
            ds.write_i64::<LittleEndian>(position).unwrap();
            ds.write_i32::<LittleEndian>(size).unwrap();
        }
        entries.push((dataset.to_string(), body_start + body.len() as i64, ds.len() as i32));
        body.extend_from_slice(&ds);
    }

    let mut group = vec![];
    group.write_i32::<LittleEndian>(root_attributes.len() as i32).unwrap();
    for (key, value) in root_attributes {
        put_string(&mut group, key);
        put_string(&mut group, value);
    }
    let group_position = body_start + body.len() as i64;
    let group_size = group.len() as i32;
    body.extend_from_slice(&group);

    let mut index = vec![];
    index.write_i32::<LittleEndian>(entries.len() as i32).unwrap();
    for (dataset, position, size) in &entries {
        put_string(&mut index, dataset);
        index.write_i64::<LittleEndian>(*position).unwrap();
        index.write_i32::<LittleEndian>(*size).unwrap();
    }
    index.write_i32::<LittleEndian>(1).unwrap();
    put_string(&mut index, "/");
    index.write_i64::<LittleEndian>(group_position).unwrap();
    index.write_i32::<LittleEndian>(group_size).unwrap();
    let index_position = body_start + body.len() as i64;

    let mut out = vec![];
    out.extend_from_slice(b"TDF4");
    out.write_i32::<LittleEndian>(4).unwrap();
    out.write_i64::<LittleEndian>(index_position).unwrap();
    out.write_i32::<LittleEndian>(index.len() as i32).unwrap();
    out.write_i32::<LittleEndian>(header.len() as i32).unwrap();
    out.extend_from_slice(&header);
    out.extend_from_slice(&body);
    out.extend_from_slice(&index);

    let path = dir.join(name);
    fs::write(&path, out).unwrap();
    path
}
