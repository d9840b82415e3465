mod common;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rstest::*;
use tempfile::{TempDir, tempdir};

use asciiwig_core::models::{Region, Viewport};
use asciiwig_core::utils::TrackFormat;
use asciiwig_io::{Tile, TileBin, TiledSource};
use asciiwig_tracks::adapters::tiled::TiledAdapter;
use asciiwig_tracks::{ProfileStyle, SourceAdapter, Track, TrackError, TrackOptions, TrackState};

#[fixture]
fn path_to_bedgraph() -> &'static str {
    "tests/data/test.bedGraph"
}

#[fixture]
fn path_to_invalid_bedgraph() -> &'static str {
    "tests/data/invalid-1.bedgraph"
}

/// Scratch dir for derived copies, so tests can look at what is left behind.
#[fixture]
fn tmp() -> TempDir {
    tempdir().unwrap()
}

fn options_in(dir: &Path) -> TrackOptions {
    TrackOptions {
        tmp_dir: Some(dir.to_path_buf()),
        ..Default::default()
    }
}

fn viewport(region: &str, width: usize) -> Viewport {
    Viewport::new(region.parse::<Region>().unwrap(), width).unwrap()
}

fn derived_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with(".asciiwig."))
        .collect()
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

///
/// One raw chr1 dataset of 100bp tiles, bins of 10bp with value `bin index + 1`.
///
struct CoverageTiles {
    total_count: Option<String>,
}

impl TiledSource for CoverageTiles {
    fn dataset_names(&self) -> Vec<String> {
        vec!["/chr1/raw".to_string(), "/chr1/z0/mean".to_string()]
    }

    fn tile_width(&mut self, _dataset: &str) -> asciiwig_io::Result<u32> {
        Ok(100)
    }

    fn tile(&mut self, _dataset: &str, tile_number: u32) -> asciiwig_io::Result<Option<Tile>> {
        if tile_number > 0 {
            return Ok(None);
        }
        let bins = (0..10)
            .map(|i| TileBin {
                start: i * 10,
                end: i * 10 + 10,
                value: (i + 1) as f32,
            })
            .collect();
        Ok(Some(Tile { bins }))
    }

    fn track_names(&self) -> Vec<String> {
        vec!["coverage".to_string()]
    }

    fn chromosome_names(&self) -> Vec<String> {
        vec!["All".to_string(), "chr1".to_string()]
    }

    fn attribute(&self, key: &str) -> Option<String> {
        match key {
            "totalCount" => self.total_count.clone(),
            _ => None,
        }
    }
}

fn tdf_track(total_count: Option<&str>) -> Track {
    let source = CoverageTiles {
        total_count: total_count.map(String::from),
    };
    let adapter = SourceAdapter::Tiled(TiledAdapter::new(Box::new(source), "coverage.tdf"));
    Track::from_adapter("coverage.tdf", TrackFormat::Tdf, adapter, TrackOptions::default()).unwrap()
}

mod tests {
    use super::*;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;

    #[rstest]
    fn test_unknown_extension_is_a_format_error(tmp: TempDir) {
        let path = write_file(tmp.path(), "peaks.txt", "chr1\t0\t10\t1\n");
        let result = Track::open(&path, TrackOptions::default());
        assert!(matches!(result, Err(TrackError::Format(_))));
    }

    #[rstest]
    fn test_data_column_below_four_is_rejected_before_io() {
        let options = TrackOptions {
            data_column: 3,
            ..Default::default()
        };
        // the file does not even exist
        let result = Track::open("no/such/file.bedGraph", options);
        assert!(matches!(result, Err(TrackError::Config(_))));
    }

    #[rstest]
    fn test_screen_scores_have_one_value_per_column(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        assert_eq!(track.format(), TrackFormat::BedGraph);
        assert_eq!(track.state(), TrackState::Opened);

        let scores = track.update(&viewport("chr1:1-100", 50)).unwrap();
        assert_eq!(scores.len(), 50);
        assert_eq!(scores[0], 10.0);
        // nothing past 60
        assert!(scores.iter().skip(31).all(|s| s.is_nan()));
        assert_eq!(track.state(), TrackState::Updated);
    }

    #[rstest]
    fn test_unknown_chromosome_is_all_nan(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        let scores = track.update(&viewport("chrM:1-100", 20)).unwrap();
        assert_eq!(scores.len(), 20);
        assert!(scores.iter().all(|s| s.is_nan()));
    }

    #[rstest]
    fn test_update_is_idempotent(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        let vp = viewport("chr1:1-80", 33);
        let first: Vec<u32> = track.update(&vp).unwrap().iter().map(|s| s.to_bits()).collect();
        let second: Vec<u32> = track.update(&vp).unwrap().iter().map(|s| s.to_bits()).collect();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_invalid_record_is_nan(path_to_invalid_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_invalid_bedgraph, options_in(tmp.path())).unwrap();
        let scores = track.update(&viewport("chr1:1-10", 10)).unwrap();
        assert!(scores[0].is_nan());
        assert_eq!(scores[1], 10.0);
    }

    #[rstest]
    fn test_read_fifth_column(path_to_bedgraph: &str, tmp: TempDir) {
        let options = TrackOptions {
            data_column: 5,
            ..options_in(tmp.path())
        };
        let mut track = Track::open(path_to_bedgraph, options).unwrap();
        let scores = track.update(&viewport("chr1:1-30", 80)).unwrap();
        assert_eq!(scores[0], 0.0);
    }

    #[rstest]
    fn test_value_column_after_extra_fields(tmp: TempDir) {
        let path = write_file(tmp.path(), "extra.bedGraph", "chr1  0  30  X  Y  0\n");
        let options = TrackOptions {
            data_column: 6,
            ..options_in(tmp.path())
        };
        let mut track = Track::open(&path, options).unwrap();
        let scores = track.update(&viewport("chr1:1-30", 80)).unwrap();
        assert_eq!(scores[0], 0.0);

        // column 4 holds "X": nothing to show
        track.set_data_column_index(4).unwrap();
        assert!(track.screen_scores()[0].is_nan());
    }

    #[rstest]
    fn test_set_data_column_reaggregates(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        track.update(&viewport("chr1:41-60", 20)).unwrap();
        assert_eq!(track.screen_scores()[0], 3.0);

        track.set_data_column_index(5).unwrap();
        assert_eq!(track.screen_scores()[0], 4.0);

        let result = track.set_data_column_index(3);
        assert!(matches!(result, Err(TrackError::Config(_))));
        assert_eq!(track.options().data_column, 5);
    }

    #[rstest]
    fn test_rpm_does_nothing_for_bedgraph(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        let vp = viewport("chr1:1-60", 60);
        let raw = track.update(&vp).unwrap().clone();
        track.set_rpm(true).unwrap();
        assert_eq!(track.update(&vp).unwrap(), &raw);
    }

    #[rstest]
    fn test_chromosome_names(path_to_bedgraph: &str, tmp: TempDir) {
        let track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        assert_eq!(track.chromosome_names().unwrap(), vec!["chr1", "chr2"]);
    }

    #[rstest]
    fn test_gzipped_bedgraph(tmp: TempDir) {
        let path = tmp.path().join("signal.bedGraph.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"chr1\t0\t10\t2\nchr1\t10\t20\t4\n").unwrap();
        encoder.finish().unwrap();

        let mut track = Track::open(&path, options_in(tmp.path())).unwrap();
        let scores = track.update(&viewport("chr1:1-20", 20)).unwrap();
        assert_eq!(scores[0], 2.0);
        assert_eq!(scores[19], 4.0);
    }

    #[rstest]
    fn test_derived_copy_is_deleted_on_close(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        let work = track.work_path().unwrap().to_path_buf();
        assert_ne!(work, Path::new(path_to_bedgraph));
        assert_eq!(derived_files(tmp.path()).len(), 2);

        track.close().unwrap();
        assert!(!work.exists());
        assert!(derived_files(tmp.path()).is_empty());
        assert!(Path::new(path_to_bedgraph).exists());
    }

    #[rstest]
    fn test_derived_copy_is_deleted_on_drop(path_to_bedgraph: &str, tmp: TempDir) {
        let track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        assert_eq!(derived_files(tmp.path()).len(), 2);
        drop(track);
        assert!(derived_files(tmp.path()).is_empty());
    }

    #[rstest]
    fn test_usage_after_close(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        track.close().unwrap();
        assert_eq!(track.state(), TrackState::Closed);

        assert!(matches!(track.update(&viewport("chr1:1-10", 10)), Err(TrackError::Closed(_))));
        assert!(matches!(track.chromosome_names(), Err(TrackError::Closed(_))));
        assert!(matches!(track.set_rpm(true), Err(TrackError::Closed(_))));
        assert!(matches!(track.reload(), Err(TrackError::Closed(_))));
        assert!(matches!(track.close(), Err(TrackError::Closed(_))));
        assert!(track.work_path().is_none());
    }

    #[rstest]
    fn test_reload_reads_changed_file(tmp: TempDir) {
        let path = write_file(tmp.path(), "live.bedGraph", "chr1\t0\t10\t1\n");
        let mut track = Track::open(&path, options_in(tmp.path())).unwrap();
        track.update(&viewport("chr1:1-10", 10)).unwrap();
        let old_copy = track.work_path().unwrap().to_path_buf();

        write_file(tmp.path(), "live.bedGraph", "chr1\t0\t10\t7\n");
        track.reload().unwrap();

        assert_eq!(track.screen_scores().as_slice(), &[7.0; 10]);
        assert!(!old_copy.exists());
        assert_eq!(derived_files(tmp.path()).len(), 2);
    }

    #[rstest]
    fn test_print_with_fixed_limits(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        track.set_ylim(-10.0, 10.0).unwrap();
        track.set_max_rows(10).unwrap();
        track.update(&viewport("chr1:1-60", 60)).unwrap();

        let profile = track.print_to_screen(&ProfileStyle::default()).unwrap();
        let lines: Vec<&str> = profile.split('\n').collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.chars().count() == 60));
        assert!(profile.contains(':'));
        assert!(profile.contains('\''));
        assert!(profile.contains('.'));

        assert_eq!(
            track.title().unwrap(),
            "test.bedGraph; ylim[-10 10]; range[-5.5 10]"
        );
    }

    #[rstest]
    fn test_print_with_no_rows(path_to_bedgraph: &str, tmp: TempDir) {
        let mut track = Track::open(path_to_bedgraph, options_in(tmp.path())).unwrap();
        track.set_max_rows(0).unwrap();
        track.update(&viewport("chr1:1-60", 60)).unwrap();
        assert_eq!(track.print_to_screen(&ProfileStyle::default()).unwrap(), "");
    }

    #[rstest]
    fn test_rpm_rescales_tiled_scores() {
        let mut track = tdf_track(Some("500000"));
        let vp = viewport("chr1:1-100", 10);
        let raw = track.update(&vp).unwrap().clone();
        assert_eq!(raw[0], 1.0);

        track.set_rpm(true).unwrap();
        let rpm = track.screen_scores();
        assert!(rpm[0] > raw[0]);
        for (r, n) in raw.iter().zip(rpm.iter()) {
            assert_eq!(*n, (*r as f64 / 500_000.0 * 1_000_000.0) as f32);
        }

        // back to raw, not normalized twice
        track.set_rpm(false).unwrap();
        assert_eq!(track.screen_scores(), &raw);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("unknown"))]
    #[case(Some("0"))]
    fn test_rpm_without_total_count_keeps_raw(#[case] total_count: Option<&str>) {
        let mut track = tdf_track(total_count);
        let vp = viewport("chr1:1-100", 10);
        let raw = track.update(&vp).unwrap().clone();
        track.set_rpm(true).unwrap();
        assert_eq!(track.screen_scores(), &raw);
    }

    #[rstest]
    fn test_tiled_chromosome_names() {
        let track = tdf_track(None);
        assert_eq!(track.chromosome_names().unwrap(), vec!["chr1"]);
        assert!(track.work_path().is_none());
    }

    #[rstest]
    fn test_bigwig_intervals_are_read_one_based(tmp: TempDir) {
        let path = common::write_bigwig(
            tmp.path(),
            "signal.bw",
            &[("chr1", 1000)],
            &[("chr1", 0, 4, 2.0), ("chr1", 4, 8, 6.0), ("chr1", 14, 30, 1.0)],
        );
        let mut track = Track::open(&path, TrackOptions::default()).unwrap();
        assert_eq!(track.format(), TrackFormat::BigWig);
        assert_eq!(track.chromosome_names().unwrap(), vec!["chr1"]);

        let scores = track.update(&viewport("chr1:1-10", 10)).unwrap().clone();
        assert_eq!(&scores.as_slice()[..8], &[2.0, 2.0, 2.0, 2.0, 6.0, 6.0, 6.0, 6.0]);
        assert!(scores[8].is_nan() && scores[9].is_nan());

        let scores = track.update(&viewport("chr1:20-29", 10)).unwrap();
        assert_eq!(scores.as_slice(), &[1.0; 10]);
    }

    #[rstest]
    fn test_tdf_file_with_total_count(tmp: TempDir) {
        let bins: Vec<(i32, i32, f32)> = (0..10).map(|i| (i * 10, i * 10 + 10, (i + 1) as f32)).collect();
        let path = common::write_tdf(
            tmp.path(),
            "coverage.tdf",
            &[("chromosomes", "All,chr1"), ("totalCount", "2000000")],
            &[
                ("/chr1/raw", 100.0, vec![bins]),
                ("/chr1/z0/mean", 1000.0, vec![vec![(0, 1000, 100.0)]]),
            ],
        );
        let mut track = Track::open(&path, TrackOptions::default()).unwrap();
        assert_eq!(track.format(), TrackFormat::Tdf);
        assert_eq!(track.chromosome_names().unwrap(), vec!["chr1"]);

        let raw = track.update(&viewport("chr1:1-100", 10)).unwrap().clone();
        assert_eq!(raw.len(), 10);
        assert_eq!(raw[0], 1.0);

        track.set_rpm(true).unwrap();
        assert_eq!(track.screen_scores()[0], 0.5);
    }
}
