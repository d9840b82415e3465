use std::path::{Path, PathBuf};

use log::{debug, info};

use asciiwig_core::models::{ScreenScores, Viewport};
use asciiwig_core::utils::{TrackFormat, get_file_info};
use asciiwig_io::{DerivedCopy, has_tabix_index, sort_bgzip_index};

use crate::adapters::{Aggregate, AggregationParams, MIN_DATA_COLUMN, SourceAdapter};
use crate::error::{Result, TrackError};
use crate::normalize::{TOTAL_COUNT_ATTRIBUTE, rpm_or_raw};
use crate::render::{ProfileStyle, TextProfile, profile_title};

pub const DEFAULT_MAX_ROWS: usize = 10;

///
/// User settings of a track.
///
#[derive(Debug, Clone, PartialEq)]
pub struct TrackOptions {
    /// 1-based bedGraph column the values are read from, 4 or more
    pub data_column: usize,
    /// show TDF coverage as reads per million
    pub rpm: bool,
    /// lower y limit, NaN to autoscale
    pub ymin: f32,
    /// upper y limit, NaN to autoscale
    pub ymax: f32,
    pub max_rows: usize,
    /// where derived bedGraph copies are written, the system temp dir if `None`
    pub tmp_dir: Option<PathBuf>,
}

impl Default for TrackOptions {
    fn default() -> Self {
        TrackOptions {
            data_column: MIN_DATA_COLUMN,
            rpm: false,
            ymin: f32::NAN,
            ymax: f32::NAN,
            max_rows: DEFAULT_MAX_ROWS,
            tmp_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Reader open, nothing aggregated yet.
    Opened,
    /// Scores hold the last viewport.
    Updated,
    /// Reader and derived files released; the track cannot be used anymore.
    Closed,
}

/// What the reader is actually looking at.
#[derive(Debug)]
enum WorkFile {
    Original,
    Derived(DerivedCopy),
    /// reader supplied by the caller, there is no file to reopen
    External,
}

///
/// Ensure a bedGraph column index is one values can be read from.
///
pub fn validate_data_column(data_column: usize) -> Result<()> {
    if data_column < MIN_DATA_COLUMN {
        return Err(TrackError::Config(format!(
            "Invalid data column index {}: bedGraph values are read from column {} or later",
            data_column, MIN_DATA_COLUMN
        )));
    }
    Ok(())
}

/// An indexed copy of `filename` if it is a bedGraph nobody indexed.
fn prepare_work_file(
    filename: &Path,
    format: TrackFormat,
    tmp_dir: Option<&Path>,
) -> Result<Option<DerivedCopy>> {
    if format != TrackFormat::BedGraph || has_tabix_index(filename) {
        return Ok(None);
    }
    info!(
        "{} has no tabix index, writing a sorted and indexed copy",
        filename.display()
    );
    Ok(Some(sort_bgzip_index(filename, tmp_dir)?))
}

///
/// A quantitative track: owns the reader of one file, aggregates it for the
/// current viewport and draws the result as text.
///
pub struct Track {
    filename: PathBuf,
    format: TrackFormat,
    work: WorkFile,
    adapter: Option<SourceAdapter>,
    options: TrackOptions,
    state: TrackState,
    viewport: Option<Viewport>,
    scores: ScreenScores,
}

impl Track {
    ///
    /// Open a bigWig, TDF or bedGraph file. The format comes from the
    /// extension; a bedGraph without `.tbi` is copied, sorted and indexed
    /// first.
    ///
    /// # Arguments
    /// - path: the track file
    /// - options: initial settings, the data column is validated before the
    ///   file is touched
    ///
    pub fn open<P: AsRef<Path>>(path: P, options: TrackOptions) -> Result<Track> {
        let filename = path.as_ref().to_path_buf();
        validate_data_column(options.data_column)?;

        let format = get_file_info(&filename)?.file_format;
        let work = match prepare_work_file(&filename, format, options.tmp_dir.as_deref())? {
            Some(copy) => WorkFile::Derived(copy),
            None => WorkFile::Original,
        };
        let adapter = SourceAdapter::open(format, work_path(&work, &filename))?;

        info!("Opened {} track {}", format, filename.display());

        Ok(Track {
            filename,
            format,
            work,
            adapter: Some(adapter),
            options,
            state: TrackState::Opened,
            viewport: None,
            scores: ScreenScores::default(),
        })
    }

    ///
    /// Build a track around a reader opened elsewhere. `name` is only used for
    /// titles and messages.
    ///
    pub fn from_adapter(
        name: &str,
        format: TrackFormat,
        adapter: SourceAdapter,
        options: TrackOptions,
    ) -> Result<Track> {
        validate_data_column(options.data_column)?;
        Ok(Track {
            filename: PathBuf::from(name),
            format,
            work: WorkFile::External,
            adapter: Some(adapter),
            options,
            state: TrackState::Opened,
            viewport: None,
            scores: ScreenScores::default(),
        })
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            TrackState::Closed => Err(TrackError::Closed(self.name())),
            _ => Ok(()),
        }
    }

    ///
    /// Aggregate the track over `viewport`, one score per column.
    ///
    pub fn update(&mut self, viewport: &Viewport) -> Result<&ScreenScores> {
        self.ensure_open()?;
        let name = self.name();
        let adapter = self
            .adapter
            .as_mut()
            .ok_or_else(|| TrackError::Closed(name.clone()))?;

        let params = AggregationParams {
            data_column: self.options.data_column,
        };
        let mut scores = adapter.aggregate(viewport, &params)?;
        if self.options.rpm && adapter.supports_normalization() {
            let total_count = adapter.attribute(TOTAL_COUNT_ATTRIBUTE);
            scores = rpm_or_raw(scores, total_count.as_deref(), &name);
        }

        debug!("Updated {} for {}", name, viewport.region());
        self.scores = scores;
        self.viewport = Some(viewport.clone());
        self.state = TrackState::Updated;
        Ok(&self.scores)
    }

    /// Aggregate the last viewport again, if there is one.
    fn refresh(&mut self) -> Result<()> {
        if let Some(viewport) = self.viewport.clone() {
            self.update(&viewport)?;
        }
        Ok(())
    }

    ///
    /// Read bedGraph values from another (1-based) column and re-aggregate.
    /// Indexes below 4 are rejected and leave the track as it was.
    ///
    pub fn set_data_column_index(&mut self, data_column: usize) -> Result<()> {
        self.ensure_open()?;
        validate_data_column(data_column)?;
        self.options.data_column = data_column;
        self.refresh()
    }

    ///
    /// Toggle reads-per-million. Only TDF tracks carry a total count, so only
    /// those are aggregated again.
    ///
    pub fn set_rpm(&mut self, rpm: bool) -> Result<()> {
        self.ensure_open()?;
        self.options.rpm = rpm;
        let normalizable = self
            .adapter
            .as_ref()
            .is_some_and(|a| a.supports_normalization());
        if normalizable {
            self.refresh()?;
        }
        Ok(())
    }

    pub fn set_ylim(&mut self, ymin: f32, ymax: f32) -> Result<()> {
        self.ensure_open()?;
        self.options.ymin = ymin;
        self.options.ymax = ymax;
        Ok(())
    }

    pub fn set_max_rows(&mut self, max_rows: usize) -> Result<()> {
        self.ensure_open()?;
        self.options.max_rows = max_rows;
        Ok(())
    }

    pub fn chromosome_names(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        let adapter = self
            .adapter
            .as_ref()
            .ok_or_else(|| TrackError::Closed(self.name()))?;
        Ok(adapter.chromosome_names())
    }

    ///
    /// Reopen the file (re-deriving the indexed copy of a bedGraph) and
    /// aggregate the current viewport again.
    ///
    pub fn reload(&mut self) -> Result<()> {
        self.ensure_open()?;
        if !matches!(self.work, WorkFile::External) {
            let work = match prepare_work_file(
                &self.filename,
                self.format,
                self.options.tmp_dir.as_deref(),
            )? {
                Some(copy) => WorkFile::Derived(copy),
                None => WorkFile::Original,
            };
            let adapter = SourceAdapter::open(self.format, work_path(&work, &self.filename))?;
            // old reader goes before the copy it reads
            self.adapter = Some(adapter);
            self.work = work;
            info!("Reloaded {}", self.filename.display());
        }
        self.refresh()
    }

    ///
    /// Release the reader and delete any derived copy.
    ///
    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.adapter = None;
        if matches!(self.work, WorkFile::Derived(_)) {
            self.work = WorkFile::Original;
        }
        self.state = TrackState::Closed;
        debug!("Closed {}", self.filename.display());
        Ok(())
    }

    ///
    /// The current scores drawn as text, `max_rows` lines.
    ///
    pub fn print_to_screen(&self, style: &ProfileStyle) -> Result<String> {
        self.ensure_open()?;
        let profile = TextProfile::new(
            &self.scores,
            self.options.max_rows,
            self.options.ymin,
            self.options.ymax,
        );
        Ok(profile.render(style))
    }

    pub fn title(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(profile_title(
            &self.name(),
            self.options.ymin,
            self.options.ymax,
            &self.scores,
        ))
    }

    /// File name without directories
    pub fn name(&self) -> String {
        self.filename
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| self.filename.display().to_string())
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    ///
    /// The file the reader has open: the derived copy for an unindexed
    /// bedGraph, the track file otherwise. `None` when closed or external.
    ///
    pub fn work_path(&self) -> Option<&Path> {
        match (&self.work, self.state) {
            (_, TrackState::Closed) | (WorkFile::External, _) => None,
            (work, _) => Some(work_path(work, &self.filename)),
        }
    }

    pub fn format(&self) -> TrackFormat {
        self.format
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn options(&self) -> &TrackOptions {
        &self.options
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn screen_scores(&self) -> &ScreenScores {
        &self.scores
    }
}

fn work_path<'a>(work: &'a WorkFile, filename: &'a Path) -> &'a Path {
    match work {
        WorkFile::Derived(copy) => copy.path(),
        WorkFile::Original | WorkFile::External => filename,
    }
}
