use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use asciiwig_core::models::{Region, Viewport};
use asciiwig_tracks::{ProfileStyle, Track, TrackOptions};

///
/// Read a [`ProfileStyle`] from a TOML file. Missing keys keep their default.
///
pub fn load_style(path: &Path) -> Result<ProfileStyle> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read style file {}", path.display()))?;
    let style = toml::from_str(&text)
        .with_context(|| format!("Invalid style file {}", path.display()))?;
    Ok(style)
}

///
/// Gather the track settings from the command line.
///
pub fn track_options(matches: &ArgMatches) -> Result<TrackOptions> {
    let data_column = *matches
        .get_one::<usize>("column")
        .context("A data column is required.")?;
    let max_rows = *matches
        .get_one::<usize>("rows")
        .context("A number of rows is required.")?;

    Ok(TrackOptions {
        data_column,
        rpm: matches.get_flag("rpm"),
        ymin: matches.get_one::<f32>("ymin").copied().unwrap_or(f32::NAN),
        ymax: matches.get_one::<f32>("ymax").copied().unwrap_or(f32::NAN),
        max_rows,
        ..Default::default()
    })
}

pub fn run_profile(matches: &ArgMatches) -> Result<()> {
    let track_file = matches
        .get_one::<String>("track")
        .context("A path to a track file is required.")?;

    let region = matches
        .get_one::<String>("region")
        .context("A region is required.")?
        .parse::<Region>()?;

    let width = *matches
        .get_one::<usize>("width")
        .context("A width is required.")?;

    let style = match matches.get_one::<String>("style") {
        Some(path) => load_style(Path::new(path))?,
        None => ProfileStyle::default(),
    };

    let options = track_options(matches)?;
    let viewport = Viewport::new(region, width)?;

    let mut track = Track::open(track_file, options)?;
    track.update(&viewport)?;
    info!("Drawing {} over {}", track.name(), viewport.region());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if !matches.get_flag("no-title") {
        writeln!(out, "{}", track.title()?)?;
    }
    let profile = track.print_to_screen(&style)?;
    if !profile.is_empty() {
        writeln!(out, "{}", profile)?;
    }
    out.flush()?;

    track.close()?;

    Ok(())
}
