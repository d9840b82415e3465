use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use asciiwig_tracks::{Track, TrackOptions};

pub fn run_chroms(matches: &ArgMatches) -> Result<()> {
    let track_file = matches
        .get_one::<String>("track")
        .context("A path to a track file is required.")?;

    let mut track = Track::open(track_file, TrackOptions::default())?;
    let names = track.chromosome_names()?;
    track.close()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for name in names {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;

    Ok(())
}
