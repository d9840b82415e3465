//! # Quantitative tracks for asciiwig
//!
//! A [`Track`] reads a bigWig, TDF or bedGraph file, folds the signal over a
//! genomic window into one score per terminal column and draws the scores as
//! a text profile.
//!
//! ```ignore
//! use asciiwig_core::models::{Region, Viewport};
//! use asciiwig_tracks::{ProfileStyle, Track, TrackOptions};
//!
//! let mut track = Track::open("signal.bedGraph", TrackOptions::default())?;
//! let viewport = Viewport::new("chr1:1-1000".parse::<Region>()?, 80)?;
//! track.update(&viewport)?;
//! println!("{}", track.print_to_screen(&ProfileStyle::default())?);
//! ```
//!
pub mod adapters;
pub mod error;
pub mod normalize;
pub mod render;
pub mod track;

pub use adapters::{Aggregate, AggregationParams, SourceAdapter};
pub use error::{Result, TrackError};
pub use render::{ProfileStyle, TextProfile};
pub use track::{Track, TrackOptions, TrackState};
