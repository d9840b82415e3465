//! # Core models for asciiwig
//!
//! Everything the aggregation engine needs that does not touch a file: query
//! regions, the genome-to-screen mapping with its nearest-column lookup, the
//! per-column accumulator and the resulting [`ScreenScores`](models::ScreenScores).
//!
pub mod accumulator;
pub mod errors;
pub mod models;
pub mod utils;

pub use accumulator::{ScreenBins, ScreenLocus};
pub use errors::{CoreError, Result};
