//! # Track readers for asciiwig.
//!
//! The aggregation engine reads through three small traits in [`sources`]:
//! dense interval streams, tiled indexes and line-oriented interval stores.
//! This crate implements them for bigWig (via bigtools), TDF and tabix-indexed
//! bedGraph (via noodles), and knows how to turn an unindexed bedGraph into a
//! sorted, bgzipped and indexed temporary copy.
//!
pub mod bedgraph;
pub mod bigwig;
pub mod error;
pub mod sources;
pub mod tabix;
pub mod tdf;

// re-expose core functions
pub use bedgraph::{DerivedCopy, is_header_line, sort_bgzip_index};
pub use bigwig::BigWigSource;
pub use error::*;
pub use sources::*;
pub use tabix::{TabixSource, has_tabix_index, tabix_index_path};
pub use tdf::TdfReader;
