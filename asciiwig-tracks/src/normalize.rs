//! Reads-per-million normalization of TDF coverage.
use log::warn;

use asciiwig_core::models::ScreenScores;

/// Root attribute holding the number of reads a TDF was computed from.
pub const TOTAL_COUNT_ATTRIBUTE: &str = "totalCount";

pub const RPM_SCALE: f64 = 1_000_000.0;

///
/// Parse a `totalCount` attribute. Missing, malformed and non-positive counts
/// cannot normalize anything and give `None`.
///
pub fn parse_total_count(attribute: Option<&str>) -> Option<f64> {
    let count = attribute?.trim().parse::<f64>().ok()?;
    (count.is_finite() && count > 0.0).then_some(count)
}

///
/// `score / total_count * 1e6` for every column; NaN stays NaN.
///
pub fn normalize_to_rpm(scores: &ScreenScores, total_count: f64) -> ScreenScores {
    scores.map(|score| (score as f64 / total_count * RPM_SCALE) as f32)
}

///
/// Normalize `scores` if `total_count` is usable, otherwise warn and hand the
/// raw scores back.
///
pub fn rpm_or_raw(scores: ScreenScores, total_count: Option<&str>, name: &str) -> ScreenScores {
    match parse_total_count(total_count) {
        Some(count) => normalize_to_rpm(&scores, count),
        None => {
            warn!("Cannot get total counts for {}, showing raw scores", name);
            scores
        }
    }
}
