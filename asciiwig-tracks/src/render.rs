//! Text rendering of screen scores.
//!
//! Every row of text is split in a lower and an upper half, so a profile of
//! `rows` lines has `2 * rows` vertical steps. Bars grow from the zero line
//! (or from the edge of the plot when zero is out of range) towards the value.

use log::debug;
use serde::{Deserialize, Serialize};

use asciiwig_core::models::ScreenScores;
use asciiwig_core::utils::round_to_significant;

///
/// Characters a profile is drawn with.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileStyle {
    /// both halves of the cell filled
    pub full: char,
    /// only the lower half filled
    pub lower_half: char,
    /// only the upper half filled
    pub upper_half: char,
    /// the value sits on the zero line
    pub zero: char,
    pub blank: char,
}

impl Default for ProfileStyle {
    fn default() -> Self {
        ProfileStyle {
            full: ':',
            lower_half: '.',
            upper_half: '\'',
            zero: '_',
            blank: ' ',
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextProfile<'a> {
    scores: &'a ScreenScores,
    rows: usize,
    ymin: f32,
    ymax: f32,
}

impl<'a> TextProfile<'a> {
    ///
    /// `ymin`/`ymax` set to NaN are taken from the data, always including 0.
    ///
    pub fn new(scores: &'a ScreenScores, rows: usize, ymin: f32, ymax: f32) -> Self {
        TextProfile {
            scores,
            rows,
            ymin,
            ymax,
        }
    }

    ///
    /// Limits of the y axis after autoscaling. Never empty: a fixed top at or
    /// below the autoscaled bottom pulls the bottom one unit under it,
    /// otherwise the top is moved one unit above the bottom.
    ///
    pub fn y_range(&self) -> (f64, f64) {
        let (data_min, data_max) = self
            .scores
            .range()
            .map(|(lo, hi)| (lo as f64, hi as f64))
            .unwrap_or((0.0, 0.0));

        let ymin = if self.ymin.is_nan() {
            data_min.min(0.0)
        } else {
            self.ymin as f64
        };
        let ymax = if self.ymax.is_nan() {
            data_max.max(0.0)
        } else {
            self.ymax as f64
        };

        if ymax > ymin {
            return (ymin, ymax);
        }

        if self.ymin.is_nan() && !self.ymax.is_nan() {
            debug!("ymax {} is not above the data, lowering ymin to {}", ymax, ymax - 1.0);
            (ymax - 1.0, ymax)
        } else {
            if !self.ymax.is_nan() {
                debug!("ymax {} is not above ymin {}, using {}", ymax, ymin, ymin + 1.0);
            }
            (ymin, ymin + 1.0)
        }
    }

    ///
    /// Draw the profile, top row first, rows joined by `\n`. Each row has one
    /// character per score. Nothing is drawn for zero rows.
    ///
    pub fn render(&self, style: &ProfileStyle) -> String {
        if self.rows == 0 || self.scores.is_empty() {
            return String::new();
        }

        let (ymin, ymax) = self.y_range();
        let steps = self.rows * 2;
        let step = (ymax - ymin) / steps as f64;
        let to_step = |y: f64| -> usize {
            let y = y.max(ymin).min(ymax);
            (((y - ymin) / step).round() as usize).min(steps)
        };
        let zero = to_step(0.0);

        let mut grid = vec![vec![style.blank; self.scores.len()]; self.rows];
        for (col, &score) in self.scores.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            let value = to_step(score as f64);
            let (lo, hi) = (zero.min(value), zero.max(value));
            if lo == hi {
                grid[(zero / 2).min(self.rows - 1)][col] = style.zero;
                continue;
            }

            for (row, line) in grid.iter_mut().enumerate() {
                let lower = lo <= 2 * row && 2 * row < hi;
                let upper = lo <= 2 * row + 1 && 2 * row + 1 < hi;
                line[col] = match (lower, upper) {
                    (true, true) => style.full,
                    (true, false) => style.lower_half,
                    (false, true) => style.upper_half,
                    (false, false) => continue,
                };
            }
        }

        grid.iter()
            .rev()
            .map(|line| line.iter().collect::<String>())
            .collect::<Vec<String>>()
            .join("\n")
    }
}

///
/// `<name>; ylim[<min> <max>]; range[<min> <max>]`, limits left to autoscale
/// shown as `auto`.
///
pub fn profile_title(name: &str, ymin: f32, ymax: f32, scores: &ScreenScores) -> String {
    let limit = |y: f32| {
        if y.is_nan() {
            "auto".to_string()
        } else {
            round_to_significant(y as f64, 2)
        }
    };
    let (lo, hi) = scores
        .range()
        .map(|(lo, hi)| (round_to_significant(lo as f64, 2), round_to_significant(hi as f64, 2)))
        .unwrap_or_else(|| ("NaN".to_string(), "NaN".to_string()));

    format!(
        "{}; ylim[{} {}]; range[{} {}]",
        name,
        limit(ymin),
        limit(ymax),
        lo,
        hi
    )
}
