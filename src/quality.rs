//! Match-quality statistics for a finished feature.
//!
//! The standard deviation combines the biased second moment with a
//! Bessel-corrected denominator:
//! `sqrt((Σd²/n − mean²) / (n − 1))`. Distances are converted to meters with
//! the isotropic cell size, not the per-axis sizes used by the transform.
//!
//! Unlike the bare formula, the variance is clamped at zero before the square
//! root, so floating-point cancellation on near-constant distances gives a
//! standard deviation of 0 instead of NaN.

use crate::follow::MatchedFeature;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuality {
    pub matched_count: usize,
    pub reference_count: usize,
    /// `matched_count * 100 / reference_count`.
    pub match_percent: f64,
    pub mean_px: f64,
    pub stdev_px: f64,
    pub mean_m: f64,
    pub stdev_m: f64,
}

/// Mean and standard deviation of `distances`; `None` for fewer than two samples.
pub fn distance_stats(distances: &[f64]) -> Option<(f64, f64)> {
    let n = distances.len();
    if n <= 1 {
        return None;
    }
    let count = n as f64;
    let (sum, sum_sq) = distances
        .iter()
        .fold((0.0, 0.0), |(s, sq), &d| (s + d, sq + d * d));
    let mean = sum / count;
    // Rounding can push the variance a hair below zero for constant samples.
    let variance = ((sum_sq / count - mean * mean) / (count - 1.0)).max(0.0);
    Some((mean, variance.sqrt()))
}

/// Score a matched feature; `None` when fewer than two points were matched.
pub fn score(feature: &MatchedFeature, cell_size: f64) -> Option<MatchQuality> {
    let distances: Vec<f64> = feature
        .points
        .iter()
        .map(|p| p.match_distance.unwrap_or(0.0))
        .collect();
    let (mean_px, stdev_px) = distance_stats(&distances)?;
    let matched_count = feature.matched_count();
    let reference_count = feature.reference_count;
    Some(MatchQuality {
        matched_count,
        reference_count,
        match_percent: matched_count as f64 * 100.0 / reference_count as f64,
        mean_px,
        stdev_px,
        mean_m: mean_px * cell_size,
        stdev_m: stdev_px * cell_size,
    })
}
