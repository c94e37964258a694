//! Alignment directly over normalized samples.
//!
//! Each target/grid pair is scored with an ensemble distance:
//!
//! ```text
//! d = full_weight   * (1 - ncc(full 32x32))
//!   + coarse_weight * (1 - ncc(2x2-averaged 16x16))
//!   + hamming_weight * hamming(binarized)
//! ```
//!
//! The coarse term tolerates a pixel or two of misregistration; the Hamming
//! term breaks ties between samples with similar correlation.

use glyphgrid_core::{BinarySample, NormalizedSample, SAMPLE_PIXELS, SAMPLE_SIZE};
use serde::{Deserialize, Serialize};

use crate::result::{Candidate, MatchResult};

const COARSE_SIZE: usize = SAMPLE_SIZE / 2;
const COARSE_PIXELS: usize = COARSE_SIZE * COARSE_SIZE;

/// Ensemble weights for pixel alignment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelMatchParams {
    pub full_weight: f32,
    pub coarse_weight: f32,
    pub hamming_weight: f32,
    /// Number of best positions kept (the result plus its alternatives).
    pub top_k: usize,
}

impl Default for PixelMatchParams {
    fn default() -> Self {
        Self {
            full_weight: 0.5,
            coarse_weight: 0.5,
            hamming_weight: 0.5,
            top_k: 3,
        }
    }
}

/// Zero-mean, unit-norm copy of a signal; `None` when the signal is flat.
fn unit_centered(values: &[f32]) -> Option<Box<[f32]>> {
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let centered: Box<[f32]> = values.iter().map(|v| v - mean).collect();
    let norm = centered.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm <= 1e-6 {
        return None;
    }
    Some(centered.iter().map(|v| v / norm).collect())
}

/// Normalized cross-correlation of two prepared signals.
///
/// Two flat signals correlate perfectly; a flat and a textured one not at all.
fn ncc(a: Option<&[f32]>, b: Option<&[f32]>) -> f32 {
    match (a, b) {
        (None, None) => 1.0,
        (Some(a), Some(b)) => a.iter().zip(b).map(|(x, y)| x * y).sum(),
        _ => 0.0,
    }
}

/// Per-sample data reused across every comparison.
#[derive(Clone, Debug)]
pub struct SampleFeatures {
    full: Option<Box<[f32]>>,
    coarse: Option<Box<[f32]>>,
    binary: BinarySample,
}

impl SampleFeatures {
    pub fn new(sample: &NormalizedSample) -> Self {
        let full: Vec<f32> = sample.pixels().iter().map(|&v| v as f32).collect();
        let mut coarse = vec![0.0f32; COARSE_PIXELS];
        for y in 0..COARSE_SIZE {
            for x in 0..COARSE_SIZE {
                let (sx, sy) = (2 * x, 2 * y);
                let sum = sample.get(sx, sy) as f32
                    + sample.get(sx + 1, sy) as f32
                    + sample.get(sx, sy + 1) as f32
                    + sample.get(sx + 1, sy + 1) as f32;
                coarse[y * COARSE_SIZE + x] = sum * 0.25;
            }
        }
        debug_assert_eq!(full.len(), SAMPLE_PIXELS);
        Self {
            full: unit_centered(&full),
            coarse: unit_centered(&coarse),
            binary: sample.binarize(),
        }
    }

    /// Ensemble distance to `other`; `0` for identical samples.
    pub fn distance(&self, other: &SampleFeatures, params: &PixelMatchParams) -> f32 {
        let full = 1.0 - ncc(self.full.as_deref(), other.full.as_deref());
        let coarse = 1.0 - ncc(self.coarse.as_deref(), other.coarse.as_deref());
        let hamming = self.binary.hamming_fraction(&other.binary);
        params.full_weight * full + params.coarse_weight * coarse + params.hamming_weight * hamming
    }
}

/// Ensemble distance between two samples.
pub fn sample_distance(
    a: &NormalizedSample,
    b: &NormalizedSample,
    params: &PixelMatchParams,
) -> f32 {
    SampleFeatures::new(a).distance(&SampleFeatures::new(b), params)
}

/// Locate `target` inside `grid` (with wraparound) by pixel similarity.
///
/// Every start position is scored as the sum of per-offset ensemble
/// distances. Confidence is `(second - best) / second`, or 0 when the two
/// best scores are equal. Returns `None` when `target` is empty or longer
/// than `grid`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip_all,
        fields(target = target.len(), grid = grid.len())
    )
)]
pub fn find_match(
    target: &[NormalizedSample],
    grid: &[NormalizedSample],
    params: &PixelMatchParams,
) -> Option<MatchResult> {
    if target.is_empty() || grid.len() < target.len() {
        return None;
    }
    let target: Vec<SampleFeatures> = target.iter().map(SampleFeatures::new).collect();
    let grid: Vec<SampleFeatures> = grid.iter().map(SampleFeatures::new).collect();
    find_match_features(&target, &grid, params)
}

/// [`find_match`] over precomputed features.
pub fn find_match_features(
    target: &[SampleFeatures],
    grid: &[SampleFeatures],
    params: &PixelMatchParams,
) -> Option<MatchResult> {
    let n = grid.len();
    if target.is_empty() || n < target.len() {
        return None;
    }

    // distance of every (target offset, grid cell) pair, computed once
    let pair: Vec<Vec<f32>> = target
        .iter()
        .map(|t| grid.iter().map(|g| t.distance(g, params)).collect())
        .collect();

    let mut ranked: Vec<Candidate> = (0..n)
        .map(|position| Candidate {
            position,
            score: pair
                .iter()
                .enumerate()
                .map(|(t, row)| row[(position + t) % n])
                .sum(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then(a.position.cmp(&b.position))
    });
    ranked.truncate(params.top_k.max(1));

    let best = ranked[0];
    let confidence = match ranked.get(1) {
        None => 1.0,
        Some(second) if second.score == best.score => 0.0,
        Some(second) => ((second.score - best.score) / second.score).min(1.0),
    };
    log::debug!(
        "pixel match at {}: score {:.3}, confidence {:.3}",
        best.position,
        best.score,
        confidence
    );
    let mut result = MatchResult::new(best.position, n, best.score, confidence);
    result.alternatives = ranked[1..].to_vec();
    Some(result)
}
