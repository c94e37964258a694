//! Horizontal grid extent and per-slot column centers.

use crate::params::ColumnParams;
use crate::projection::{column_variance, moving_average, Profile, Projector};

/// Ink columns `x0..=x1` of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Extent {
    pub x0: usize,
    pub x1: usize,
}

impl Extent {
    #[inline]
    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    #[inline]
    pub fn center(&self) -> f32 {
        (self.x0 + self.x1) as f32 * 0.5
    }
}

/// Widest run of entries strictly above `threshold`; the first one wins ties.
pub(crate) fn widest_run_above(values: &[f32], threshold: f32) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut start: Option<usize> = None;
    for x in 0..=values.len() {
        let above = x < values.len() && values[x] > threshold;
        match (above, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                if best.is_none_or(|(a, b)| x - s > b - a + 1) {
                    best = Some((s, x - 1));
                }
                start = None;
            }
            _ => {}
        }
    }
    best
}

/// First and last ink column of `profile` within `lo..=hi`.
pub(crate) fn ink_extent(profile: &Profile, lo: usize, hi: usize) -> Option<Extent> {
    let hi = hi.min(profile.values.len().checked_sub(1)?);
    if lo > hi {
        return None;
    }
    let x0 = (lo..=hi).find(|&x| profile.is_ink(x))?;
    let x1 = (lo..=hi).rev().find(|&x| profile.is_ink(x))?;
    Some(Extent { x0, x1 })
}

/// Locate the grid columns within rows `y0..=y1`.
///
/// The column variance is smoothed over about one and a half row spacings so
/// that the gaps between cells fill in; the widest region above a fraction
/// of the peak is then trimmed to its outermost ink columns.
pub(crate) fn grid_extent(
    projector: &Projector<'_>,
    y0: usize,
    y1: usize,
    spacing: f32,
    params: &ColumnParams,
) -> Option<(Extent, Profile)> {
    let variance = column_variance(projector.gray(), y0, y1);
    let window = ((params.smooth_rel * spacing).round() as usize).max(3) | 1;
    let smoothed = moving_average(&variance, window);
    let peak = smoothed.iter().copied().fold(0.0f32, f32::max);
    if peak <= 0.0 {
        return None;
    }
    let (a, b) = widest_run_above(&smoothed, peak * params.peak_frac)?;
    let density = projector.columns(y0, y1);
    let extent = ink_extent(&density, a, b)?;
    Some((extent, density))
}

/// Center of each of `n` equal slots starting at `x0`.
///
/// With `refine` set, a center moves to the midpoint of the ink columns
/// inside its slot; empty slots keep the geometric center.
pub(crate) fn slot_centers(
    profile: &Profile,
    x0: f32,
    pitch: f32,
    n: usize,
    refine: bool,
) -> Vec<f32> {
    let last = profile.values.len().saturating_sub(1);
    (0..n)
        .map(|i| {
            let center = x0 + (i as f32 + 0.5) * pitch;
            if !refine {
                return center;
            }
            let a = (x0 + i as f32 * pitch).floor().max(0.0) as usize;
            let b = ((x0 + (i + 1) as f32 * pitch).ceil() as usize)
                .saturating_sub(1)
                .min(last);
            ink_extent(profile, a, b).map_or(center, |e| e.center())
        })
        .collect()
}
