//! Global (Otsu) and local (box-mean) thresholding.

use serde::{Deserialize, Serialize};

use crate::image::{BinaryImage, GrayImageView};
use crate::integral::IntegralImage;

/// Local-mean threshold settings.
///
/// A pixel is ink when `v > local_mean - bias` and `v >= floor_ratio * global_mean`,
/// where `v` is the pixel averaged over a small `smooth_radius` box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveThresholdParams {
    /// Side of the square averaging window, in pixels.
    pub block_size: usize,
    /// Subtracted from the local mean. Negative values demand ink to stand
    /// out above its neighbourhood.
    pub bias: f32,
    /// Pixels darker than `floor_ratio * global_mean` are never ink.
    pub floor_ratio: f32,
    /// Radius of the box that averages each pixel before the comparison.
    /// Zero compares raw pixels. Isolated sensor noise cannot cross the
    /// threshold once it is averaged with its neighbours.
    pub smooth_radius: usize,
}

impl Default for AdaptiveThresholdParams {
    fn default() -> Self {
        Self {
            block_size: 25,
            bias: -20.0,
            floor_ratio: 1.0,
            smooth_radius: 2,
        }
    }
}

#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(w = src.width, h = src.height))
)]
pub fn adaptive_threshold(
    src: &GrayImageView<'_>,
    params: &AdaptiveThresholdParams,
) -> BinaryImage {
    let mut out = BinaryImage::new(src.width, src.height);
    if src.data.is_empty() {
        return out;
    }
    let ii = IntegralImage::new(src);
    let mean = ii.total() as f32 / (src.width * src.height) as f32;
    let floor = mean * params.floor_ratio;
    let radius = params.block_size / 2;

    for y in 0..src.height {
        for (x, &v) in src.row(y).iter().enumerate() {
            let local = ii.window_mean(x, y, radius);
            let v = match params.smooth_radius {
                0 => v as f32,
                r => ii.window_mean(x, y, r),
            };
            if v > local - params.bias && v >= floor {
                out.set(x, y, true);
            }
        }
    }
    out
}

/// Compute Otsu threshold from a set of sample intensities.
///
/// Values strictly above the returned threshold are foreground.
pub fn otsu_threshold(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }

    let mut min_v = 255u8;
    let mut max_v = 0u8;
    for &v in samples {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v == max_v {
        return min_v;
    }

    let mut hist = [0u32; 256];
    for &v in samples {
        hist[v as usize] += 1;
    }
    let nonzero_bins = hist.iter().filter(|&&h| h > 0).count();
    if nonzero_bins <= 2 {
        return ((min_v as u16 + max_v as u16) / 2) as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}
