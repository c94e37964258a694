//! Row and column projections of a frame.
//!
//! Two strategies produce the same kind of [`Profile`]: the primary one
//! projects an adaptive-threshold mask, the fallback projects detrended raw
//! brightness and needs no threshold at all.

use glyphgrid_core::{adaptive_threshold, BinaryImage, GrayImageView};
use serde::{Deserialize, Serialize};

use crate::params::DetectorParams;

/// Which signal drives band and column detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Ink fraction of an adaptive-threshold mask.
    Adaptive,
    /// Row brightness minus its moving average.
    Detrended,
}

/// A 1-D projection and the level above which an entry counts as ink.
#[derive(Clone, Debug)]
pub(crate) struct Profile {
    pub values: Vec<f32>,
    pub threshold: f32,
}

impl Profile {
    #[inline]
    pub fn is_ink(&self, i: usize) -> bool {
        self.values[i] > self.threshold
    }
}

/// Centered moving average; the window shrinks at both ends.
pub(crate) fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    let n = values.len();
    let r = window / 2;
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    for &v in values {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v as f64);
    }
    (0..n)
        .map(|i| {
            let a = i.saturating_sub(r);
            let b = (i + r + 1).min(n);
            ((prefix[b] - prefix[a]) / (b - a) as f64) as f32
        })
        .collect()
}

/// Per-column intensity variance over rows `y0..=y1`.
pub(crate) fn column_variance(gray: &GrayImageView<'_>, y0: usize, y1: usize) -> Vec<f32> {
    let h = (y1 - y0 + 1) as f64;
    let mut sum = vec![0f64; gray.width];
    let mut sum_sq = vec![0f64; gray.width];
    for y in y0..=y1 {
        for (x, &v) in gray.row(y).iter().enumerate() {
            let v = v as f64;
            sum[x] += v;
            sum_sq[x] += v * v;
        }
    }
    sum.iter()
        .zip(sum_sq.iter())
        .map(|(&s, &sq)| {
            let mean = s / h;
            (sq / h - mean * mean).max(0.0) as f32
        })
        .collect()
}

pub(crate) struct Projector<'a> {
    gray: GrayImageView<'a>,
    mask: Option<BinaryImage>,
    params: &'a DetectorParams,
}

impl<'a> Projector<'a> {
    pub fn new(gray: GrayImageView<'a>, strategy: Strategy, params: &'a DetectorParams) -> Self {
        let mask = match strategy {
            Strategy::Adaptive => Some(adaptive_threshold(&gray, &params.threshold)),
            Strategy::Detrended => None,
        };
        Self { gray, mask, params }
    }

    pub fn gray(&self) -> &GrayImageView<'a> {
        &self.gray
    }

    pub fn rows(&self) -> Profile {
        match &self.mask {
            Some(mask) => {
                let w = mask.width as f32;
                Profile {
                    values: (0..mask.height).map(|y| mask.row_count(y) as f32 / w).collect(),
                    threshold: self.params.bands.min_density,
                }
            }
            None => self.detrended_rows(),
        }
    }

    fn detrended_rows(&self) -> Profile {
        let g = &self.gray;
        let means: Vec<f32> = (0..g.height)
            .map(|y| g.row(y).iter().map(|&v| v as f32).sum::<f32>() / g.width as f32)
            .collect();
        let p = &self.params.detrend;
        let window = ((g.height as f32 * p.window_frac) as usize).max(9) | 1;
        let trend = moving_average(&means, window);
        let residual: Vec<f32> = means.iter().zip(&trend).map(|(m, t)| m - t).collect();

        let peak = residual.iter().copied().fold(f32::MIN, f32::max);
        if residual.is_empty() || peak <= 0.0 {
            return Profile {
                values: vec![0.0; residual.len()],
                threshold: 1.0,
            };
        }
        let rms = (residual.iter().map(|r| r * r).sum::<f32>() / residual.len() as f32).sqrt();
        Profile {
            values: residual.iter().map(|r| r / peak).collect(),
            threshold: p.rms_factor * rms / peak,
        }
    }

    /// Column profile over rows `y0..=y1` across the full width.
    pub fn columns(&self, y0: usize, y1: usize) -> Profile {
        match &self.mask {
            Some(mask) => {
                let h = (y1 - y0 + 1) as f32;
                Profile {
                    values: (0..mask.width)
                        .map(|x| mask.column_count(x, y0, y1) as f32 / h)
                        .collect(),
                    threshold: self.params.columns.min_density,
                }
            }
            None => {
                let var = column_variance(&self.gray, y0, y1);
                let peak = var.iter().copied().fold(0.0f32, f32::max);
                let peak = if peak > 0.0 { peak } else { 1.0 };
                Profile {
                    values: var.iter().map(|v| v / peak).collect(),
                    threshold: self.params.detrend.column_threshold,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glyphgrid_core::GrayImage;

    #[test]
    fn moving_average_shrinks_at_edges() {
        let avg = moving_average(&[3.0, 0.0, 0.0, 6.0], 3);
        assert_relative_eq!(avg[0], 1.5);
        assert_relative_eq!(avg[1], 1.0);
        assert_relative_eq!(avg[2], 2.0);
        assert_relative_eq!(avg[3], 3.0);
    }

    #[test]
    fn variance_of_constant_and_alternating_columns() {
        let img = GrayImage::from_raw(2, 4, vec![5, 0, 5, 100, 5, 0, 5, 100]).unwrap();
        let var = column_variance(&img.view(), 0, 3);
        assert_relative_eq!(var[0], 0.0);
        assert_relative_eq!(var[1], 2500.0);
    }

    fn striped(height: usize) -> GrayImage {
        // bright 4-row stripes every 12 rows, dotted so the mask is not a solid bar
        let mut img = GrayImage::filled(60, height, 20);
        for y in 0..height {
            if y % 12 < 4 {
                for x in (10..50).step_by(2) {
                    img.set(x, y, 220);
                }
            }
        }
        img
    }

    #[test]
    fn both_strategies_see_the_stripes() {
        let img = striped(96);
        let params = DetectorParams::default();
        for strategy in [Strategy::Adaptive, Strategy::Detrended] {
            let proj = Projector::new(img.view(), strategy, &params);
            let rows = proj.rows();
            assert!(rows.is_ink(25), "{strategy:?}");
            assert!(!rows.is_ink(30), "{strategy:?}");
            let cols = proj.columns(0, 95);
            assert!(cols.is_ink(10), "{strategy:?}");
            assert!(!cols.is_ink(3), "{strategy:?}");
        }
    }

    #[test]
    fn flat_frame_has_no_detrended_ink() {
        let img = GrayImage::filled(30, 40, 90);
        let params = DetectorParams::default();
        let rows = Projector::new(img.view(), Strategy::Detrended, &params).rows();
        assert!((0..40).all(|y| !rows.is_ink(y)));
    }
}
