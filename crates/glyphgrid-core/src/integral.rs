//! Summed-area table for constant-time box means.

use crate::image::GrayImageView;

#[derive(Clone, Debug)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    // (width + 1) x (height + 1), first row and column are zero
    sums: Vec<u64>,
}

impl IntegralImage {
    pub fn new(src: &GrayImageView<'_>) -> Self {
        let stride = src.width + 1;
        let mut sums = vec![0u64; stride * (src.height + 1)];
        for y in 0..src.height {
            let mut row = 0u64;
            for (x, &v) in src.row(y).iter().enumerate() {
                row += v as u64;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self {
            width: src.width,
            height: src.height,
            sums,
        }
    }

    /// Sum over the inclusive box `[x0, x1] x [y0, y1]`.
    #[inline]
    pub fn box_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let stride = self.width + 1;
        let a = self.sums[y0 * stride + x0];
        let b = self.sums[y0 * stride + x1 + 1];
        let c = self.sums[(y1 + 1) * stride + x0];
        let d = self.sums[(y1 + 1) * stride + x1 + 1];
        d + a - b - c
    }

    /// Mean of the `(2 * radius + 1)` square around `(x, y)`, shrunk at borders.
    #[inline]
    pub fn window_mean(&self, x: usize, y: usize, radius: usize) -> f32 {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius).min(self.width - 1);
        let y1 = (y + radius).min(self.height - 1);
        let n = (x1 - x0 + 1) * (y1 - y0 + 1);
        self.box_sum(x0, y0, x1, y1) as f32 / n as f32
    }

    pub fn total(&self) -> u64 {
        self.sums[self.sums.len() - 1]
    }
}
