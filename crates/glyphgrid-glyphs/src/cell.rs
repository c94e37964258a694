//! Cell crops to fixed-size normalized samples.
//!
//! Every sample, live or synthetic, goes through [`normalize_region`]: find
//! the ink bounding box at the mid-range threshold, pad it, resample to
//! 32x32 and stretch the contrast.

use glyphgrid_core::{
    sample_bilinear_clamped, CellBox, GrayImageView, ImageFrame, NormalizedSample, PixelRect,
    SAMPLE_PIXELS, SAMPLE_SIZE,
};
use serde::{Deserialize, Serialize};

/// Cell Processor settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellParams {
    /// Pixels added around each cell box before cropping.
    pub margin_px: usize,
    /// Padding around the ink bounding box, relative to its own size.
    pub ink_expand_frac: f32,
    /// Minimum `max - min` range for a region to count as having ink.
    pub stretch_floor: u8,
}

impl Default for CellParams {
    fn default() -> Self {
        Self {
            margin_px: 2,
            ink_expand_frac: 0.1,
            stretch_floor: 10,
        }
    }
}

/// Tight box of pixels brighter than the mid-range of `rect`.
fn ink_bounds(src: &GrayImageView<'_>, rect: PixelRect, floor: u8) -> Option<PixelRect> {
    let (lo, hi) = src.min_max(rect);
    if hi - lo <= floor {
        return None;
    }
    let thr = (lo as f32 + hi as f32) * 0.5;
    let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0, 0);
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            if src.get(x, y) as f32 > thr {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
            }
        }
    }
    (x0 <= x1).then(|| PixelRect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Area-averaged resample of the float rect `(rx, ry, rw, rh)` to 32x32.
fn resample(src: &GrayImageView<'_>, rx: f32, ry: f32, rw: f32, rh: f32) -> [u8; SAMPLE_PIXELS] {
    let n = SAMPLE_SIZE as f32;
    let sx = rw / n;
    let sy = rh / n;
    let kx = (sx.ceil() as usize).clamp(1, 4);
    let ky = (sy.ceil() as usize).clamp(1, 4);
    let norm = (kx * ky) as f32;

    let mut out = [0u8; SAMPLE_PIXELS];
    for j in 0..SAMPLE_SIZE {
        for i in 0..SAMPLE_SIZE {
            let mut acc = 0.0f32;
            for b in 0..ky {
                let py = ry + (j as f32 + (b as f32 + 0.5) / ky as f32) * sy;
                for a in 0..kx {
                    let px = rx + (i as f32 + (a as f32 + 0.5) / kx as f32) * sx;
                    acc += sample_bilinear_clamped(src, px, py);
                }
            }
            out[j * SAMPLE_SIZE + i] = (acc / norm).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

fn stretch(pixels: &mut [u8; SAMPLE_PIXELS], floor: u8) {
    let (lo, hi) = pixels
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi - lo <= floor {
        return;
    }
    let scale = 255.0 / (hi - lo) as f32;
    for v in pixels.iter_mut() {
        *v = ((*v - lo) as f32 * scale).round() as u8;
    }
}

/// Normalize `rect` of `src` into a 32x32 sample.
///
/// The ink box is searched inside `rect`, but resampling may read outside it
/// (clamped to the image border).
pub fn normalize_region(
    src: &GrayImageView<'_>,
    rect: PixelRect,
    params: &CellParams,
) -> NormalizedSample {
    let rect = rect.clamp_to(src.width, src.height);
    if rect.is_empty() {
        return NormalizedSample::blank();
    }
    let bounds = ink_bounds(src, rect, params.stretch_floor).unwrap_or(rect);
    let (bw, bh) = (bounds.width as f32, bounds.height as f32);
    let mx = params.ink_expand_frac * bw;
    let my = params.ink_expand_frac * bh;
    let mut pixels = resample(
        src,
        bounds.x as f32 - mx,
        bounds.y as f32 - my,
        bw + 2.0 * mx,
        bh + 2.0 * my,
    );
    stretch(&mut pixels, params.stretch_floor);
    NormalizedSample::from_pixels(pixels)
}

/// Normalize a cell from a full-frame grayscale image.
///
/// Returns `None` when the box clipped to the frame is smaller than 3x3.
pub fn extract_cell_gray(
    gray: &GrayImageView<'_>,
    cell: &CellBox,
    params: &CellParams,
) -> Option<NormalizedSample> {
    let rect = cell.pixel_rect(params.margin_px, gray.width, gray.height)?;
    Some(normalize_region(gray, rect, params))
}

/// Normalize a cell directly from an RGBA frame.
///
/// Only a padded neighbourhood of the box is converted to grayscale.
pub fn extract_cell(
    frame: &ImageFrame,
    cell: &CellBox,
    params: &CellParams,
) -> Option<NormalizedSample> {
    let (width, height) = (frame.width(), frame.height());
    let rect = cell.pixel_rect(params.margin_px, width, height)?;
    let pad_x = (rect.width as f32 * params.ink_expand_frac).ceil() as usize + 2;
    let pad_y = (rect.height as f32 * params.ink_expand_frac).ceil() as usize + 2;
    let x0 = rect.x.saturating_sub(pad_x);
    let y0 = rect.y.saturating_sub(pad_y);
    let padded = PixelRect::new(
        x0,
        y0,
        rect.right() + pad_x - x0,
        rect.bottom() + pad_y - y0,
    );
    let gray = frame.gray_region(padded);
    let local = PixelRect::new(rect.x - x0, rect.y - y0, rect.width, rect.height);
    Some(normalize_region(&gray.view(), local, params))
}

/// Split a two-glyph cell sample at the darkest column near the middle and
/// normalize each half on its own.
pub fn split_halves(
    sample: &NormalizedSample,
    params: &CellParams,
) -> (NormalizedSample, NormalizedSample) {
    let view = sample.view();
    let mid = SAMPLE_SIZE / 2;
    let column_sum = |x: usize| -> u32 { (0..SAMPLE_SIZE).map(|y| sample.get(x, y) as u32).sum() };

    let mut best = mid;
    let mut best_key = (u32::MAX, usize::MAX);
    for x in SAMPLE_SIZE * 5 / 16..SAMPLE_SIZE * 11 / 16 {
        let key = (column_sum(x), x.abs_diff(mid));
        if key < best_key {
            best_key = key;
            best = x;
        }
    }

    let left = normalize_region(&view, PixelRect::new(0, 0, best, SAMPLE_SIZE), params);
    let right = normalize_region(
        &view,
        PixelRect::new(best, 0, SAMPLE_SIZE - best, SAMPLE_SIZE),
        params,
    );
    (left, right)
}
