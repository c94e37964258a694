//! Pixel buffers: RGBA frames, grayscale images and binary masks.

use crate::error::ImageError;

/// Integer pixel rectangle, `x..x + width` by `y..y + height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with a `width` x `height` image.
    pub fn clamp_to(&self, width: usize, height: usize) -> Self {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = self.right().min(width);
        let y1 = self.bottom().min(height);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// Luma of one RGB pixel, `0.299 R + 0.587 G + 0.114 B` rounded.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Captured camera frame, row-major RGBA.
#[derive(Clone, Debug)]
pub struct ImageFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ImageFrame {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .filter(|&n| n > 0)
            .ok_or(ImageError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Opaque frame with every channel set from a grayscale image.
    pub fn from_gray(gray: &GrayImage) -> Self {
        let mut data = Vec::with_capacity(gray.data.len() * 4);
        for &v in &gray.data {
            data.extend_from_slice(&[v, v, v, 255]);
        }
        Self {
            width: gray.width,
            height: gray.height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn to_gray(&self) -> GrayImage {
        self.gray_region(PixelRect::full(self.width, self.height))
    }

    /// Grayscale copy of `rect`, clipped to the frame.
    pub fn gray_region(&self, rect: PixelRect) -> GrayImage {
        let rect = rect.clamp_to(self.width, self.height);
        let mut out = Vec::with_capacity(rect.width * rect.height);
        for y in rect.y..rect.bottom() {
            let start = (y * self.width + rect.x) * 4;
            let row = &self.data[start..start + rect.width * 4];
            out.extend(row.chunks_exact(4).map(|p| luma(p[0], p[1], p[2])));
        }
        GrayImage {
            width: rect.width,
            height: rect.height,
            data: out,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> GrayImageView<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Pixel with coordinates clamped to the image border.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> u8 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Darkest and brightest value inside `rect`.
    pub fn min_max(&self, rect: PixelRect) -> (u8, u8) {
        let mut lo = u8::MAX;
        let mut hi = u8::MIN;
        for y in rect.y..rect.bottom() {
            for &v in &self.row(y)[rect.x..rect.right()] {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        (lo, hi)
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        sum as f32 / self.data.len() as f32
    }

    pub fn to_owned(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        if data.len() != width * height {
            return Err(ImageError::InvalidBuffer {
                expected: width * height,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    /// Copy of `rect`, clipped to the image.
    pub fn crop(&self, rect: PixelRect) -> GrayImage {
        let rect = rect.clamp_to(self.width, self.height);
        let mut data = Vec::with_capacity(rect.width * rect.height);
        for y in rect.y..rect.bottom() {
            let start = y * self.width;
            data.extend_from_slice(&self.data[start + rect.x..start + rect.right()]);
        }
        GrayImage {
            width: rect.width,
            height: rect.height,
            data,
        }
    }
}

/// Thresholded mask; every byte is exactly 0 or 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl BinaryImage {
    pub const ON: u8 = 255;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.width + x] = if on { Self::ON } else { 0 };
    }

    /// Set pixels in row `y`.
    pub fn row_count(&self, y: usize) -> usize {
        self.data[y * self.width..(y + 1) * self.width]
            .iter()
            .filter(|&&v| v != 0)
            .count()
    }

    /// Set pixels in column `x` over rows `y0..=y1`.
    pub fn column_count(&self, x: usize, y0: usize, y1: usize) -> usize {
        (y0..=y1).filter(|&y| self.is_set(x, y)).count()
    }
}

/// Bilinear sample with pixel centers at `i + 0.5`; reads past the border
/// repeat the edge pixel.
#[inline]
pub fn sample_bilinear_clamped(src: &GrayImageView<'_>, x: f32, y: f32) -> f32 {
    let x = x - 0.5;
    let y = y - 0.5;
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get_clamped(x0, y0) as f32;
    let p10 = src.get_clamped(x0 + 1, y0) as f32;
    let p01 = src.get_clamped(x0, y0 + 1) as f32;
    let p11 = src.get_clamped(x0 + 1, y0 + 1) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}
