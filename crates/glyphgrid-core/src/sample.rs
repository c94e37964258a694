//! Fixed-size normalized glyph samples and their bit-packed binary form.

use crate::image::GrayImageView;
use crate::threshold::otsu_threshold;

/// Side length of every normalized sample.
pub const SAMPLE_SIZE: usize = 32;
pub const SAMPLE_PIXELS: usize = SAMPLE_SIZE * SAMPLE_SIZE;

const WORDS: usize = SAMPLE_PIXELS / 64;

/// 32x32 grayscale sample, cropped to ink and contrast-stretched.
#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedSample {
    pixels: [u8; SAMPLE_PIXELS],
}

impl NormalizedSample {
    pub fn from_pixels(pixels: [u8; SAMPLE_PIXELS]) -> Self {
        Self { pixels }
    }

    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut pixels = [0u8; SAMPLE_PIXELS];
        for (i, p) in pixels.iter_mut().enumerate() {
            *p = f(i % SAMPLE_SIZE, i / SAMPLE_SIZE);
        }
        Self { pixels }
    }

    pub fn blank() -> Self {
        Self {
            pixels: [0; SAMPLE_PIXELS],
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[u8; SAMPLE_PIXELS] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * SAMPLE_SIZE + x]
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: SAMPLE_SIZE,
            height: SAMPLE_SIZE,
            data: &self.pixels,
        }
    }

    /// `max - min` over the sample.
    pub fn dynamic_range(&self) -> u8 {
        let (lo, hi) = self
            .pixels
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        hi - lo
    }

    /// Otsu-binarized copy.
    pub fn binarize(&self) -> BinarySample {
        let t = otsu_threshold(&self.pixels);
        let mut bits = [0u64; WORDS];
        for (i, &v) in self.pixels.iter().enumerate() {
            if v > t {
                bits[i / 64] |= 1u64 << (i % 64);
            }
        }
        BinarySample { bits }
    }
}

impl std::fmt::Debug for NormalizedSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedSample")
            .field("dynamic_range", &self.dynamic_range())
            .finish_non_exhaustive()
    }
}

/// 1024-bit foreground mask of a [`NormalizedSample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BinarySample {
    bits: [u64; WORDS],
}

impl BinarySample {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        let i = y * SAMPLE_SIZE + x;
        (self.bits[i / 64] >> (i % 64)) & 1 == 1
    }

    pub fn ink_count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Number of differing pixels.
    #[inline]
    pub fn hamming(&self, other: &BinarySample) -> u32 {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    /// Fraction of differing pixels, in `[0, 1]`.
    #[inline]
    pub fn hamming_fraction(&self, other: &BinarySample) -> f32 {
        self.hamming(other) as f32 / SAMPLE_PIXELS as f32
    }
}
