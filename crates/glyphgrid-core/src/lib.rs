//! Core types shared by the glyph grid pipeline.
//!
//! Pixel buffers (RGBA frames, grayscale, binary masks), thresholding,
//! the 32x32 normalized sample type and the detected grid layout. Nothing
//! here knows about alphabets or matching.

mod error;
mod image;
mod integral;
mod layout;
mod logger;
mod sample;
mod threshold;

pub use error::ImageError;
pub use image::{
    luma, sample_bilinear_clamped, BinaryImage, GrayImage, GrayImageView, ImageFrame, PixelRect,
};
pub use integral::IntegralImage;
pub use layout::{
    CellBox, GridInfo, GRID_COLS, GRID_ROWS, MIN_CROP_SIDE, TARGET_CELLS, UNREADABLE_CODE,
};
pub use sample::{BinarySample, NormalizedSample, SAMPLE_PIXELS, SAMPLE_SIZE};
pub use threshold::{adaptive_threshold, otsu_threshold, AdaptiveThresholdParams};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_for_verbosity};
