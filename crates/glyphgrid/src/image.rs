//! Conversions between `image` buffers and the pipeline's frame types.

use std::path::Path;

use glyphgrid_core::{GrayImage, ImageFrame};

use crate::error::ScanError;

/// Copy an RGBA image into an [`ImageFrame`].
pub fn frame_from_rgba(img: &::image::RgbaImage) -> Result<ImageFrame, ScanError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let frame = ImageFrame::new(width, height, img.as_raw().clone())?;
    Ok(frame)
}

/// Decode an image file of any supported format into a frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<ImageFrame, ScanError> {
    let img = ::image::open(path)?.to_rgba8();
    frame_from_rgba(&img)
}

pub fn frame_to_rgba(frame: &ImageFrame) -> ::image::RgbaImage {
    ::image::RgbaImage::from_fn(frame.width() as u32, frame.height() as u32, |x, y| {
        ::image::Rgba(frame.pixel(x as usize, y as usize))
    })
}

pub fn gray_to_luma(gray: &GrayImage) -> ::image::GrayImage {
    ::image::GrayImage::from_fn(gray.width as u32, gray.height as u32, |x, y| {
        ::image::Luma([gray.get(x as usize, y as usize)])
    })
}
