use thiserror::Error;

/// Rejected raw image buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image dimensions {width}x{height} are empty or overflow")]
    InvalidDimensions { width: usize, height: usize },
    #[error("image buffer has {got} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, got: usize },
}
