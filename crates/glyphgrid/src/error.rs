use glyphgrid_core::ImageError;

/// Failures reading or writing JSON config and report files.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failures turning caller input into a frame.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[cfg(feature = "image")]
    #[error("failed to decode image: {0}")]
    Decode(#[from] ::image::ImageError),
}
