use thiserror::Error;

/// Errors produced by the raster editing core and its file handoff
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image codec failed: {0}")]
    Codec(#[from] image::ImageError),

    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
