//! Raster error types.

use mural_core::CanvasError;
use thiserror::Error;

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors that can occur while rasterizing or moving pixels to disk.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Brush diameter outside the supported set.
    #[error("Invalid brush size: {0}")]
    InvalidBrushSize(u32),

    /// File extension not recognized by any codec.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Reading, writing, or coding image data failed.
    #[error("Image I/O failed: {0}")]
    Io(String),

    /// Pixel buffer operation failed.
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),
}
