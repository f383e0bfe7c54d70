//! Error types for pixel buffer operations.

use thiserror::Error;

/// Result type for pixel buffer operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in pixel buffer operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Pixel coordinate outside the canvas bounds.
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        /// Requested x coordinate.
        x: u32,
        /// Requested y coordinate.
        y: u32,
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },

    /// Operation on a canvas with no backing buffer.
    #[error("Canvas has no pixel data")]
    NoData,

    /// Dimensions that cannot describe a pixel buffer.
    #[error("Invalid canvas dimensions: {0}")]
    InvalidDimensions(String),
}
