//! # Mural Core
//!
//! Pixel buffer and color primitives for the Mural shared canvas.
//!
//! A [`Canvas`] is one flat byte buffer with a fixed [`PixelFormat`]
//! (gray, gray+alpha, RGB, or RGBA) chosen at construction. All pixel
//! access goes through [`Color`], which always carries four 8-bit
//! channels; each format encodes and decodes the subset it stores and
//! implies opaque alpha for the rest.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod color;
pub mod error;

pub use canvas::{Canvas, PixelFormat};
pub use color::Color;
pub use error::{CanvasError, CanvasResult};

/// Mural core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
