//! # Mural Raster
//!
//! Brush rasterization for the Mural shared canvas: alpha-masked brush
//! stamps, dot/line stroke rendering, permissive polyline parsing, and
//! the PNG codec behind canvas snapshots.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brush;
pub mod codec;
pub mod error;
pub mod painter;
pub mod stroke;

pub use brush::{BrushSet, SUPPORTED_SIZES};
pub use error::{RasterError, RasterResult};
pub use painter::Painter;
pub use stroke::{parse_polyline, scan_decimal, Segment};

/// Mural raster version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
