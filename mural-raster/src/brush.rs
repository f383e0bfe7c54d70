//! Brush stamp resources.
//!
//! A brush is a small raster whose alpha channel acts as a stencil when
//! dots are stamped onto the canvas. The set of diameters is fixed;
//! stamps are loaded once at startup and shared read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use mural_core::{Canvas, Color, PixelFormat};
use tracing::{debug, info};

use crate::codec;
use crate::{RasterError, RasterResult};

/// Brush diameters with a stamp resource.
pub const SUPPORTED_SIZES: [u32; 5] = [2, 4, 8, 16, 32];

/// An immutable set of alpha-masked brush stamps keyed by diameter.
#[derive(Debug, Clone)]
pub struct BrushSet {
    stamps: HashMap<u32, Canvas>,
}

impl BrushSet {
    /// Load `Brush<N>.png` stamps for every supported diameter from a
    /// directory.
    ///
    /// The set is all-or-nothing: brush files are deployment resources,
    /// and a missing or undecodable stamp fails the whole load.
    ///
    /// # Errors
    ///
    /// Returns an error when any stamp file cannot be read or decoded.
    pub fn load_dir(dir: &Path) -> RasterResult<Self> {
        let mut stamps = HashMap::new();
        for &size in &SUPPORTED_SIZES {
            let path = dir.join(format!("Brush{size}.png"));
            let stamp = codec::load(&path)?;
            debug!(size, path = %path.display(), "loaded brush stamp");
            stamps.insert(size, stamp);
        }
        info!(count = stamps.len(), dir = %dir.display(), "brush set loaded");
        Ok(Self { stamps })
    }

    /// Build filled-disc stamps for every supported diameter.
    ///
    /// The procedural set stands in for the PNG resources: each stamp is
    /// an RGBA square whose alpha is opaque inside the inscribed circle
    /// and zero outside it, so servers and tests run without brush files
    /// on disk.
    #[must_use]
    pub fn procedural() -> Self {
        let mut stamps = HashMap::new();
        for &size in &SUPPORTED_SIZES {
            stamps.insert(size, disc_stamp(size));
        }
        info!(count = stamps.len(), "procedural brush set built");
        Self { stamps }
    }

    /// The stamp for a brush diameter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBrushSize` for any diameter outside
    /// {2, 4, 8, 16, 32}.
    pub fn stamp_for(&self, size: u32) -> RasterResult<&Canvas> {
        self.stamps
            .get(&size)
            .ok_or(RasterError::InvalidBrushSize(size))
    }
}

/// An RGBA square with an opaque disc inscribed in it.
fn disc_stamp(size: u32) -> Canvas {
    let mut stamp = Canvas::new(size, size, PixelFormat::Rgba);
    let radius = f64::from(size) / 2.0;
    let center = radius - 0.5;
    for y in 0..size {
        for x in 0..size {
            let dx = f64::from(x) - center;
            let dy = f64::from(y) - center;
            if (dx * dx + dy * dy).sqrt() > radius {
                // loop bounds keep every write inside the stamp
                let _ = stamp.set(x, y, Color::new(255, 255, 255, 0));
            }
        }
    }
    stamp
}
