//! Format-polymorphic pixel buffer.
//!
//! One flat byte buffer carries gray, gray+alpha, RGB, or RGBA pixels;
//! the layout is fixed at construction and every pixel access encodes
//! or decodes through [`Color`].

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Color};

/// Per-pixel channel layout of a canvas buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// One gray channel; alpha implied opaque.
    Gray,
    /// Gray plus alpha.
    GrayAlpha,
    /// Red, green, blue; alpha implied opaque.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl PixelFormat {
    /// Bytes per pixel for this layout.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// The layout storing the given number of 8-bit components, if any.
    #[must_use]
    pub const fn from_components(count: usize) -> Option<Self> {
        match count {
            1 => Some(Self::Gray),
            2 => Some(Self::GrayAlpha),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Decode the pixel starting at `offset` into a color.
    fn decode(self, data: &[u8], offset: usize) -> Color {
        match self {
            Self::Gray => {
                let v = data[offset];
                Color::new(v, v, v, 255)
            }
            Self::GrayAlpha => {
                let v = data[offset];
                Color::new(v, v, v, data[offset + 1])
            }
            Self::Rgb => Color::new(data[offset], data[offset + 1], data[offset + 2], 255),
            Self::Rgba => Color::new(
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ),
        }
    }

    /// Encode `color` into the pixel starting at `offset`.
    ///
    /// Gray layouts store the red channel; layouts without stored alpha
    /// drop it.
    fn encode(self, data: &mut [u8], offset: usize, color: Color) {
        match self {
            Self::Gray => data[offset] = color.r,
            Self::GrayAlpha => {
                data[offset] = color.r;
                data[offset + 1] = color.a;
            }
            Self::Rgb => {
                data[offset] = color.r;
                data[offset + 1] = color.g;
                data[offset + 2] = color.b;
            }
            Self::Rgba => {
                data[offset] = color.r;
                data[offset + 1] = color.g;
                data[offset + 2] = color.b;
                data[offset + 3] = color.a;
            }
        }
    }
}

/// Byte offset of the pixel at `(x, y)` in a row-major buffer.
const fn pixel_offset(width: u32, bytes_per_pixel: usize, x: u32, y: u32) -> usize {
    ((y as usize) * (width as usize) + (x as usize)) * bytes_per_pixel
}

/// A raster pixel buffer with a fixed channel layout.
///
/// Invariant: when backed, the buffer length is exactly
/// `width * height * bytes_per_pixel`. A canvas may also be constructed
/// without a backing buffer, in which case every pixel operation fails
/// with [`CanvasError::NoData`].
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Option<Vec<u8>>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::unbacked(PixelFormat::Rgb)
    }
}

impl Canvas {
    /// Create a canvas with every byte initialized to 255.
    ///
    /// A fresh canvas is opaque white in every layout.
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            data: Some(vec![255; len]),
        }
    }

    /// Create a canvas with no backing buffer.
    #[must_use]
    pub const fn unbacked(format: PixelFormat) -> Self {
        Self {
            width: 0,
            height: 0,
            format,
            data: None,
        }
    }

    /// Wrap an existing pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimensions`] when the buffer length
    /// does not equal `width * height` times the bytes per pixel.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> CanvasResult<Self> {
        let expected = (width as usize) * (height as usize) * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(CanvasError::InvalidDimensions(format!(
                "{} bytes cannot back a {width}x{height} canvas of {} bytes per pixel",
                data.len(),
                format.bytes_per_pixel(),
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data: Some(data),
        })
    }

    /// Canvas width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout of the buffer.
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Borrow the raw pixel bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoData`] when the canvas has no backing
    /// buffer.
    pub fn bytes(&self) -> CanvasResult<&[u8]> {
        self.data.as_deref().ok_or(CanvasError::NoData)
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// Layouts without stored alpha decode as opaque; gray layouts
    /// decode with the gray value in all three color channels.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoData`] without a backing buffer and
    /// [`CanvasError::OutOfBounds`] when the coordinate is outside the
    /// canvas.
    pub fn get(&self, x: u32, y: u32) -> CanvasResult<Color> {
        let data = self.data.as_deref().ok_or(CanvasError::NoData)?;
        if x >= self.width || y >= self.height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let offset = pixel_offset(self.width, self.format.bytes_per_pixel(), x, y);
        Ok(self.format.decode(data, offset))
    }

    /// Write the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoData`] without a backing buffer and
    /// [`CanvasError::OutOfBounds`] when the coordinate is outside the
    /// canvas.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> CanvasResult<()> {
        let (width, height, format) = (self.width, self.height, self.format);
        let data = self.data.as_deref_mut().ok_or(CanvasError::NoData)?;
        if x >= width || y >= height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        let offset = pixel_offset(width, format.bytes_per_pixel(), x, y);
        format.encode(data, offset, color);
        Ok(())
    }

    /// Nearest-neighbor scale into a new canvas of the same layout.
    ///
    /// Each destination pixel samples the source at
    /// `floor(dst * src_dim / dst_dim)`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoData`] without a backing buffer and
    /// [`CanvasError::InvalidDimensions`] when either target dimension
    /// is zero.
    #[allow(clippy::cast_possible_truncation)] // sample index is below the source dimension
    pub fn resize_copy(&self, new_width: u32, new_height: u32) -> CanvasResult<Self> {
        if self.data.is_none() {
            return Err(CanvasError::NoData);
        }
        if new_width == 0 || new_height == 0 {
            return Err(CanvasError::InvalidDimensions(format!(
                "cannot scale to {new_width}x{new_height}"
            )));
        }

        let mut scaled = Self::new(new_width, new_height, self.format);
        for y in 0..new_height {
            let src_y = (u64::from(y) * u64::from(self.height) / u64::from(new_height)) as u32;
            for x in 0..new_width {
                let src_x = (u64::from(x) * u64::from(self.width) / u64::from(new_width)) as u32;
                scaled.set(x, y, self.get(src_x, src_y)?)?;
            }
        }
        Ok(scaled)
    }

    /// Copy the overlapping top-left region from `other`, pixel by pixel.
    ///
    /// The region is `min(width) x min(height)`; the layouts may differ,
    /// with channels converted through [`Color`].
    ///
    /// # Errors
    ///
    /// Propagates pixel read/write failures from the underlying buffers.
    pub fn copy_from(&mut self, other: &Self) -> CanvasResult<()> {
        let w = self.width.min(other.width);
        let h = self.height.min(other.height);
        for y in 0..h {
            for x in 0..w {
                self.set(x, y, other.get(x, y)?)?;
            }
        }
        Ok(())
    }
}
