//! PNG canvas I/O.
//!
//! Extension-dispatched load/save over the `image` crate. Only PNG is
//! recognized; component counts 1/2/3/4 map to the gray, gray+alpha,
//! RGB, and RGBA color types in both directions, so a canvas round-trips
//! through disk without changing its layout.

use std::io::Cursor;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder};
use mural_core::{Canvas, PixelFormat};

use crate::{RasterError, RasterResult};

/// On-disk color type for a canvas layout.
fn color_type(format: PixelFormat) -> ColorType {
    match format {
        PixelFormat::Gray => ColorType::L8,
        PixelFormat::GrayAlpha => ColorType::La8,
        PixelFormat::Rgb => ColorType::Rgb8,
        PixelFormat::Rgba => ColorType::Rgba8,
    }
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Load a canvas from a raster file.
///
/// An 8-bit gray, gray+alpha, RGB, or RGBA file becomes a canvas of the
/// matching layout; any other encoding is converted to RGBA.
///
/// # Errors
///
/// Returns `UnsupportedFormat` for a file extension other than `.png`
/// and `Io` when the file cannot be read or decoded.
pub fn load(path: &Path) -> RasterResult<Canvas> {
    if !has_png_extension(path) {
        return Err(RasterError::UnsupportedFormat(path.display().to_string()));
    }

    let decoded = image::open(path)
        .map_err(|e| RasterError::Io(format!("Failed to read {}: {e}", path.display())))?;

    let canvas = match decoded {
        DynamicImage::ImageLuma8(buf) => {
            let (w, h) = buf.dimensions();
            Canvas::from_raw(w, h, PixelFormat::Gray, buf.into_raw())?
        }
        DynamicImage::ImageLumaA8(buf) => {
            let (w, h) = buf.dimensions();
            Canvas::from_raw(w, h, PixelFormat::GrayAlpha, buf.into_raw())?
        }
        DynamicImage::ImageRgb8(buf) => {
            let (w, h) = buf.dimensions();
            Canvas::from_raw(w, h, PixelFormat::Rgb, buf.into_raw())?
        }
        DynamicImage::ImageRgba8(buf) => {
            let (w, h) = buf.dimensions();
            Canvas::from_raw(w, h, PixelFormat::Rgba, buf.into_raw())?
        }
        other => {
            let buf = other.to_rgba8();
            let (w, h) = buf.dimensions();
            Canvas::from_raw(w, h, PixelFormat::Rgba, buf.into_raw())?
        }
    };

    Ok(canvas)
}

/// Save a canvas to a raster file, dispatched on the file extension.
///
/// # Errors
///
/// Returns `UnsupportedFormat` for a target path not ending in `.png`,
/// a canvas error for an unbacked canvas, and `Io` when encoding or
/// writing fails.
pub fn save(canvas: &Canvas, path: &Path) -> RasterResult<()> {
    if !has_png_extension(path) {
        return Err(RasterError::UnsupportedFormat(path.display().to_string()));
    }

    let bytes = canvas.bytes()?;
    image::save_buffer(
        path,
        bytes,
        canvas.width(),
        canvas.height(),
        color_type(canvas.format()),
    )
    .map_err(|e| RasterError::Io(format!("Failed to write {}: {e}", path.display())))
}

/// Encode a canvas as PNG bytes in memory.
///
/// # Errors
///
/// Returns a canvas error for an unbacked canvas and `Io` when encoding
/// fails.
pub fn encode_png(canvas: &Canvas) -> RasterResult<Vec<u8>> {
    let bytes = canvas.bytes()?;
    let mut buf = Cursor::new(Vec::new());
    PngEncoder::new(&mut buf)
        .write_image(
            bytes,
            canvas.width(),
            canvas.height(),
            color_type(canvas.format()).into(),
        )
        .map_err(|e| RasterError::Io(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mural_core::{CanvasError, Color};

    #[test]
    fn test_rgba_round_trip_preserves_every_channel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rgba.png");

        let mut canvas = Canvas::new(3, 2, PixelFormat::Rgba);
        canvas.set(0, 0, Color::new(1, 2, 3, 4)).expect("set");
        canvas.set(2, 1, Color::new(250, 128, 0, 17)).expect("set");

        save(&canvas, &path).expect("save");
        let loaded = load(&path).expect("load");

        assert_eq!(loaded.format(), PixelFormat::Rgba);
        assert_eq!(loaded.width(), 3);
        assert_eq!(loaded.height(), 2);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(
                    loaded.get(x, y).expect("get"),
                    canvas.get(x, y).expect("get"),
                    "pixel ({x}, {y}) should survive the round trip"
                );
            }
        }
    }

    #[test]
    fn test_gray_round_trip_preserves_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gray.png");

        let mut canvas = Canvas::new(2, 2, PixelFormat::Gray);
        canvas.set(1, 0, Color::new(99, 0, 0, 255)).expect("set");

        save(&canvas, &path).expect("save");
        let loaded = load(&path).expect("load");

        assert_eq!(loaded.format(), PixelFormat::Gray);
        assert_eq!(loaded.get(1, 0).expect("get"), Color::new(99, 99, 99, 255));
    }

    #[test]
    fn test_unrecognized_extension_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let canvas = Canvas::new(1, 1, PixelFormat::Rgb);

        let result = save(&canvas, &dir.path().join("canvas.bmp"));
        assert!(matches!(result, Err(RasterError::UnsupportedFormat(_))));

        let result = load(&dir.path().join("canvas.jpeg"));
        assert!(matches!(result, Err(RasterError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extension_check_ignores_case() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("canvas.PNG");

        let canvas = Canvas::new(1, 1, PixelFormat::Rgb);
        save(&canvas, &path).expect("save");
        assert!(load(&path).is_ok());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(RasterError::Io(_))));
    }

    #[test]
    fn test_unbacked_canvas_cannot_be_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = save(&Canvas::unbacked(PixelFormat::Rgb), &dir.path().join("x.png"));
        assert!(matches!(
            result,
            Err(RasterError::Canvas(CanvasError::NoData))
        ));

        let result = encode_png(&Canvas::unbacked(PixelFormat::Rgb));
        assert!(matches!(
            result,
            Err(RasterError::Canvas(CanvasError::NoData))
        ));
    }

    #[test]
    fn test_encode_png_produces_png_bytes() {
        let canvas = Canvas::new(4, 4, PixelFormat::Rgb);
        let png = encode_png(&canvas).expect("encode");
        assert!(png.len() > 8);
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }
}
