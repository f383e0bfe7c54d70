//! Dot stamping and stepped line rasterization.

use mural_core::{Canvas, Color};

use crate::brush::BrushSet;
use crate::stroke::{parse_polyline, Segment};
use crate::RasterResult;

/// Rasterizes strokes onto a canvas using a fixed brush set.
#[derive(Debug, Clone)]
pub struct Painter {
    brushes: BrushSet,
}

impl Painter {
    /// Create a painter over the given brush set.
    #[must_use]
    pub const fn new(brushes: BrushSet) -> Self {
        Self { brushes }
    }

    /// The painter's brush set.
    #[must_use]
    pub const fn brushes(&self) -> &BrushSet {
        &self.brushes
    }

    /// Stamp one brush dot centered at `(x, y)`.
    ///
    /// The stamp's alpha acts as a binary mask: wherever it is non-zero
    /// the flat brush color overwrites the canvas pixel, with no
    /// blending against existing content. Destination pixels outside
    /// the canvas are skipped without error.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported brush diameter.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // destinations are bounds-checked before the cast
    pub fn draw_dot(
        &self,
        canvas: &mut Canvas,
        x: i64,
        y: i64,
        color: Color,
        size: u32,
    ) -> RasterResult<()> {
        let stamp = self.brushes.stamp_for(size)?;
        let origin_x = x - i64::from(stamp.width() / 2);
        let origin_y = y - i64::from(stamp.height() / 2);
        let width = i64::from(canvas.width());
        let height = i64::from(canvas.height());

        for row in 0..stamp.height() {
            let dest_y = origin_y + i64::from(row);
            if dest_y < 0 || dest_y >= height {
                continue;
            }
            for col in 0..stamp.width() {
                let dest_x = origin_x + i64::from(col);
                if dest_x < 0 || dest_x >= width {
                    continue;
                }
                if stamp.get(col, row)?.a != 0 {
                    canvas.set(dest_x as u32, dest_y as u32, color)?;
                }
            }
        }
        Ok(())
    }

    /// Draw a stepped line along a segment.
    ///
    /// A degenerate segment draws a single dot. Otherwise the major
    /// axis advances in unit steps while the minor axis follows the
    /// slope, stamping a dot at each truncated position; overlapping
    /// stamps are what make the stroke continuous.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported brush diameter.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)] // stepping runs in f32 with truncation toward zero
    pub fn draw_line(
        &self,
        canvas: &mut Canvas,
        segment: Segment,
        color: Color,
        size: u32,
    ) -> RasterResult<()> {
        if segment.is_degenerate() {
            return self.draw_dot(
                canvas,
                i64::from(segment.x1),
                i64::from(segment.y1),
                color,
                size,
            );
        }

        let stamp = self.brushes.stamp_for(size)?;
        let (stamp_w, stamp_h) = (i64::from(stamp.width()), i64::from(stamp.height()));
        let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));

        let x1 = segment.x1 as f32;
        let y1 = segment.y1 as f32;
        let x2 = segment.x2 as f32;
        let y2 = segment.y2 as f32;
        let dx = x2 - x1;
        let dy = y2 - y1;

        if dx.abs() > dy.abs() {
            let (xmin, xmax) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
            let slope = dy / dx;
            let mut x = xmin;
            while x <= xmax {
                let xi = x as i64;
                // once the stamp origin passes the right edge nothing can land
                if xi - stamp_w / 2 >= width {
                    break;
                }
                let y = y1 + (x - x1) * slope;
                self.draw_dot(canvas, xi, y as i64, color, size)?;
                x += 1.0;
            }
        } else {
            let (ymin, ymax) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
            let slope = dx / dy;
            let mut y = ymin;
            while y <= ymax {
                let yi = y as i64;
                // once the stamp origin passes the bottom edge nothing can land
                if yi - stamp_h / 2 >= height {
                    break;
                }
                let x = x1 + (y - y1) * slope;
                self.draw_dot(canvas, x as i64, yi, color, size)?;
                y += 1.0;
            }
        }
        Ok(())
    }

    /// Rasterize every segment of a polyline onto the canvas.
    ///
    /// Segments are parsed permissively (see [`parse_polyline`]) and
    /// drawn in order with the same brush and color.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported brush diameter.
    pub fn apply_stroke(
        &self,
        canvas: &mut Canvas,
        size: u32,
        color: Color,
        polyline: &str,
    ) -> RasterResult<()> {
        for segment in parse_polyline(polyline) {
            self.draw_line(canvas, segment, color, size)?;
        }
        Ok(())
    }
}
