//! The draw annotation overlay.
//!
//! A [`DrawLayer`] is a transparent RGBA raster the same size as the
//! working image. Freehand strokes, shapes, text, and fills accumulate on
//! the overlay without touching the working image; committing composites
//! the overlay alpha-over onto the working image as one destructive edit
//! and clears it.
//!
//! Shape edges are rasterized from signed distances with one pixel of
//! analytic anti-aliasing.

use ab_glyph::{point, Font, FontRef, ScaleFont};
use thiserror::Error;

use crate::raster::RasterBuffer;

/// Error raised by draw operations.
#[derive(Debug, Error)]
pub enum DrawError {
    /// The supplied font bytes could not be parsed.
    #[error("Invalid font data")]
    InvalidFont,

    /// A fill seed point fell outside the canvas.
    #[error("Point ({0}, {1}) is outside the canvas")]
    OutOfBounds(i64, i64),
}

/// One draw operation against the overlay.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DrawOp {
    /// Freehand polyline with round joins and caps.
    Stroke {
        points: Vec<(f32, f32)>,
        color: [u8; 4],
        thickness: f32,
    },
    /// Straight line segment.
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: [u8; 4],
        thickness: f32,
    },
    /// Axis-aligned rectangle, outlined or filled.
    Rect {
        min: (f32, f32),
        max: (f32, f32),
        color: [u8; 4],
        thickness: f32,
        filled: bool,
    },
    /// Axis-aligned ellipse, outlined or filled.
    Ellipse {
        center: (f32, f32),
        radii: (f32, f32),
        color: [u8; 4],
        thickness: f32,
        filled: bool,
    },
    /// Tolerance flood fill seeded on the composited view.
    FloodFill {
        seed: (u32, u32),
        color: [u8; 4],
        tolerance: u8,
    },
}

/// The annotation overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawLayer {
    overlay: RasterBuffer,
}

impl DrawLayer {
    /// Create a transparent overlay matching the working image size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            overlay: RasterBuffer::transparent(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.overlay.width
    }

    pub fn height(&self) -> u32 {
        self.overlay.height
    }

    /// True when nothing has been drawn since the last clear.
    pub fn is_blank(&self) -> bool {
        self.overlay.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Drop all accumulated annotations.
    pub fn clear(&mut self) {
        self.overlay = RasterBuffer::transparent(self.overlay.width, self.overlay.height);
    }

    /// Read access for previews (the UI composites it live).
    pub fn overlay(&self) -> &RasterBuffer {
        &self.overlay
    }

    /// Apply one draw operation.
    ///
    /// `working` is the current working image; flood fill matches colors
    /// against the composite of working + overlay.
    pub fn apply(&mut self, op: &DrawOp, working: &RasterBuffer) -> Result<(), DrawError> {
        match op {
            DrawOp::Stroke {
                points,
                color,
                thickness,
            } => {
                for pair in points.windows(2) {
                    self.paint_segment(pair[0], pair[1], *color, *thickness);
                }
                if points.len() == 1 {
                    self.paint_segment(points[0], points[0], *color, *thickness);
                }
                Ok(())
            }
            DrawOp::Line {
                from,
                to,
                color,
                thickness,
            } => {
                self.paint_segment(*from, *to, *color, *thickness);
                Ok(())
            }
            DrawOp::Rect {
                min,
                max,
                color,
                thickness,
                filled,
            } => {
                self.paint_rect(*min, *max, *color, *thickness, *filled);
                Ok(())
            }
            DrawOp::Ellipse {
                center,
                radii,
                color,
                thickness,
                filled,
            } => {
                self.paint_ellipse(*center, *radii, *color, *thickness, *filled);
                Ok(())
            }
            DrawOp::FloodFill {
                seed,
                color,
                tolerance,
            } => self.flood_fill(*seed, *color, *tolerance, working),
        }
    }

    /// Rasterize a single line of text at the given baseline origin.
    ///
    /// `font_bytes` is a TTF/OTF payload supplied by the caller; fonts are
    /// an asset of the UI layer, not the core.
    pub fn draw_text(
        &mut self,
        font_bytes: &[u8],
        text: &str,
        size: f32,
        origin: (f32, f32),
        color: [u8; 4],
    ) -> Result<(), DrawError> {
        let font = FontRef::try_from_slice(font_bytes).map_err(|_| DrawError::InvalidFont)?;
        let scaled = font.as_scaled(size);

        let mut cursor_x = origin.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(p) = prev {
                cursor_x += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(size, point(cursor_x, origin.1));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + gx as i64;
                    let py = bounds.min.y as i64 + gy as i64;
                    self.blend_pixel(px, py, color, coverage);
                });
            }
            cursor_x += scaled.h_advance(id);
            prev = Some(id);
        }
        Ok(())
    }

    /// Composite the overlay alpha-over onto a working image.
    pub fn composite_over(&self, working: &RasterBuffer) -> RasterBuffer {
        let mut out = working.clone();
        for (dst, src) in out
            .pixels
            .chunks_exact_mut(4)
            .zip(self.overlay.pixels.chunks_exact(4))
        {
            let sa = src[3] as f32 / 255.0;
            if sa == 0.0 {
                continue;
            }
            let da = dst[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            if out_a > 0.0 {
                for c in 0..3 {
                    let blended = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
                    dst[c] = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
            dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// Blend a color into the overlay at the given coverage (0.0..=1.0).
    fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 4], coverage: f32) {
        if x < 0 || y < 0 || x >= self.overlay.width as i64 || y >= self.overlay.height as i64 {
            return;
        }
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage == 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let dst = self.overlay.get(x, y);

        let sa = color[3] as f32 / 255.0 * coverage;
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a == 0.0 {
            return;
        }
        let mut out = [0u8; 4];
        for c in 0..3 {
            let blended = (color[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
            out[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        self.overlay.put(x, y, out);
    }

    /// Paint a thick segment with round caps from its distance field.
    fn paint_segment(&mut self, a: (f32, f32), b: (f32, f32), color: [u8; 4], thickness: f32) {
        let radius = (thickness / 2.0).max(0.5);
        let min_x = (a.0.min(b.0) - radius - 1.0).floor().max(0.0) as u32;
        let min_y = (a.1.min(b.1) - radius - 1.0).floor().max(0.0) as u32;
        let max_x = ((a.0.max(b.0) + radius + 1.0).ceil() as u32).min(self.overlay.width);
        let max_y = ((a.1.max(b.1) + radius + 1.0).ceil() as u32).min(self.overlay.height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let d = segment_distance(x as f32 + 0.5, y as f32 + 0.5, a, b);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                self.blend_pixel(x as i64, y as i64, color, coverage);
            }
        }
    }

    fn paint_rect(
        &mut self,
        min: (f32, f32),
        max: (f32, f32),
        color: [u8; 4],
        thickness: f32,
        filled: bool,
    ) {
        let (x0, x1) = (min.0.min(max.0), min.0.max(max.0));
        let (y0, y1) = (min.1.min(max.1), min.1.max(max.1));
        if filled {
            let px0 = x0.floor().max(0.0) as u32;
            let py0 = y0.floor().max(0.0) as u32;
            let px1 = (x1.ceil() as u32).min(self.overlay.width);
            let py1 = (y1.ceil() as u32).min(self.overlay.height);
            for y in py0..py1 {
                for x in px0..px1 {
                    self.blend_pixel(x as i64, y as i64, color, 1.0);
                }
            }
        } else {
            self.paint_segment((x0, y0), (x1, y0), color, thickness);
            self.paint_segment((x1, y0), (x1, y1), color, thickness);
            self.paint_segment((x1, y1), (x0, y1), color, thickness);
            self.paint_segment((x0, y1), (x0, y0), color, thickness);
        }
    }

    fn paint_ellipse(
        &mut self,
        center: (f32, f32),
        radii: (f32, f32),
        color: [u8; 4],
        thickness: f32,
        filled: bool,
    ) {
        let rx = radii.0.max(0.5);
        let ry = radii.1.max(0.5);
        let min_x = ((center.0 - rx - thickness - 1.0).floor().max(0.0)) as u32;
        let min_y = ((center.1 - ry - thickness - 1.0).floor().max(0.0)) as u32;
        let max_x = ((center.0 + rx + thickness + 1.0).ceil() as u32).min(self.overlay.width);
        let max_y = ((center.1 + ry + thickness + 1.0).ceil() as u32).min(self.overlay.height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let dx = (x as f32 + 0.5 - center.0) / rx;
                let dy = (y as f32 + 0.5 - center.1) / ry;
                let q = (dx * dx + dy * dy).sqrt();
                // Approximate signed distance in pixels
                let dist = (q - 1.0) * rx.min(ry);
                let coverage = if filled {
                    (0.5 - dist).clamp(0.0, 1.0)
                } else {
                    (thickness / 2.0 + 0.5 - dist.abs()).clamp(0.0, 1.0)
                };
                self.blend_pixel(x as i64, y as i64, color, coverage);
            }
        }
    }

    /// Breadth-first flood fill over the composited colors.
    fn flood_fill(
        &mut self,
        seed: (u32, u32),
        color: [u8; 4],
        tolerance: u8,
        working: &RasterBuffer,
    ) -> Result<(), DrawError> {
        let (w, h) = (self.overlay.width, self.overlay.height);
        if seed.0 >= w || seed.1 >= h {
            return Err(DrawError::OutOfBounds(seed.0 as i64, seed.1 as i64));
        }

        let composite = self.composite_over(working);
        let target = composite.get(seed.0, seed.1);
        let matches = |px: [u8; 4]| -> bool {
            px.iter()
                .zip(target.iter())
                .all(|(&a, &b)| (a as i16 - b as i16).unsigned_abs() as u8 <= tolerance)
        };

        let mut visited = vec![false; (w as usize) * (h as usize)];
        let mut stack = vec![seed];
        while let Some((x, y)) = stack.pop() {
            let idx = (y as usize) * (w as usize) + (x as usize);
            if visited[idx] || !matches(composite.get(x, y)) {
                continue;
            }
            visited[idx] = true;
            self.overlay.put(x, y, color);

            if x > 0 {
                stack.push((x - 1, y));
            }
            if x + 1 < w {
                stack.push((x + 1, y));
            }
            if y > 0 {
                stack.push((x, y - 1));
            }
            if y + 1 < h {
                stack.push((x, y + 1));
            }
        }
        Ok(())
    }
}

/// Distance from a point to a line segment.
fn segment_distance(px: f32, py: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let abx = b.0 - a.0;
    let aby = b.1 - a.1;
    let apx = px - a.0;
    let apy = py - a.1;
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.0 + t * abx - px;
    let cy = a.1 + t * aby - py;
    (cx * cx + cy * cy).sqrt()
}
