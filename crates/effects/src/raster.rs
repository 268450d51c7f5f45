//! CPU rasterizer implementing [`Surface`] over an RGBA8 buffer.
//!
//! This module is always available (no feature gate) so that both the `png`
//! snapshot path and the WASM `ImageData` path can share the same pixels.
//!
//! The surface mirrors the canvas-2d drawing model: a current transform and
//! global alpha, a save/restore stack, and source-over compositing. Pixels
//! are stored straight (non-premultiplied), four bytes per pixel, row-major
//! from the top-left.

use glam::{DAffine2, DVec2};
use storyline_fx_core::color::Rgba;
use storyline_fx_core::surface::Surface;
use storyline_fx_core::viewport::Viewport;

/// Upper bound on either pixel dimension.
///
/// Browser canvases cap their backing stores around this size; clamping
/// here keeps a wild viewport from requesting an absurd allocation.
pub const MAX_DIM: usize = 16_384;

/// In-memory RGBA8 surface with canvas-2d transform semantics.
///
/// Coverage is decided per pixel center, without antialiasing: a pixel is
/// painted when its center falls inside the shape mapped through the
/// current transform. Stroked rectangles paint a one-unit band centered on
/// the outline, which is exact for the rigid transforms the effects use.
pub struct RasterSurface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    transform: DAffine2,
    alpha: f64,
    stack: Vec<(DAffine2, f64)>,
}

impl RasterSurface {
    /// Creates a transparent surface of the given pixel size.
    ///
    /// A zero dimension yields an empty surface that accepts and ignores
    /// all drawing calls.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
            transform: DAffine2::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
        }
    }

    /// Creates a surface sized for a viewport, one pixel per CSS unit.
    ///
    /// Fractional dimensions round up. A degenerate viewport yields an
    /// empty surface; dimensions beyond [`MAX_DIM`] clamp to it.
    pub fn for_viewport(viewport: Viewport) -> Self {
        if viewport.is_degenerate() {
            return Self::new(0, 0);
        }
        let clamp = |d: f64| (d.ceil() as usize).min(MAX_DIM);
        Self::new(clamp(viewport.width), clamp(viewport.height))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The full RGBA8 buffer, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA bytes of one pixel. The coordinates must be in bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Device-space pixel bounds covering the transformed corners,
    /// clamped to the buffer. Saturates to an empty range on non-finite
    /// input.
    fn device_bbox(&self, corners: &[DVec2; 4]) -> (usize, usize, usize, usize) {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for c in corners {
            min = min.min(*c);
            max = max.max(*c);
        }
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = max.x.ceil().clamp(0.0, self.width as f64) as usize;
        let y1 = max.y.ceil().clamp(0.0, self.height as f64) as usize;
        (x0, y0, x1, y1)
    }

    /// Paints every pixel whose center maps inside `inside` under the
    /// current transform, scanning only the bbox of `corners`.
    fn paint(&mut self, corners: [DVec2; 4], color: Rgba, inside: impl Fn(DVec2) -> bool) {
        let inv = self.transform.inverse();
        let (x0, y0, x1, y1) = self.device_bbox(&corners);
        let alpha = self.alpha;
        for py in y0..y1 {
            for px in x0..x1 {
                let center = DVec2::new(px as f64 + 0.5, py as f64 + 0.5);
                if inside(inv.transform_point2(center)) {
                    let idx = (py * self.width + px) * 4;
                    blend(&mut self.pixels[idx..idx + 4], color, alpha);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform * DAffine2::from_translation(DVec2::new(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform * DAffine2::from_angle(radians);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let corners = rect_corners(x, y, w, h).map(|p| self.transform.transform_point2(p));
        self.paint(corners, color, |local| {
            local.x >= x && local.x <= x + w && local.y >= y && local.y <= y + h
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        // One-unit band straddling the outline: inside the rect expanded
        // by half a unit, outside the rect shrunk by half a unit.
        let corners =
            rect_corners(x - 0.5, y - 0.5, w + 1.0, h + 1.0).map(|p| self.transform.transform_point2(p));
        self.paint(corners, color, |local| {
            let in_outer = local.x >= x - 0.5
                && local.x <= x + w + 0.5
                && local.y >= y - 0.5
                && local.y <= y + h + 0.5;
            let in_inner = local.x > x + 0.5
                && local.x < x + w - 0.5
                && local.y > y + 0.5
                && local.y < y + h - 0.5;
            in_outer && !in_inner
        });
    }
}

/// The four corners of an axis-aligned rectangle, in local space.
fn rect_corners(x: f64, y: f64, w: f64, h: f64) -> [DVec2; 4] {
    [
        DVec2::new(x, y),
        DVec2::new(x + w, y),
        DVec2::new(x, y + h),
        DVec2::new(x + w, y + h),
    ]
}

/// Source-over composite of a straight-alpha color onto one stored pixel.
fn blend(dst: &mut [u8], color: Rgba, global_alpha: f64) {
    let a = (color.a * global_alpha).clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let src = [color.r, color.g, color.b];
    let dst_a = dst[3] as f64 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    for c in 0..3 {
        let dc = dst[c] as f64 / 255.0;
        let oc = (src[c].clamp(0.0, 1.0) * a + dc * dst_a * (1.0 - a)) / out_a;
        dst[c] = (oc * 255.0).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}
