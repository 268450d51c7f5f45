//! Immediate-mode 2D drawing abstraction.
//!
//! Effects draw through this trait and never see a concrete backend.
//! Implementations: the CPU rasterizer in `storyline-fx-effects`, the
//! canvas-2d binding in `storyline-fx-wasm`, and recording surfaces in
//! tests. Every operation is infallible; a zero-sized surface accepts all
//! calls and renders nothing.

use crate::color::Rgba;

/// Minimal immediate-mode drawing capability.
///
/// State semantics follow the canvas 2d model: `save`/`restore` manage a
/// stack of (transform, alpha) pairs, `translate`/`rotate` append to the
/// current transform, and `set_alpha` multiplies into every subsequent
/// fill and stroke until restored.
///
/// This trait is **object-safe** so effects can hold `Box<dyn Surface>`.
pub trait Surface {
    /// Clears the whole surface to fully transparent.
    fn clear(&mut self);

    /// Pushes the current transform and alpha onto the state stack.
    fn save(&mut self);

    /// Pops the most recently saved state. A no-op on an empty stack.
    fn restore(&mut self);

    /// Appends a translation to the current transform.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Appends a rotation to the current transform.
    ///
    /// `radians` is clockwise with the y axis pointing down.
    fn rotate(&mut self, radians: f64);

    /// Sets the global alpha multiplier for subsequent drawing.
    fn set_alpha(&mut self, alpha: f64);

    /// Fills an axis-aligned rectangle in the current local space.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba);

    /// Strokes a one-pixel outline of a rectangle in the current local space.
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba);
}
