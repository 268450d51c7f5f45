//! WASM bindings for storyline-fx.
//!
//! Exposes the shatter effect and the stat counters to a browser page.
//! The page keeps the scheduling: it calls `trigger` from its scroll
//! observer or key handler and drives `tick` from requestAnimationFrame,
//! stopping once `tick` reports false.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, Window};

use storyline_fx_core::color::Rgba;
use storyline_fx_core::error::FxError;
use storyline_fx_core::surface::Surface;
use storyline_fx_core::viewport::Viewport;
use storyline_fx_core::{Effect, Flow};
use storyline_fx_counter::{CountUp, CountUpParams};
use storyline_fx_shatter::{Shatter, ShatterParams};

/// CSS class toggled on the overlay element while a shatter run is live.
const ACTIVE_CLASS: &str = "active";

/// [`Surface`] over a 2d canvas context.
///
/// Delegates each call to the matching context operation; `clear` reads
/// the canvas size live so a resized canvas clears fully.
struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        if let Some(canvas) = self.ctx.canvas() {
            self.ctx
                .clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let _ = self.ctx.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        let _ = self.ctx.rotate(radians);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke_rect(x, y, w, h);
    }
}

/// Glass-shatter effect bound to a full-window canvas.
///
/// Construction fails if the canvas element or its 2d context is
/// missing; the page cannot recover from that, so it surfaces as a
/// thrown `JsValue` instead of a silent no-op handle.
#[wasm_bindgen]
pub struct ShatterEffect {
    fx: Shatter<CanvasSurface>,
    canvas: HtmlCanvasElement,
    overlay: Option<Element>,
}

#[wasm_bindgen]
impl ShatterEffect {
    /// Binds to the canvas with the given id and sizes it to the window.
    ///
    /// `overlay_id` optionally names an element that gets the `active`
    /// class while a run is live.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        overlay_id: Option<String>,
        seed: u64,
    ) -> Result<ShatterEffect, JsValue> {
        let window = window().map_err(to_js)?;
        let document = document(&window).map_err(to_js)?;
        let canvas = lookup(&document, canvas_id)
            .map_err(to_js)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| to_js(FxError::Host(format!("element '{canvas_id}' is not a canvas"))))?;
        let overlay = match overlay_id.as_deref() {
            Some(id) => Some(lookup(&document, id).map_err(to_js)?),
            None => None,
        };

        let viewport = window_viewport(&window);
        size_canvas(&canvas, viewport);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| to_js(FxError::Host(format!("no 2d context for canvas '{canvas_id}'"))))?;

        let fx = Shatter::new(
            CanvasSurface { ctx },
            viewport,
            seed,
            ShatterParams::default(),
        )
        .map_err(to_js)?;

        Ok(ShatterEffect {
            fx,
            canvas,
            overlay,
        })
    }

    /// Shatters the viewport. A no-op while a run is in progress.
    pub fn trigger(&mut self) {
        self.fx.trigger();
        if self.fx.running() {
            if let Some(overlay) = &self.overlay {
                let _ = overlay.class_list().add_1(ACTIVE_CLASS);
            }
        }
    }

    /// Advances one frame. Returns false once the run has settled, at
    /// which point the overlay class is removed and the host can stop
    /// scheduling frames.
    pub fn tick(&mut self) -> bool {
        match self.fx.tick() {
            Flow::Running => true,
            Flow::Settled => {
                if let Some(overlay) = &self.overlay {
                    let _ = overlay.class_list().remove_1(ACTIVE_CLASS);
                }
                false
            }
        }
    }

    pub fn running(&self) -> bool {
        self.fx.running()
    }

    /// Re-reads the window size for the next trigger and resizes the
    /// canvas. A run in progress keeps its geometry.
    pub fn resize(&mut self) {
        if let Ok(window) = window() {
            let viewport = window_viewport(&window);
            size_canvas(&self.canvas, viewport);
            self.fx.resize(viewport);
        }
    }
}

/// Count-up tween handle for the page's stat numbers.
#[wasm_bindgen]
pub struct StatCounter {
    counter: CountUp,
}

#[wasm_bindgen]
impl StatCounter {
    #[wasm_bindgen(constructor)]
    pub fn new(
        from: f64,
        to: f64,
        duration: usize,
        group_digits: bool,
    ) -> Result<StatCounter, JsValue> {
        let counter = CountUp::new(CountUpParams {
            from,
            to,
            duration,
            group_digits,
        })
        .map_err(to_js)?;
        Ok(StatCounter { counter })
    }

    /// Replays the configured tween. A no-op while a run is in progress.
    pub fn trigger(&mut self) {
        self.counter.trigger();
    }

    /// Advances one frame. Returns false once the tween has landed.
    pub fn tick(&mut self) -> bool {
        self.counter.tick() == Flow::Running
    }

    pub fn running(&self) -> bool {
        self.counter.running()
    }

    pub fn value(&self) -> f64 {
        self.counter.value()
    }

    /// The formatted number the page should show.
    pub fn display(&self) -> String {
        self.counter.display()
    }

    /// Re-aims the tween at a new target from the current value.
    pub fn retarget(&mut self, to: f64) {
        self.counter.retarget(to);
    }
}

fn window() -> Result<Window, FxError> {
    web_sys::window().ok_or_else(|| FxError::Host("no window".into()))
}

fn document(window: &Window) -> Result<Document, FxError> {
    window.document().ok_or_else(|| FxError::Host("no document".into()))
}

fn lookup(document: &Document, id: &str) -> Result<Element, FxError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| FxError::Host(format!("no element with id '{id}'")))
}

/// The window's inner size. Unreadable dimensions come back zero, which
/// degrades runs to empty ones rather than failing.
fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
    canvas.set_width(viewport.width.max(0.0) as u32);
    canvas.set_height(viewport.height.max(0.0) as u32);
}

fn to_js(err: FxError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
