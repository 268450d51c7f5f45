#![deny(unsafe_code)]
//! Effect registry: maps effect names to implementations and provides
//! CPU-side snapshot rendering.
//!
//! This crate sits between `storyline-fx-core` (which defines the `Effect`
//! trait) and the individual effect crates (`storyline-fx-shatter`,
//! `storyline-fx-counter`). Both the CLI and WASM bindings depend on this
//! crate to avoid duplicating dispatch logic.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use serde_json::Value;
use storyline_fx_core::cue::Cue;
use storyline_fx_core::error::FxError;
use storyline_fx_core::viewport::Viewport;
use storyline_fx_core::{Effect, Flow};
use storyline_fx_counter::{CountUp, Countdown, LiveFeed};
use storyline_fx_shatter::Shatter;

use crate::raster::RasterSurface;

/// All available effect names.
const EFFECT_NAMES: &[&str] = &["shatter", "count-up", "countdown", "live-feed"];

/// Enumeration of all available storyline effects.
///
/// Wraps each effect implementation and delegates `Effect` trait methods.
/// Use [`EffectKind::from_name`] for string-based construction (CLI, WASM).
pub enum EffectKind {
    /// Glass-shatter particle field, rendered to a CPU raster surface.
    Shatter(Shatter<RasterSurface>),
    /// Linear count-up tween.
    CountUp(CountUp),
    /// Stepped countdown.
    Countdown(Countdown),
    /// Non-settling live stat walk.
    LiveFeed(LiveFeed),
}

impl EffectKind {
    /// Constructs an effect by name.
    ///
    /// The viewport dimensions only matter to the visual effects; the
    /// counters ignore them. Returns `FxError::UnknownEffect` if the name
    /// is not recognized.
    pub fn from_name(
        name: &str,
        width: f64,
        height: f64,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FxError> {
        let viewport = Viewport::new(width, height);
        match name {
            "shatter" => Ok(EffectKind::Shatter(Shatter::from_json(
                RasterSurface::for_viewport(viewport),
                viewport,
                seed,
                params,
            )?)),
            "count-up" => Ok(EffectKind::CountUp(CountUp::from_json(params)?)),
            "countdown" => Ok(EffectKind::Countdown(Countdown::from_json(params))),
            "live-feed" => Ok(EffectKind::LiveFeed(LiveFeed::from_json(seed, params))),
            _ => Err(FxError::UnknownEffect(name.to_string())),
        }
    }

    /// Constructs the effect a cue describes.
    pub fn from_cue(cue: &Cue) -> Result<Self, FxError> {
        cue.validate()?;
        Self::from_name(&cue.effect, cue.width, cue.height, cue.seed, &cue.params)
    }

    /// Returns a slice of all recognized effect names.
    pub fn list_effects() -> &'static [&'static str] {
        EFFECT_NAMES
    }

    /// The raster surface the effect draws to, for effects that draw.
    pub fn surface(&self) -> Option<&RasterSurface> {
        match self {
            EffectKind::Shatter(fx) => Some(fx.surface()),
            _ => None,
        }
    }

    /// The display string, for effects that render a number.
    pub fn display(&self) -> Option<String> {
        match self {
            EffectKind::Shatter(_) => None,
            EffectKind::CountUp(c) => Some(c.display()),
            EffectKind::Countdown(c) => Some(c.display()),
            EffectKind::LiveFeed(f) => Some(f.display()),
        }
    }
}

impl Effect for EffectKind {
    fn trigger(&mut self) {
        match self {
            EffectKind::Shatter(fx) => fx.trigger(),
            EffectKind::CountUp(c) => c.trigger(),
            EffectKind::Countdown(c) => c.trigger(),
            EffectKind::LiveFeed(f) => f.trigger(),
        }
    }

    fn tick(&mut self) -> Flow {
        match self {
            EffectKind::Shatter(fx) => fx.tick(),
            EffectKind::CountUp(c) => c.tick(),
            EffectKind::Countdown(c) => c.tick(),
            EffectKind::LiveFeed(f) => f.tick(),
        }
    }

    fn running(&self) -> bool {
        match self {
            EffectKind::Shatter(fx) => fx.running(),
            EffectKind::CountUp(c) => c.running(),
            EffectKind::Countdown(c) => c.running(),
            EffectKind::LiveFeed(f) => f.running(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EffectKind::Shatter(fx) => fx.params(),
            EffectKind::CountUp(c) => c.params(),
            EffectKind::Countdown(c) => c.params(),
            EffectKind::LiveFeed(f) => f.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EffectKind::Shatter(fx) => fx.param_schema(),
            EffectKind::CountUp(c) => c.param_schema(),
            EffectKind::Countdown(c) => c.param_schema(),
            EffectKind::LiveFeed(f) => f.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_name_constructs_every_listed_effect() {
        for name in EffectKind::list_effects() {
            let effect = EffectKind::from_name(name, 640.0, 480.0, 42, &json!({}));
            assert!(effect.is_ok(), "failed to construct '{name}'");
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = EffectKind::from_name("nonexistent", 640.0, 480.0, 42, &json!({}));
        assert!(matches!(result, Err(FxError::UnknownEffect(_))));
    }

    #[test]
    fn list_effects_includes_shatter() {
        assert!(EffectKind::list_effects().contains(&"shatter"));
    }

    #[test]
    fn shatter_surface_matches_the_viewport() {
        let fx = EffectKind::from_name("shatter", 640.0, 480.0, 42, &json!({})).unwrap();
        let surface = fx.surface().unwrap();
        assert_eq!(surface.width(), 640);
        assert_eq!(surface.height(), 480);
    }

    #[test]
    fn counters_have_no_surface() {
        for name in ["count-up", "countdown", "live-feed"] {
            let fx = EffectKind::from_name(name, 640.0, 480.0, 42, &json!({})).unwrap();
            assert!(fx.surface().is_none(), "'{name}' should not draw");
        }
    }

    #[test]
    fn counters_have_displays_and_shatter_does_not() {
        let fx = EffectKind::from_name("countdown", 0.0, 0.0, 42, &json!({})).unwrap();
        assert_eq!(fx.display().as_deref(), Some("5"));
        let fx = EffectKind::from_name("shatter", 640.0, 480.0, 42, &json!({})).unwrap();
        assert!(fx.display().is_none());
    }

    #[test]
    fn trait_delegation_trigger_and_tick() {
        let mut fx = EffectKind::from_name("shatter", 320.0, 240.0, 42, &json!({})).unwrap();
        assert!(!fx.running());
        fx.trigger();
        assert!(fx.running());
        assert_eq!(fx.tick(), Flow::Running);
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        let fx = EffectKind::from_name("shatter", 320.0, 240.0, 42, &json!({})).unwrap();
        assert!(fx.params().get("gravity").is_some());
        assert!(fx.param_schema().get("gravity").is_some());
        let fx = EffectKind::from_name("count-up", 0.0, 0.0, 42, &json!({})).unwrap();
        assert!(fx.params().get("duration").is_some());
    }

    #[test]
    fn invalid_params_fail_construction() {
        let result = EffectKind::from_name("shatter", 320.0, 240.0, 42, &json!({"columns": 0}));
        assert!(matches!(result, Err(FxError::InvalidGrid { .. })));
    }

    #[test]
    fn shatter_draws_into_its_surface() {
        let mut fx = EffectKind::from_name("shatter", 100.0, 100.0, 42, &json!({})).unwrap();
        fx.trigger();
        fx.tick();
        let surface = fx.surface().unwrap();
        assert!(
            surface.pixels().iter().any(|&b| b != 0),
            "a tick should leave visible shards on the surface"
        );
    }

    #[test]
    fn determinism_same_seed_same_pixels() {
        let mut a = EffectKind::from_name("shatter", 200.0, 150.0, 99, &json!({})).unwrap();
        let mut b = EffectKind::from_name("shatter", 200.0, 150.0, 99, &json!({})).unwrap();
        a.trigger();
        b.trigger();
        for _ in 0..10 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.surface().unwrap().pixels(), b.surface().unwrap().pixels());
    }

    #[test]
    fn from_cue_builds_the_described_effect() {
        let mut cue = Cue::new("countdown", 0.0, 0.0, 7);
        cue.params = json!({"start": 3, "interval": 1});
        let mut fx = EffectKind::from_cue(&cue).unwrap();
        fx.trigger();
        assert_eq!(fx.tick(), Flow::Running);
        assert_eq!(fx.display().as_deref(), Some("2"));
    }

    #[test]
    fn from_cue_rejects_invalid_cues() {
        let cue = Cue::new("", 640.0, 480.0, 7);
        assert!(matches!(
            EffectKind::from_cue(&cue),
            Err(FxError::InvalidCue(_))
        ));
        let cue = Cue::new("shatter", f64::NAN, 480.0, 7);
        assert!(matches!(
            EffectKind::from_cue(&cue),
            Err(FxError::InvalidCue(_))
        ));
    }

    #[test]
    fn degenerate_viewport_shatter_settles_immediately() {
        let mut fx = EffectKind::from_name("shatter", 0.0, 0.0, 42, &json!({})).unwrap();
        fx.trigger();
        assert_eq!(fx.tick(), Flow::Settled);
    }

    #[test]
    fn object_safety() {
        let fx = EffectKind::from_name("count-up", 0.0, 0.0, 42, &json!({})).unwrap();
        let mut boxed: Box<dyn Effect> = Box::new(fx);
        boxed.trigger();
        assert!(boxed.running());
    }
}
