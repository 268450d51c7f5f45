#![deny(unsafe_code)]
//! Glass-shatter particle field effect.
//!
//! On trigger, the viewport is cut into a columns x rows grid of rectangular
//! shards. Each shard gets a random sideways kick, a random downward impulse,
//! and a random spin, then falls under constant gravity while fading out.
//! Every tick clears the bound surface, advances all shards, and redraws the
//! still-visible ones as rotated translucent rectangles. The run settles once
//! every shard has fallen past the bottom of the viewport plus a margin.
//!
//! The settle test is position-only: a fully faded shard keeps the run alive
//! until it falls past the bound. Faded shards stay in the simulation and are
//! only skipped at draw time.

use glam::DVec2;
use serde_json::{json, Value};
use storyline_fx_core::color::Rgba;
use storyline_fx_core::error::FxError;
use storyline_fx_core::params::{param_f64, param_usize};
use storyline_fx_core::prng::{RandomSource, Xorshift64};
use storyline_fx_core::surface::Surface;
use storyline_fx_core::viewport::Viewport;
use storyline_fx_core::{Effect, Flow};

/// Default number of grid columns.
const DEFAULT_COLUMNS: usize = 10;
/// Default number of grid rows.
const DEFAULT_ROWS: usize = 8;
/// Default downward acceleration added to vy each tick.
const DEFAULT_GRAVITY: f64 = 0.5;
/// Default opacity lost per tick.
const DEFAULT_FADE_RATE: f64 = 0.01;
/// Default distance past the bottom edge a shard must fall before it
/// counts as settled.
const DEFAULT_MARGIN: f64 = 100.0;
/// Default horizontal scatter: initial vx is drawn from [-scatter, scatter).
const DEFAULT_SCATTER: f64 = 10.0;
/// Default minimum initial downward velocity.
const DEFAULT_IMPULSE_MIN: f64 = 5.0;
/// Default maximum initial downward velocity.
const DEFAULT_IMPULSE_MAX: f64 = 15.0;
/// Default spin: rotation speed is drawn from [-spin, spin) radians per tick.
const DEFAULT_SPIN: f64 = 0.1;
/// Default shard fill, a translucent indigo (`#6366f14d`).
///
/// Alpha is expressed in 255ths so the hex form round-trips exactly.
const DEFAULT_FILL: Rgba = Rgba::new(99.0 / 255.0, 102.0 / 255.0, 241.0 / 255.0, 77.0 / 255.0);
/// Default shard outline, a translucent white.
const DEFAULT_STROKE: Rgba = Rgba::new(1.0, 1.0, 1.0, 0.5);

/// Parameters for the shatter effect.
///
/// Use [`Default`] for the stock storyline look: a 10x8 grid of translucent
/// indigo shards falling under gravity 0.5.
#[derive(Debug, Clone, Copy)]
pub struct ShatterParams {
    /// Number of grid columns.
    pub columns: usize,
    /// Number of grid rows.
    pub rows: usize,
    /// Downward acceleration added to vy each tick.
    pub gravity: f64,
    /// Opacity lost per tick.
    pub fade_rate: f64,
    /// Distance past the bottom edge a shard must fall to count as settled.
    pub margin: f64,
    /// Horizontal scatter: initial vx is drawn from [-scatter, scatter).
    pub scatter: f64,
    /// Minimum initial downward velocity.
    pub impulse_min: f64,
    /// Maximum initial downward velocity.
    pub impulse_max: f64,
    /// Spin: rotation speed is drawn from [-spin, spin) radians per tick.
    pub spin: f64,
    /// Shard fill color.
    pub fill: Rgba,
    /// Shard outline color.
    pub stroke: Rgba,
}

impl Default for ShatterParams {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            gravity: DEFAULT_GRAVITY,
            fade_rate: DEFAULT_FADE_RATE,
            margin: DEFAULT_MARGIN,
            scatter: DEFAULT_SCATTER,
            impulse_min: DEFAULT_IMPULSE_MIN,
            impulse_max: DEFAULT_IMPULSE_MAX,
            spin: DEFAULT_SPIN,
            fill: DEFAULT_FILL,
            stroke: DEFAULT_STROKE,
        }
    }
}

impl ShatterParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// Colors are hex strings (`"#rrggbb"` or `"#rrggbbaa"`); unparseable
    /// color values fall back to the defaults like any other bad key.
    pub fn from_json(params: &Value) -> Self {
        Self {
            columns: param_usize(params, "columns", DEFAULT_COLUMNS),
            rows: param_usize(params, "rows", DEFAULT_ROWS),
            gravity: param_f64(params, "gravity", DEFAULT_GRAVITY),
            fade_rate: param_f64(params, "fade_rate", DEFAULT_FADE_RATE),
            margin: param_f64(params, "margin", DEFAULT_MARGIN),
            scatter: param_f64(params, "scatter", DEFAULT_SCATTER),
            impulse_min: param_f64(params, "impulse_min", DEFAULT_IMPULSE_MIN),
            impulse_max: param_f64(params, "impulse_max", DEFAULT_IMPULSE_MAX),
            spin: param_f64(params, "spin", DEFAULT_SPIN),
            fill: param_color(params, "fill", DEFAULT_FILL),
            stroke: param_color(params, "stroke", DEFAULT_STROKE),
        }
    }

    /// Checks the constraints that keep a run finite.
    ///
    /// The grid must be non-empty, gravity finite and positive (otherwise
    /// shards would never fall past the settle bound), fade finite and
    /// non-negative, and the remaining kinematic parameters finite.
    pub fn validate(&self) -> Result<(), FxError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(FxError::InvalidGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(FxError::InvalidGravity(self.gravity));
        }
        if !self.fade_rate.is_finite() || self.fade_rate < 0.0 {
            return Err(FxError::InvalidFadeRate(self.fade_rate));
        }
        for (name, value) in [
            ("margin", self.margin),
            ("scatter", self.scatter),
            ("impulse_min", self.impulse_min),
            ("impulse_max", self.impulse_max),
            ("spin", self.spin),
        ] {
            if !value.is_finite() {
                return Err(FxError::NonFiniteParam {
                    name: name.into(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Extracts an [`Rgba`] from `params[name]`, returning `default` if the key
/// is missing, the wrong type, or not a valid hex color.
fn param_color(params: &Value, name: &str, default: Rgba) -> Rgba {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| Rgba::from_hex(s).ok())
        .unwrap_or(default)
}

/// One falling fragment of the shattered viewport.
///
/// Position is the rectangle's top-left corner; rotation is applied about
/// its center at draw time. Alpha is not clamped: it keeps decreasing past
/// zero and only gates drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shard {
    /// Top-left corner position.
    pub pos: DVec2,
    /// Velocity in surface units per tick.
    pub vel: DVec2,
    /// Rectangle width, fixed at trigger time.
    pub width: f64,
    /// Rectangle height, fixed at trigger time.
    pub height: f64,
    /// Current rotation in radians.
    pub rotation: f64,
    /// Rotation added per tick, fixed at trigger time.
    pub rotation_speed: f64,
    /// Current opacity. Starts at 1, unclamped.
    pub alpha: f64,
}

impl Shard {
    /// Advances the shard by one tick: move, then accelerate, spin, fade.
    pub fn step(&mut self, gravity: f64, fade_rate: f64) {
        self.pos += self.vel;
        self.vel.y += gravity;
        self.rotation += self.rotation_speed;
        self.alpha -= fade_rate;
    }
}

/// Glass-shatter particle field bound to a drawing surface.
///
/// Generic over the [`Surface`] backend and the [`RandomSource`] that
/// scatters shard velocities, so tests can substitute recorders and
/// scripted draws. Production code uses [`Xorshift64`].
pub struct Shatter<S: Surface, R: RandomSource = Xorshift64> {
    surface: S,
    viewport: Viewport,
    params: ShatterParams,
    rng: R,
    shards: Vec<Shard>,
    running: bool,
    settle_bound: f64,
}

impl<S: Surface> Shatter<S, Xorshift64> {
    /// Creates a shatter effect with a seeded [`Xorshift64`] source.
    ///
    /// Validates the parameters; ticking never fails after this point.
    pub fn new(
        surface: S,
        viewport: Viewport,
        seed: u64,
        params: ShatterParams,
    ) -> Result<Self, FxError> {
        Self::with_source(surface, viewport, Xorshift64::new(seed), params)
    }

    /// Creates a shatter effect from a JSON params object.
    ///
    /// Extracts grid, kinematic, and color parameters from the JSON,
    /// falling back to defaults for missing keys.
    pub fn from_json(
        surface: S,
        viewport: Viewport,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, FxError> {
        Self::new(surface, viewport, seed, ShatterParams::from_json(json_params))
    }
}

impl<S: Surface, R: RandomSource> Shatter<S, R> {
    /// Creates a shatter effect with an explicit random source.
    pub fn with_source(
        surface: S,
        viewport: Viewport,
        rng: R,
        params: ShatterParams,
    ) -> Result<Self, FxError> {
        params.validate()?;
        Ok(Self {
            surface,
            viewport,
            params,
            rng,
            shards: Vec::new(),
            running: false,
            settle_bound: 0.0,
        })
    }

    /// Replaces the stored viewport.
    ///
    /// An in-progress run is unaffected: shard geometry and the settle
    /// bound keep their trigger-time values. The new size applies from
    /// the next trigger.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Read-only access to the current shard states.
    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    /// The viewport the next trigger will shatter.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Read-only access to the bound surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the effect and returns the bound surface.
    ///
    /// For hosts that want the final buffer back after a run.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Current gravity (acceleration per tick).
    pub fn gravity(&self) -> f64 {
        self.params.gravity
    }

    /// Current fade per tick.
    pub fn fade_rate(&self) -> f64 {
        self.params.fade_rate
    }

    /// Rebuilds the shard grid from the current viewport.
    ///
    /// A degenerate viewport yields an empty grid, which makes the run
    /// settle vacuously on its first tick. Per shard, the draw order from
    /// the random source is vx, vy, rotation speed.
    fn seed_shards(&mut self) {
        self.shards.clear();
        if self.viewport.is_degenerate() {
            return;
        }
        let cell_w = self.viewport.width / self.params.columns as f64;
        let cell_h = self.viewport.height / self.params.rows as f64;
        for col in 0..self.params.columns {
            for row in 0..self.params.rows {
                let vx = self.rng.next_range(-self.params.scatter, self.params.scatter);
                let vy = self
                    .rng
                    .next_range(self.params.impulse_min, self.params.impulse_max);
                let rotation_speed = self.rng.next_range(-self.params.spin, self.params.spin);
                self.shards.push(Shard {
                    pos: DVec2::new(col as f64 * cell_w, row as f64 * cell_h),
                    vel: DVec2::new(vx, vy),
                    width: cell_w,
                    height: cell_h,
                    rotation: 0.0,
                    rotation_speed,
                    alpha: 1.0,
                });
            }
        }
    }
}

impl<S: Surface, R: RandomSource> Effect for Shatter<S, R> {
    /// Shatters the current viewport into a fresh shard grid.
    ///
    /// A no-op while a run is in progress: shard state, the settle bound,
    /// and the random source are all left untouched.
    fn trigger(&mut self) {
        if self.running {
            return;
        }
        self.seed_shards();
        self.settle_bound = self.viewport.height + self.params.margin;
        self.running = true;
    }

    fn tick(&mut self) -> Flow {
        if !self.running {
            return Flow::Settled;
        }
        self.surface.clear();
        let p = self.params;
        let mut settled = true;
        for shard in &mut self.shards {
            shard.step(p.gravity, p.fade_rate);
            if shard.pos.y < self.settle_bound {
                settled = false;
            }
            if shard.alpha > 0.0 {
                draw_shard(&mut self.surface, shard, p.fill, p.stroke);
            }
        }
        if settled {
            self.running = false;
            Flow::Settled
        } else {
            Flow::Running
        }
    }

    fn running(&self) -> bool {
        self.running
    }

    fn params(&self) -> Value {
        json!({
            "columns": self.params.columns,
            "rows": self.params.rows,
            "gravity": self.params.gravity,
            "fade_rate": self.params.fade_rate,
            "margin": self.params.margin,
            "scatter": self.params.scatter,
            "impulse_min": self.params.impulse_min,
            "impulse_max": self.params.impulse_max,
            "spin": self.params.spin,
            "fill": self.params.fill,
            "stroke": self.params.stroke,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "columns": {
                "type": "integer",
                "default": DEFAULT_COLUMNS,
                "min": 1,
                "max": 64,
                "description": "Number of grid columns"
            },
            "rows": {
                "type": "integer",
                "default": DEFAULT_ROWS,
                "min": 1,
                "max": 64,
                "description": "Number of grid rows"
            },
            "gravity": {
                "type": "number",
                "default": DEFAULT_GRAVITY,
                "min": 0.01,
                "max": 10.0,
                "description": "Downward acceleration added to vy each tick"
            },
            "fade_rate": {
                "type": "number",
                "default": DEFAULT_FADE_RATE,
                "min": 0.0,
                "max": 1.0,
                "description": "Opacity lost per tick"
            },
            "margin": {
                "type": "number",
                "default": DEFAULT_MARGIN,
                "min": 0.0,
                "max": 1000.0,
                "description": "Distance past the bottom edge before a shard settles"
            },
            "scatter": {
                "type": "number",
                "default": DEFAULT_SCATTER,
                "min": 0.0,
                "max": 100.0,
                "description": "Half-range of the initial horizontal velocity"
            },
            "impulse_min": {
                "type": "number",
                "default": DEFAULT_IMPULSE_MIN,
                "min": 0.0,
                "max": 100.0,
                "description": "Minimum initial downward velocity"
            },
            "impulse_max": {
                "type": "number",
                "default": DEFAULT_IMPULSE_MAX,
                "min": 0.0,
                "max": 100.0,
                "description": "Maximum initial downward velocity"
            },
            "spin": {
                "type": "number",
                "default": DEFAULT_SPIN,
                "min": 0.0,
                "max": 3.2,
                "description": "Half-range of the rotation speed in radians per tick"
            },
            "fill": {
                "type": "string",
                "default": DEFAULT_FILL,
                "description": "Shard fill color as a hex string"
            },
            "stroke": {
                "type": "string",
                "default": DEFAULT_STROKE,
                "description": "Shard outline color as a hex string"
            }
        })
    }
}

/// Draws one shard as a rotated, filled and stroked rectangle about its center.
fn draw_shard<S: Surface>(surface: &mut S, shard: &Shard, fill: Rgba, stroke: Rgba) {
    surface.save();
    surface.translate(
        shard.pos.x + shard.width / 2.0,
        shard.pos.y + shard.height / 2.0,
    );
    surface.rotate(shard.rotation);
    surface.set_alpha(shard.alpha);
    surface.fill_rect(
        -shard.width / 2.0,
        -shard.height / 2.0,
        shard.width,
        shard.height,
        fill,
    );
    surface.stroke_rect(
        -shard.width / 2.0,
        -shard.height / 2.0,
        shard.width,
        shard.height,
        stroke,
    );
    surface.restore();
}
