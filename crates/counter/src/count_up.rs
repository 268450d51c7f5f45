//! Linear count-up tween.

use serde_json::{json, Value};
use storyline_fx_core::error::FxError;
use storyline_fx_core::math::{lerp, progress};
use storyline_fx_core::params::{param_bool, param_f64, param_usize};
use storyline_fx_core::{Effect, Flow};

use crate::format::format_grouped;

/// Default tween start value.
const DEFAULT_FROM: f64 = 0.0;
/// Default tween target value.
const DEFAULT_TO: f64 = 100.0;
/// Default tween length in ticks (two seconds at a 60 Hz host).
const DEFAULT_DURATION: usize = 120;
/// Default thousands-grouping flag for the display string.
const DEFAULT_GROUP_DIGITS: bool = false;

/// Parameters for [`CountUp`].
#[derive(Debug, Clone, Copy)]
pub struct CountUpParams {
    /// Value the tween starts from.
    pub from: f64,
    /// Value the tween lands on.
    pub to: f64,
    /// Tween length in ticks. Zero settles on the first tick.
    pub duration: usize,
    /// Whether [`CountUp::display`] groups thousands with `,`.
    pub group_digits: bool,
}

impl Default for CountUpParams {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM,
            to: DEFAULT_TO,
            duration: DEFAULT_DURATION,
            group_digits: DEFAULT_GROUP_DIGITS,
        }
    }
}

impl CountUpParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            from: param_f64(params, "from", DEFAULT_FROM),
            to: param_f64(params, "to", DEFAULT_TO),
            duration: param_usize(params, "duration", DEFAULT_DURATION),
            group_digits: param_bool(params, "group_digits", DEFAULT_GROUP_DIGITS),
        }
    }

    /// Rejects endpoints that would poison the tween arithmetic.
    pub fn validate(&self) -> Result<(), FxError> {
        for (name, value) in [("from", self.from), ("to", self.to)] {
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

/// Animated number that tweens linearly from one value to another.
///
/// `trigger` replays the configured `from` to `to` tween. [`CountUp::retarget`]
/// instead re-aims mid-flight: the tween restarts from the current value
/// toward the new target, the way the storyline page's profit counter keeps
/// re-aiming at a higher total every few seconds.
///
/// The displayed value is the floor of the interpolated value, optionally
/// grouped in thousands.
pub struct CountUp {
    params: CountUpParams,
    from: f64,
    to: f64,
    value: f64,
    elapsed: usize,
    running: bool,
}

impl CountUp {
    /// Creates an idle counter showing the configured start value.
    pub fn new(params: CountUpParams) -> Result<Self, FxError> {
        params.validate()?;
        Ok(Self {
            params,
            from: params.from,
            to: params.to,
            value: params.from,
            elapsed: 0,
            running: false,
        })
    }

    /// Creates a counter from a JSON params object.
    pub fn from_json(json_params: &Value) -> Result<Self, FxError> {
        Self::new(CountUpParams::from_json(json_params))
    }

    /// The current interpolated value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value the current run is heading toward.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// The display string: floored, optionally grouped.
    pub fn display(&self) -> String {
        let floored = self.value.floor() as i64;
        if self.params.group_digits {
            format_grouped(floored)
        } else {
            floored.to_string()
        }
    }

    /// Re-aims the tween at a new target, starting from the current value.
    ///
    /// Works mid-run and after settling; the fresh run supersedes the old
    /// one. A non-finite target is discarded.
    pub fn retarget(&mut self, to: f64) {
        if !to.is_finite() {
            return;
        }
        self.from = self.value;
        self.to = to;
        self.elapsed = 0;
        self.running = true;
    }
}

impl Effect for CountUp {
    /// Restarts the configured tween. A no-op while a run is in progress.
    fn trigger(&mut self) {
        if self.running {
            return;
        }
        self.from = self.params.from;
        self.to = self.params.to;
        self.value = self.from;
        self.elapsed = 0;
        self.running = true;
    }

    fn tick(&mut self) -> Flow {
        if !self.running {
            return Flow::Settled;
        }
        self.elapsed += 1;
        let t = progress(self.elapsed, self.params.duration);
        self.value = lerp(self.from, self.to, t);
        if t >= 1.0 {
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
            "from": self.params.from,
            "to": self.params.to,
            "duration": self.params.duration,
            "group_digits": self.params.group_digits,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "from": {
                "type": "number",
                "default": DEFAULT_FROM,
                "description": "Value the tween starts from"
            },
            "to": {
                "type": "number",
                "default": DEFAULT_TO,
                "description": "Value the tween lands on"
            },
            "duration": {
                "type": "integer",
                "default": DEFAULT_DURATION,
                "min": 0,
                "max": 100_000,
                "description": "Tween length in ticks"
            },
            "group_digits": {
                "type": "boolean",
                "default": DEFAULT_GROUP_DIGITS,
                "description": "Group thousands with ',' in the display string"
            }
        })
    }
}
