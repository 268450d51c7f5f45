//! Stepped integer countdown.

use serde_json::{json, Value};
use storyline_fx_core::params::param_usize;
use storyline_fx_core::{Effect, Flow};

/// Default starting count.
const DEFAULT_START: usize = 5;
/// Default ticks per step (one second at a 60 Hz host).
const DEFAULT_INTERVAL: usize = 60;

/// Parameters for [`Countdown`].
#[derive(Debug, Clone, Copy)]
pub struct CountdownParams {
    /// Count to start from.
    pub start: usize,
    /// Ticks between steps. Zero steps on every tick.
    pub interval: usize,
}

impl Default for CountdownParams {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl CountdownParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            start: param_usize(params, "start", DEFAULT_START),
            interval: param_usize(params, "interval", DEFAULT_INTERVAL),
        }
    }
}

/// Integer counter stepping down to zero, one step per interval.
///
/// Settles on the tick that lands on zero. A zero `start` settles
/// vacuously on the first tick.
pub struct Countdown {
    params: CountdownParams,
    remaining: usize,
    elapsed_in_step: usize,
    running: bool,
}

impl Countdown {
    pub fn new(params: CountdownParams) -> Self {
        Self {
            params,
            remaining: params.start,
            elapsed_in_step: 0,
            running: false,
        }
    }

    /// Creates a countdown from a JSON params object.
    pub fn from_json(json_params: &Value) -> Self {
        Self::new(CountdownParams::from_json(json_params))
    }

    /// The current count.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// The display string for the current count.
    pub fn display(&self) -> String {
        self.remaining.to_string()
    }
}

impl Effect for Countdown {
    /// Resets the count and starts stepping. A no-op while running.
    fn trigger(&mut self) {
        if self.running {
            return;
        }
        self.remaining = self.params.start;
        self.elapsed_in_step = 0;
        self.running = true;
    }

    fn tick(&mut self) -> Flow {
        if !self.running {
            return Flow::Settled;
        }
        if self.remaining == 0 {
            self.running = false;
            return Flow::Settled;
        }
        self.elapsed_in_step += 1;
        if self.elapsed_in_step >= self.params.interval {
            self.elapsed_in_step = 0;
            self.remaining -= 1;
            if self.remaining == 0 {
                self.running = false;
                return Flow::Settled;
            }
        }
        Flow::Running
    }

    fn running(&self) -> bool {
        self.running
    }

    fn params(&self) -> Value {
        json!({
            "start": self.params.start,
            "interval": self.params.interval,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "start": {
                "type": "integer",
                "default": DEFAULT_START,
                "min": 0,
                "max": 1000,
                "description": "Count to start from"
            },
            "interval": {
                "type": "integer",
                "default": DEFAULT_INTERVAL,
                "min": 0,
                "max": 100_000,
                "description": "Ticks between steps"
            }
        })
    }
}
