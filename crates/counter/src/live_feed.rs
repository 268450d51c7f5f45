//! Non-settling random walk over a live stat.

use serde_json::{json, Value};
use storyline_fx_core::params::param_usize;
use storyline_fx_core::prng::{RandomSource, Xorshift64};
use storyline_fx_core::{Effect, Flow};

/// Default starting stat value, the live-orders figure the page seeds.
const DEFAULT_INITIAL: usize = 24;
/// Default ticks between update attempts (five seconds at a 60 Hz host).
const DEFAULT_INTERVAL: usize = 300;

/// Parameters for [`LiveFeed`].
#[derive(Debug, Clone, Copy)]
pub struct LiveFeedParams {
    /// Stat value the walk starts from.
    pub initial: usize,
    /// Ticks between update attempts. Zero attempts on every tick.
    pub interval: usize,
}

impl Default for LiveFeedParams {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl LiveFeedParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            initial: param_usize(params, "initial", DEFAULT_INITIAL),
            interval: param_usize(params, "interval", DEFAULT_INTERVAL),
        }
    }
}

/// Random walk that nudges a non-negative stat while a page idles.
///
/// Each interval the feed flips a coin; on success it draws a step from
/// {-1, 0, +1} and applies it unless the result would go negative, in
/// which case the step is discarded. The gate draw always happens first
/// and the step draw only when the gate passes, so scripted sources see
/// the same consumption order as the page's `Math.random()` calls.
///
/// A live feed never settles: `tick` reports `Running` until the host
/// drops it.
pub struct LiveFeed<R: RandomSource = Xorshift64> {
    params: LiveFeedParams,
    value: i64,
    elapsed: usize,
    rng: R,
    running: bool,
}

impl LiveFeed<Xorshift64> {
    /// Creates a live feed with a seeded [`Xorshift64`] source.
    pub fn new(seed: u64, params: LiveFeedParams) -> Self {
        Self::with_source(Xorshift64::new(seed), params)
    }

    /// Creates a live feed from a JSON params object.
    pub fn from_json(seed: u64, json_params: &Value) -> Self {
        Self::new(seed, LiveFeedParams::from_json(json_params))
    }
}

impl<R: RandomSource> LiveFeed<R> {
    /// Creates a live feed with an explicit random source.
    pub fn with_source(rng: R, params: LiveFeedParams) -> Self {
        Self {
            params,
            value: params.initial as i64,
            elapsed: 0,
            rng,
            running: false,
        }
    }

    /// The current stat value. Never negative.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The display string for the current stat value.
    pub fn display(&self) -> String {
        self.value.to_string()
    }
}

impl<R: RandomSource> Effect for LiveFeed<R> {
    /// Starts the walk from the current value. A no-op while running.
    fn trigger(&mut self) {
        if self.running {
            return;
        }
        self.elapsed = 0;
        self.running = true;
    }

    fn tick(&mut self) -> Flow {
        if !self.running {
            return Flow::Settled;
        }
        self.elapsed += 1;
        if self.elapsed >= self.params.interval {
            self.elapsed = 0;
            if self.rng.next_f64() > 0.5 {
                let delta = (self.rng.next_f64() * 3.0).floor() as i64 - 1;
                let next = self.value + delta;
                if next >= 0 {
                    self.value = next;
                }
            }
        }
        Flow::Running
    }

    fn running(&self) -> bool {
        self.running
    }

    fn params(&self) -> Value {
        json!({
            "initial": self.params.initial,
            "interval": self.params.interval,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "initial": {
                "type": "integer",
                "default": DEFAULT_INITIAL,
                "min": 0,
                "max": 1_000_000,
                "description": "Stat value the walk starts from"
            },
            "interval": {
                "type": "integer",
                "default": DEFAULT_INTERVAL,
                "min": 0,
                "max": 100_000,
                "description": "Ticks between update attempts"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that replays a fixed list of draws, cycling, and counts calls.
    struct Script {
        draws: Vec<f64>,
        calls: usize,
    }

    impl Script {
        fn new(draws: &[f64]) -> Self {
            Self {
                draws: draws.to_vec(),
                calls: 0,
            }
        }
    }

    impl RandomSource for Script {
        fn next_f64(&mut self) -> f64 {
            let draw = self.draws[self.calls % self.draws.len()];
            self.calls += 1;
            draw
        }
    }

    fn feed(draws: &[f64], initial: usize, interval: usize) -> LiveFeed<Script> {
        LiveFeed::with_source(Script::new(draws), LiveFeedParams { initial, interval })
    }

    #[test]
    fn new_starts_idle_at_the_initial_value() {
        let f = LiveFeed::new(42, LiveFeedParams::default());
        assert!(!f.running());
        assert_eq!(f.value(), 24);
        assert_eq!(f.display(), "24");
    }

    #[test]
    fn tick_without_trigger_reports_settled() {
        let mut f = LiveFeed::new(42, LiveFeedParams::default());
        assert_eq!(f.tick(), Flow::Settled);
    }

    #[test]
    fn never_settles_once_running() {
        let mut f = LiveFeed::new(42, LiveFeedParams { initial: 24, interval: 1 });
        f.trigger();
        for n in 1..=10_000 {
            assert_eq!(f.tick(), Flow::Running, "tick {n}");
        }
        assert!(f.running());
    }

    #[test]
    fn updates_only_on_interval_ticks() {
        // Gate 0.9 passes and u=0.9 maps to a +1 step, so the value climbs
        // by exactly one per interval.
        let mut f = feed(&[0.9], 10, 3);
        f.trigger();
        f.tick();
        f.tick();
        assert_eq!(f.value(), 10, "no update before the interval elapses");
        f.tick();
        assert_eq!(f.value(), 11);
        for _ in 0..27 {
            f.tick();
        }
        assert_eq!(f.value(), 20, "one step per interval");
    }

    #[test]
    fn failed_gate_consumes_one_draw_and_changes_nothing() {
        let mut f = feed(&[0.2], 10, 1);
        f.trigger();
        for _ in 0..5 {
            f.tick();
        }
        assert_eq!(f.value(), 10);
        assert_eq!(f.rng.calls, 5, "only the gate draw per attempt");
    }

    #[test]
    fn passed_gate_consumes_the_step_draw_too() {
        let mut f = feed(&[0.9], 10, 1);
        f.trigger();
        for _ in 0..5 {
            f.tick();
        }
        assert_eq!(f.rng.calls, 10, "gate plus step draw per attempt");
    }

    #[test]
    fn gate_at_exactly_half_fails() {
        let mut f = feed(&[0.5], 10, 1);
        f.trigger();
        f.tick();
        assert_eq!(f.value(), 10);
        assert_eq!(f.rng.calls, 1);
    }

    #[test]
    fn step_draw_maps_to_minus_zero_plus() {
        // Step draw u: [0, 1/3) -> -1, [1/3, 2/3) -> 0, [2/3, 1) -> +1.
        for (u, expected) in [(0.1, 9), (0.5, 10), (0.9, 11)] {
            let mut f = feed(&[0.9, u], 10, 1);
            f.trigger();
            f.tick();
            assert_eq!(f.value(), expected, "step draw {u}");
        }
    }

    #[test]
    fn steps_below_zero_are_discarded() {
        // Gate passes, step draw maps to -1, value already 0.
        let mut f = feed(&[0.9, 0.1], 0, 1);
        f.trigger();
        for _ in 0..10 {
            f.tick();
        }
        assert_eq!(f.value(), 0, "a step below zero leaves the value alone");
    }

    #[test]
    fn trigger_while_running_does_not_reset_the_phase() {
        let mut f = feed(&[0.9], 10, 4);
        f.trigger();
        f.tick();
        f.tick();
        f.trigger();
        f.tick();
        f.tick();
        assert_eq!(f.value(), 11, "the mid-run trigger must not stretch the interval");
    }

    #[test]
    fn runs_are_deterministic_per_seed() {
        let params = LiveFeedParams { initial: 24, interval: 1 };
        let mut a = LiveFeed::new(7, params);
        let mut b = LiveFeed::new(7, params);
        a.trigger();
        b.trigger();
        for _ in 0..1000 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.value(), b.value());
    }

    #[test]
    fn from_json_uses_defaults_for_empty_json() {
        let f = LiveFeed::from_json(42, &json!({}));
        assert_eq!(f.value(), DEFAULT_INITIAL as i64);
        assert_eq!(f.params()["interval"], DEFAULT_INTERVAL);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn value_never_goes_negative(seed: u64, ticks in 0_usize..2000) {
                let mut f = LiveFeed::new(
                    seed,
                    LiveFeedParams { initial: 1, interval: 1 },
                );
                f.trigger();
                for _ in 0..ticks {
                    f.tick();
                    prop_assert!(f.value() >= 0);
                }
            }

            #[test]
            fn steps_are_at_most_one_apart(seed: u64) {
                let mut f = LiveFeed::new(
                    seed,
                    LiveFeedParams { initial: 24, interval: 1 },
                );
                f.trigger();
                let mut prev = f.value();
                for _ in 0..500 {
                    f.tick();
                    prop_assert!((f.value() - prev).abs() <= 1);
                    prev = f.value();
                }
            }
        }
    }
}
