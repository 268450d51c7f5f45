//! The core `Effect` trait that every storyline effect implements.
//!
//! The trait is object-safe so effects can be driven as `dyn Effect` by a
//! host scheduler without knowing the concrete type.

use serde_json::Value;

/// Outcome of advancing an effect by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The run wants further ticks.
    Running,
    /// The run has reached its terminal state, or no run is active.
    Settled,
}

/// Core trait for step-driven storyline effects.
///
/// Each effect advances one tick at a time under an external scheduler
/// (requestAnimationFrame in a browser, a plain loop in tests and the CLI).
/// Ticking is infallible: configuration problems are rejected at
/// construction, never at step time.
///
/// This trait is **object-safe**: you can use `Box<dyn Effect>` or
/// `&mut dyn Effect` for runtime polymorphism.
pub trait Effect {
    /// Begins a run. A no-op while a run is already in progress.
    fn trigger(&mut self);

    /// Advances the effect by one tick.
    ///
    /// Returns [`Flow::Running`] while the run wants further ticks and
    /// [`Flow::Settled`] once it has finished. Without an active run this
    /// is a no-op that reports `Settled` immediately.
    fn tick(&mut self) -> Flow;

    /// Whether a run is currently in progress.
    fn running(&self) -> bool;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal effect used to verify trait object safety and the
    /// trigger/tick/settle contract.
    struct MockEffect {
        ticks: usize,
        budget: usize,
        running: bool,
    }

    impl MockEffect {
        fn new(budget: usize) -> Self {
            Self {
                ticks: 0,
                budget,
                running: false,
            }
        }
    }

    impl Effect for MockEffect {
        fn trigger(&mut self) {
            if self.running {
                return;
            }
            self.ticks = 0;
            self.running = true;
        }

        fn tick(&mut self) -> Flow {
            if !self.running {
                return Flow::Settled;
            }
            self.ticks += 1;
            if self.ticks >= self.budget {
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
            json!({"ticks": self.ticks, "budget": self.budget})
        }

        fn param_schema(&self) -> Value {
            json!({
                "budget": {
                    "type": "integer",
                    "default": 0,
                    "description": "Ticks until the run settles"
                }
            })
        }
    }

    #[test]
    fn effect_trait_is_object_safe() {
        // This test verifies that Effect can be used as a trait object.
        // If the trait were not object-safe, this would fail to compile.
        let effect: Box<dyn Effect> = Box::new(MockEffect::new(3));
        assert!(!effect.running());
    }

    #[test]
    fn tick_without_trigger_is_a_settled_noop() {
        let mut effect = MockEffect::new(3);
        assert_eq!(effect.tick(), Flow::Settled);
        assert_eq!(effect.ticks, 0);
    }

    #[test]
    fn trigger_tick_settle_cycle() {
        let mut effect = MockEffect::new(3);
        effect.trigger();
        assert!(effect.running());
        assert_eq!(effect.tick(), Flow::Running);
        assert_eq!(effect.tick(), Flow::Running);
        assert_eq!(effect.tick(), Flow::Settled);
        assert!(!effect.running());
    }

    #[test]
    fn trigger_while_running_does_not_reset() {
        let mut effect = MockEffect::new(5);
        effect.trigger();
        effect.tick();
        effect.tick();
        effect.trigger();
        assert_eq!(effect.ticks, 2, "mid-run trigger must not reset progress");
    }

    #[test]
    fn params_reflects_state() {
        let mut effect = MockEffect::new(5);
        effect.trigger();
        effect.tick();
        assert_eq!(effect.params()["ticks"], 1);
    }

    #[test]
    fn param_schema_has_expected_structure() {
        let effect = MockEffect::new(1);
        let schema = effect.param_schema();
        assert!(schema.get("budget").is_some());
        assert_eq!(schema["budget"]["type"], "integer");
    }

    #[test]
    fn dyn_effect_mut_reference_works() {
        let mut effect = MockEffect::new(1);
        let effect_ref: &mut dyn Effect = &mut effect;
        effect_ref.trigger();
        assert_eq!(effect_ref.tick(), Flow::Settled);
    }
}
