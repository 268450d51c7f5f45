//! Reproducible description of one effect run.
//!
//! A [`Cue`] captures everything needed to replay a run: effect name,
//! viewport dimensions, parameters, PRNG seed, and tick budget.

use crate::error::FxError;
use serde::{Deserialize, Serialize};

/// Reproducible description of one effect run.
///
/// Contains the effect name, viewport dimensions, parameter overrides,
/// PRNG seed, and tick budget. Two identical `Cue` values fed to the same
/// binary produce identical runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cue {
    pub effect: String,
    pub width: f64,
    pub height: f64,
    pub params: serde_json::Value,
    pub seed: u64,
    pub ticks: usize,
}

impl Cue {
    /// Creates a new Cue with default params (`{}`) and ticks (`0`).
    pub fn new(effect: &str, width: f64, height: f64, seed: u64) -> Self {
        Self {
            effect: effect.to_string(),
            width,
            height,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            ticks: 0,
        }
    }

    /// Validates that the cue names an effect and has finite dimensions.
    ///
    /// Zero and negative dimensions pass: they describe a degenerate
    /// viewport, which degrades the run to an empty one rather than
    /// failing. NaN and infinity are rejected.
    pub fn validate(&self) -> Result<(), FxError> {
        if self.effect.is_empty() {
            return Err(FxError::InvalidCue("effect name is empty".into()));
        }
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(FxError::InvalidCue(format!(
                "dimensions must be finite, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
