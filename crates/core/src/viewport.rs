//! Viewport dimensions as reported by the host.

use serde::{Deserialize, Serialize};

/// Host viewport size in CSS pixels.
///
/// Dimensions come straight from the host's size query and are not
/// validated: a zero or negative dimension marks the viewport
/// *degenerate*, which degrades runs seeded from it to empty ones
/// rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport from host-reported dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the viewport cannot host a visible effect.
    ///
    /// True when either dimension is zero, negative, or non-finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }
}
