//! Error types for the storyline-fx core.
//!
//! All variants describe construction or configuration failures. Ticking an
//! effect is infallible: anything that could go wrong is rejected before a
//! run can start.

use thiserror::Error;

/// Errors produced when constructing or configuring an effect.
#[derive(Debug, Error)]
pub enum FxError {
    /// Columns or rows was zero when building a fragment grid.
    #[error("invalid grid {columns}x{rows}: columns and rows must be non-zero")]
    InvalidGrid { columns: usize, rows: usize },

    /// Gravity must be finite and positive or the field would never settle.
    #[error("invalid gravity {0}: must be finite and greater than zero")]
    InvalidGravity(f64),

    /// Fade per tick must be finite and non-negative.
    #[error("invalid fade rate {0}: must be finite and non-negative")]
    InvalidFadeRate(f64),

    /// A kinematic parameter was NaN or infinite, which would keep a run
    /// from ever settling.
    #[error("parameter '{name}' must be finite, got {value}")]
    NonFiniteParam { name: String, value: f64 },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An effect name was not found in the registry.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// A run description failed validation.
    #[error("invalid cue: {0}")]
    InvalidCue(String),

    /// A snapshot or other file operation failed.
    #[error("io error: {0}")]
    Io(String),

    /// The host environment could not supply a required resource
    /// (missing canvas element, unavailable 2d context).
    #[error("host error: {0}")]
    Host(String),
}
