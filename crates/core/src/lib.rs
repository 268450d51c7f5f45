#![deny(unsafe_code)]
//! Core types and traits for the storyline-fx effect system.
//!
//! Provides the `Effect` trait, the `Surface` drawing abstraction, the
//! `Viewport` type, `Rgba` color, the `RandomSource` trait with its
//! `Xorshift64` implementation, `Cue`, and parameter helpers.

pub mod color;
pub mod cue;
pub mod effect;
pub mod error;
pub mod math;
pub mod params;
pub mod prng;
pub mod surface;
pub mod viewport;

pub use color::Rgba;
pub use cue::Cue;
pub use effect::{Effect, Flow};
pub use error::FxError;
pub use prng::{RandomSource, Xorshift64};
pub use surface::Surface;
pub use viewport::Viewport;
