//! Tick-domain interpolation helpers shared by the counter effects.

/// Animation progress in [0, 1] after `elapsed` of `duration` ticks.
///
/// A zero duration completes immediately (progress 1.0) rather than
/// dividing by zero.
#[inline]
pub fn progress(elapsed: usize, duration: usize) -> f64 {
    if duration == 0 {
        return 1.0;
    }
    (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
}

/// Linear interpolation between two values at factor `t` in [0, 1].
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
