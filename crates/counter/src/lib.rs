#![deny(unsafe_code)]
//! Animated numeric counters.
//!
//! Tick-domain versions of the storyline page's stat animations: a linear
//! count-up tween, a stepped countdown, and a non-settling live feed that
//! random-walks a stat. All three implement
//! [`Effect`](storyline_fx_core::Effect) so hosts can drive them through
//! the same trigger/tick loop as the visual effects.

pub mod count_up;
pub mod countdown;
pub mod format;
pub mod live_feed;

pub use count_up::{CountUp, CountUpParams};
pub use countdown::{Countdown, CountdownParams};
pub use format::format_grouped;
pub use live_feed::{LiveFeed, LiveFeedParams};
