//! Time-driven property animation: easing curves and channelled tweens.

pub mod easing;
pub mod tween;

pub use easing::Easing;
pub use tween::{Channel, Repeat, Timeline, Tween};
