#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! An [`Animation`] is advanced by an external clock through
//! [`tick`](Animation::tick) and exposes its current [`value`](Animation::value).
//! Nothing here owns a timer; `slidable-runtime` supplies the frames.
//!
//! Two producers are provided:
//! - [`Tween`]: fixed-duration interpolation shaped by an [`EasingFn`].
//! - [`Fling`]: a critically damped spring launched with an initial velocity,
//!   for motion that should feel physical rather than timed.

pub mod spring;
pub mod tween;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use spring::Fling;
pub use tween::Tween;

/// A value that evolves as frames elapse.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its terminal value.
    fn is_complete(&self) -> bool;

    /// Current value. Once complete, this is exactly the terminal value.
    fn value(&self) -> f64;
}

/// Maps linear progress `t ∈ [0, 1]` to eased progress.
pub type EasingFn = fn(f64) -> f64;

/// Identity easing.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out.
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out.
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Named easing curve, for places that need a serializable choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Curve {
    /// The easing function this curve names.
    #[must_use]
    pub const fn easing(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
            Self::EaseOutCubic => ease_out_cubic,
            Self::EaseInOutCubic => ease_in_out_cubic,
        }
    }
}
