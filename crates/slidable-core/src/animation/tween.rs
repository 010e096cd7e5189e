#![forbid(unsafe_code)]

//! Fixed-duration interpolation between two values.

use std::time::Duration;

use super::{Animation, EasingFn, linear};

/// Interpolates `from → to` over `duration`, shaped by an easing function.
///
/// # Invariants
///
/// 1. `value()` equals `from` before the first tick.
/// 2. Once `is_complete()`, `value()` is exactly `to` (no float residue).
/// 3. A zero duration completes on construction.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Linear tween from `from` to `to`.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: linear,
        }
    }

    /// Set the easing function (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Start value.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.from
    }

    /// Terminal value.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.to
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        let t = (self.easing)(self.progress());
        self.from + (self.to - self.from) * t
    }
}
