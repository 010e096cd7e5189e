#![forbid(unsafe_code)]

//! Velocity-launched spring ("fling") toward one end of a bounded range.
//!
//! A fling starts at a position with an initial velocity and is pulled by a
//! damped spring toward the bound its velocity points at:
//!
//!   a = -stiffness × (position - target) - damping × velocity
//!
//! The spring target sits a small `overshoot` past the bound so the motion
//! actually crosses it in finite time; the fling completes on the frame the
//! position reaches the bound and reports exactly that bound from then on.
//!
//! # Integration
//!
//! Semi-implicit Euler with sub-steps of at most 4ms, so a long frame (or a
//! host that stalls) cannot destabilise a stiff spring.
//!
//! # Invariants
//!
//! 1. `value()` is always within `[lower, upper]`.
//! 2. Once complete, `value()` is exactly the bound the velocity pointed at.
//! 3. A zero velocity flings toward `upper`, matching a forward fling.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step.
const MAX_STEP_SECS: f64 = 0.004;

/// Default spring stiffness (unit mass).
const DEFAULT_STIFFNESS: f64 = 500.0;

/// Distance past the bound the spring aims for.
const DEFAULT_OVERSHOOT: f64 = 0.01;

/// Minimum stiffness to keep the spring from degenerating.
const MIN_STIFFNESS: f64 = 0.1;

/// A critically damped spring launched with an initial velocity.
///
/// ```ignore
/// use std::time::Duration;
/// use slidable_core::animation::{Animation, Fling};
///
/// let mut fling = Fling::new(0.0, 1.0, 0.0, 1.0);
/// while !fling.is_complete() {
///     fling.tick(Duration::from_millis(16));
/// }
/// assert_eq!(fling.value(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Fling {
    position: f64,
    velocity: f64,
    lower: f64,
    upper: f64,
    stiffness: f64,
    damping: f64,
    overshoot: f64,
    toward_upper: bool,
    done: bool,
}

impl Fling {
    /// Fling from `from` with `velocity` (units per second) inside
    /// `[lower, upper]`.
    #[must_use]
    pub fn new(from: f64, velocity: f64, lower: f64, upper: f64) -> Self {
        let mut fling = Self {
            position: from.clamp(lower, upper),
            velocity,
            lower,
            upper,
            stiffness: DEFAULT_STIFFNESS,
            damping: 2.0 * DEFAULT_STIFFNESS.sqrt(),
            overshoot: DEFAULT_OVERSHOOT,
            toward_upper: velocity >= 0.0,
            done: false,
        };
        fling.check_arrival();
        fling
    }

    /// Set stiffness, keeping the current damping ratio (builder pattern).
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        let ratio = self.damping_ratio();
        self.stiffness = k.max(MIN_STIFFNESS);
        self.damping = ratio * self.critical_damping();
        self
    }

    /// Set damping as a multiple of critical damping (builder pattern).
    #[must_use]
    pub fn with_damping_ratio(mut self, ratio: f64) -> Self {
        self.damping = ratio.max(0.0) * self.critical_damping();
        self
    }

    /// Position (always within bounds).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Bound the fling is heading for.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> f64 {
        if self.toward_upper {
            self.upper
        } else {
            self.lower
        }
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Damping coefficient at which the spring converges without oscillating.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    fn spring_target(&self) -> f64 {
        if self.toward_upper {
            self.upper + self.overshoot
        } else {
            self.lower - self.overshoot
        }
    }

    fn step(&mut self, dt: f64, target: f64) {
        let acceleration =
            -self.stiffness * (self.position - target) - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    fn check_arrival(&mut self) {
        let arrived = if self.toward_upper {
            self.position >= self.upper
        } else {
            self.position <= self.lower
        };
        if arrived {
            self.position = self.destination();
            self.velocity = 0.0;
            self.done = true;
        }
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.done {
            return;
        }
        let target = self.spring_target();
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 && !self.done {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt, target);
            remaining -= step_dt;
            self.check_arrival();
        }
    }
}

impl Animation for Fling {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.done
    }

    fn value(&self) -> f64 {
        self.position.clamp(self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn run_to_completion(fling: &mut Fling) -> usize {
        let mut frames = 0;
        while !fling.is_complete() && frames < 1000 {
            fling.tick(MS_16);
            frames += 1;
        }
        frames
    }

    #[test]
    fn forward_fling_reaches_upper() {
        let mut fling = Fling::new(0.0, 1.0, 0.0, 1.0);
        let frames = run_to_completion(&mut fling);
        assert!(fling.is_complete(), "fling did not settle after {frames} frames");
        assert_eq!(fling.value(), 1.0);
    }

    #[test]
    fn backward_fling_reaches_lower() {
        let mut fling = Fling::new(1.0, -1.0, 0.0, 1.0);
        run_to_completion(&mut fling);
        assert!(fling.is_complete());
        assert_eq!(fling.value(), 0.0);
    }

    #[test]
    fn fling_is_not_instant() {
        let mut fling = Fling::new(0.0, 1.0, 0.0, 1.0);
        fling.tick(MS_16);
        assert!(!fling.is_complete());
        let v = fling.value();
        assert!(v > 0.0 && v < 1.0, "value after one frame: {v}");
    }

    #[test]
    fn settles_in_a_feel_based_window() {
        let mut fling = Fling::new(0.0, 1.0, 0.0, 1.0);
        let frames = run_to_completion(&mut fling);
        assert!((5..60).contains(&frames), "settled after {frames} frames");
    }

    #[test]
    fn value_stays_in_bounds() {
        let mut fling = Fling::new(0.0, 50.0, 0.0, 1.0).with_damping_ratio(0.2);
        for _ in 0..200 {
            fling.tick(MS_16);
            let v = fling.value();
            assert!((0.0..=1.0).contains(&v), "value out of range: {v}");
        }
    }

    #[test]
    fn starting_on_destination_completes_immediately() {
        let fling = Fling::new(1.0, 1.0, 0.0, 1.0);
        assert!(fling.is_complete());
        assert_eq!(fling.value(), 1.0);
    }

    #[test]
    fn zero_velocity_heads_up() {
        let fling = Fling::new(0.5, 0.0, 0.0, 1.0);
        assert_eq!(fling.destination(), 1.0);
    }

    #[test]
    fn large_dt_subdivided() {
        let mut fling = Fling::new(0.0, 1.0, 0.0, 1.0);
        fling.tick(Duration::from_secs(5));
        assert!(fling.is_complete());
        assert_eq!(fling.value(), 1.0);
    }

    #[test]
    fn stiffness_preserves_damping_ratio() {
        let fling = Fling::new(0.0, 1.0, 0.0, 1.0).with_stiffness(100.0);
        assert!((fling.damping() - 20.0).abs() < 1e-9);
        let clamped = Fling::new(0.0, 1.0, 0.0, 1.0).with_stiffness(-3.0);
        assert!(clamped.stiffness() >= MIN_STIFFNESS);
    }

    #[test]
    fn deterministic_across_runs() {
        let run = || {
            let mut fling = Fling::new(0.2, 1.0, 0.0, 1.0);
            (0..10)
                .map(|_| {
                    fling.tick(MS_16);
                    fling.position()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
