#![forbid(unsafe_code)]

//! Bounded animated value driven by a [`Ticker`].
//!
//! An [`AnimationController`] owns an [`Observable<f64>`] clamped to
//! `[lower, upper]` and at most one running driver (a [`Tween`] or a
//! [`Fling`]). Every frame the driver advances, the observable is set, and
//! once the driver completes its callback fires with
//! [`AnimationOutcome::Completed`].
//!
//! Starting another animation, calling [`set_value`], or [`stop`] supersedes
//! the running one: it stops where it is (so the next animation starts from
//! the current value without a jump) and its callback receives
//! [`AnimationOutcome::Superseded`] or [`AnimationOutcome::Stopped`].
//!
//! Callbacks always run after the controller's internal borrow is released,
//! so they may start new animations on the same controller.
//!
//! [`set_value`]: AnimationController::set_value
//! [`stop`]: AnimationController::stop

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use slidable_core::animation::{Animation, EasingFn, Fling, Tween};
use tracing::trace;

use crate::reactive::{Observable, Subscription};
use crate::ticker::{TickListener, Ticker, TickerHandle};

/// How an animation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The driver reached its terminal value.
    Completed,
    /// Another animation or a direct `set_value` took over.
    Superseded,
    /// [`AnimationController::stop`] was called.
    Stopped,
}

/// Whether a driver is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationStatus {
    #[default]
    Idle,
    Running,
}

/// Completion callback.
pub type OnDone = Box<dyn FnOnce(AnimationOutcome)>;

enum Driver {
    Tween(Tween),
    Fling(Fling),
}

impl Driver {
    fn as_animation(&mut self) -> &mut dyn Animation {
        match self {
            Self::Tween(tween) => tween,
            Self::Fling(fling) => fling,
        }
    }
}

struct ControllerState {
    lower: f64,
    upper: f64,
    driver: Option<Driver>,
    on_done: Option<OnDone>,
}

struct ControllerShared {
    state: RefCell<ControllerState>,
    value: Observable<f64>,
}

impl ControllerShared {
    fn clamp(&self, value: f64) -> f64 {
        let state = self.state.borrow();
        value.clamp(state.lower, state.upper)
    }

    /// Install `driver` (or clear it) and return the previous callback.
    fn replace(&self, driver: Option<Driver>, on_done: Option<OnDone>) -> Option<OnDone> {
        let mut state = self.state.borrow_mut();
        state.driver = driver;
        std::mem::replace(&mut state.on_done, on_done)
    }
}

impl TickListener for ControllerShared {
    fn on_tick(&self, dt: Duration) {
        let (next, finished) = {
            let mut state = self.state.borrow_mut();
            let (lower, upper) = (state.lower, state.upper);
            let Some(driver) = state.driver.as_mut() else {
                return;
            };
            let animation = driver.as_animation();
            animation.tick(dt);
            let next = animation.value().clamp(lower, upper);
            let finished = if animation.is_complete() {
                state.driver = None;
                Some(state.on_done.take())
            } else {
                None
            };
            (next, finished)
        };
        trace!(value = next, "animation frame");
        self.value.set(next);
        if let Some(Some(done)) = finished {
            done(AnimationOutcome::Completed);
        }
    }
}

/// Animated scalar in `[lower, upper]`.
///
/// Dropping the controller detaches it from the ticker; a pending callback is
/// dropped without being called.
pub struct AnimationController {
    shared: Rc<ControllerShared>,
    _ticker: TickerHandle,
}

impl fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationController")
            .field("value", &self.value())
            .field("status", &self.status())
            .finish()
    }
}

impl AnimationController {
    /// Controller at `initial` in `[lower, upper]`, attached to `ticker`.
    #[must_use]
    pub fn new(ticker: &Ticker, initial: f64, lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "empty animation range [{lower}, {upper}]");
        let shared = Rc::new(ControllerShared {
            state: RefCell::new(ControllerState {
                lower,
                upper,
                driver: None,
                on_done: None,
            }),
            value: Observable::new(initial.clamp(lower, upper)),
        });
        let listener: Rc<dyn TickListener> = shared.clone();
        let handle = ticker.attach(&listener);
        Self {
            shared,
            _ticker: handle,
        }
    }

    /// Controller over the unit range `[0, 1]` starting at 0.
    #[must_use]
    pub fn unit(ticker: &Ticker) -> Self {
        Self::new(ticker, 0.0, 0.0, 1.0)
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.shared.value.get()
    }

    /// The observable the controller writes every frame.
    #[must_use]
    pub fn observable(&self) -> &Observable<f64> {
        &self.shared.value
    }

    /// Shorthand for `observable().subscribe(..)`.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&f64) + 'static) -> Subscription {
        self.shared.value.subscribe(callback)
    }

    #[must_use]
    pub fn status(&self) -> AnimationStatus {
        if self.shared.state.borrow().driver.is_some() {
            AnimationStatus::Running
        } else {
            AnimationStatus::Idle
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.status() == AnimationStatus::Running
    }

    /// `(lower, upper)`.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        let state = self.shared.state.borrow();
        (state.lower, state.upper)
    }

    /// Tween from the current value to `target` over `duration`.
    ///
    /// If the value is already at `target` (or `duration` is zero) the value
    /// is set and `on_done` fires with `Completed` before this returns.
    pub fn animate_to(
        &self,
        target: f64,
        duration: Duration,
        easing: EasingFn,
        on_done: Option<OnDone>,
    ) {
        let target = self.shared.clamp(target);
        let from = self.value();
        if from == target || duration.is_zero() {
            self.finish_now(target, on_done);
            return;
        }
        trace!(from, target, duration_ms = duration.as_millis() as u64, "animate_to");
        let tween = Tween::new(from, target, duration).easing(easing);
        self.start(Driver::Tween(tween), on_done);
    }

    /// Spring from the current value toward `upper` (positive velocity) or
    /// `lower` (negative velocity).
    pub fn fling(&self, velocity: f64, on_done: Option<OnDone>) {
        let (lower, upper) = self.bounds();
        let fling = Fling::new(self.value(), velocity, lower, upper);
        if fling.is_complete() {
            self.finish_now(fling.value(), on_done);
            return;
        }
        trace!(from = self.value(), velocity, "fling");
        self.start(Driver::Fling(fling), on_done);
    }

    /// Jump to `value` (clamped), superseding any running animation.
    pub fn set_value(&self, value: f64) {
        let superseded = self.shared.replace(None, None);
        self.shared.value.set(self.shared.clamp(value));
        if let Some(done) = superseded {
            done(AnimationOutcome::Superseded);
        }
    }

    /// Halt the running animation at its current value.
    pub fn stop(&self) {
        if let Some(done) = self.shared.replace(None, None) {
            done(AnimationOutcome::Stopped);
        }
    }

    fn start(&self, driver: Driver, on_done: Option<OnDone>) {
        if let Some(previous) = self.shared.replace(Some(driver), on_done) {
            previous(AnimationOutcome::Superseded);
        }
    }

    fn finish_now(&self, target: f64, on_done: Option<OnDone>) {
        let superseded = self.shared.replace(None, None);
        self.shared.value.set(target);
        if let Some(previous) = superseded {
            previous(AnimationOutcome::Superseded);
        }
        if let Some(done) = on_done {
            done(AnimationOutcome::Completed);
        }
    }
}
