#![forbid(unsafe_code)]

//! Slide ratio state machine.
//!
//! [`SlideController`] owns the signed slide ratio in `[-1, 1]`, the live
//! [`DragSession`], the programmatic open/dismiss animations, and one optional
//! [`ActionController`] per row.
//!
//! # Phases
//!
//! ```text
//!            drag_start                    drag_end / open / dismiss
//! Dismissed ──────────► Dragging ─────────────────────► Animating
//!     ▲                    ▲                                │
//!     │                    └──────── drag_start ────────────┤
//!     └──────────── settles at 0 ──────┬───── settles ≠ 0 ──┘
//!                                      ▼
//!                                   Opened
//! ```
//!
//! # Release rule
//!
//! On `drag_end`, if the ratio moved more than `slide_tolerance` since the
//! drag started, the panel animates to the geometry's toggle target for the
//! current direction and forwarding flag. Otherwise it snaps back to the
//! nearer of 0 and the fully open ratio on the current side.
//!
//! # Completion
//!
//! `open`/`dismiss` callbacks fire only when their animation completes with
//! the ratio exactly on the target. A superseded animation (new drag, new
//! open/dismiss) never calls its callback.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use slidable_core::animation::EasingFn;
use slidable_core::geometry::{ActionPosition, PanelGeometry, SlideDirection};
use tracing::{debug, trace, warn};

use crate::action::ActionController;
use crate::animation::{AnimationController, AnimationOutcome, OnDone};
use crate::config::{MotionTimings, SlideControllerConfig};
use crate::error::ConfigError;
use crate::reactive::{Observable, Subscription};
use crate::ticker::Ticker;

/// Callback fired once an open or dismiss lands on its target.
pub type OnSettled = Box<dyn FnOnce()>;

/// Where the slide state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidePhase {
    /// Ratio is 0 and nothing is moving.
    Dismissed,
    /// A drag is in progress.
    Dragging,
    /// An open, dismiss, or release animation is running.
    Animating,
    /// At rest away from 0.
    Opened,
}

/// Accumulated state of the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSession {
    /// Signed drag distance along the axis.
    pub drag_extent: f64,
    /// Whether the latest delta moved away from 0.
    pub forwarding: bool,
}

struct SlideInner {
    config: SlideControllerConfig,
    timings: Cell<MotionTimings>,
    ratio: AnimationController,
    geometry: Cell<PanelGeometry>,
    drag: Cell<DragSession>,
    dragging: Cell<bool>,
    drag_start_ratio: Cell<f64>,
    initial_pending: Cell<bool>,
    pre_actions: Option<ActionController>,
    post_actions: Option<ActionController>,
}

impl SlideInner {
    fn reseed_drag(&self) {
        let geometry = self.geometry.get();
        self.drag.set(DragSession {
            drag_extent: geometry.drag_extent_for(self.ratio.value()),
            forwarding: false,
        });
    }

    fn actions(&self, position: ActionPosition) -> Option<&ActionController> {
        match position {
            ActionPosition::Pre => self.pre_actions.as_ref(),
            ActionPosition::Post => self.post_actions.as_ref(),
        }
    }

    fn reset_expansions(&self) {
        for position in ActionPosition::ALL {
            if let Some(actions) = self.actions(position) {
                actions.reset();
            }
        }
    }
}

/// Slide state machine for one panel. Clones share state.
#[derive(Clone)]
pub struct SlideController {
    inner: Rc<SlideInner>,
}

impl fmt::Debug for SlideController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideController")
            .field("ratio", &self.ratio())
            .field("phase", &self.phase())
            .field("drag", &self.inner.drag.get())
            .finish_non_exhaustive()
    }
}

impl SlideController {
    /// Build a controller driven by `ticker`.
    pub fn new(ticker: &Ticker, config: SlideControllerConfig) -> Result<Self, ConfigError> {
        config.check()?;
        let make_actions = |enabled: bool| {
            enabled
                .then(|| ActionController::with_velocity(ticker, config.expansion_fling_velocity))
        };
        let pre_actions = make_actions(config.pre_expansion);
        let post_actions = make_actions(config.post_expansion);
        let initial_pending = config.initial_position.is_some();
        debug!(
            tolerance = config.slide_tolerance,
            pre_expansion = config.pre_expansion,
            post_expansion = config.post_expansion,
            initial = ?config.initial_position,
            "slide controller created"
        );
        Ok(Self {
            inner: Rc::new(SlideInner {
                config,
                timings: Cell::new(MotionTimings::default()),
                ratio: AnimationController::new(ticker, 0.0, -1.0, 1.0),
                geometry: Cell::new(PanelGeometry::default()),
                drag: Cell::new(DragSession::default()),
                dragging: Cell::new(false),
                drag_start_ratio: Cell::new(0.0),
                initial_pending: Cell::new(initial_pending),
                pre_actions,
                post_actions,
            }),
        })
    }

    /// Replace the default durations and curves (builder pattern).
    #[must_use]
    pub fn with_timings(self, timings: MotionTimings) -> Self {
        self.inner.timings.set(timings);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SlideControllerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn timings(&self) -> MotionTimings {
        self.inner.timings.get()
    }

    // -- State ------------------------------------------------------------

    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.inner.ratio.value()
    }

    /// The ratio observable, written on every drag update and animation frame.
    #[must_use]
    pub fn ratio_observable(&self) -> &Observable<f64> {
        self.inner.ratio.observable()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_ratio(&self, callback: impl Fn(&f64) + 'static) -> Subscription {
        self.inner.ratio.subscribe(callback)
    }

    /// Direction derived from the ratio sign and the current axis.
    #[must_use]
    pub fn direction(&self) -> SlideDirection {
        SlideDirection::from_ratio(self.ratio(), self.inner.geometry.get().axis())
    }

    /// Row currently (partly) revealed.
    #[must_use]
    pub fn opened_position(&self) -> Option<ActionPosition> {
        ActionPosition::from_ratio(self.ratio())
    }

    #[must_use]
    pub fn phase(&self) -> SlidePhase {
        if self.inner.dragging.get() {
            SlidePhase::Dragging
        } else if self.inner.ratio.is_animating() {
            SlidePhase::Animating
        } else if self.ratio() == 0.0 {
            SlidePhase::Dismissed
        } else {
            SlidePhase::Opened
        }
    }

    #[must_use]
    pub fn drag_session(&self) -> DragSession {
        self.inner.drag.get()
    }

    #[must_use]
    pub fn geometry(&self) -> PanelGeometry {
        self.inner.geometry.get()
    }

    /// Install the geometry from the latest layout pass.
    ///
    /// The first call applies the configured initial position. If the
    /// revealed side lost its row, the panel closes immediately.
    pub fn set_geometry(&self, geometry: PanelGeometry) {
        let previous = self.inner.geometry.replace(geometry);
        if previous != geometry {
            trace!(?geometry, "geometry updated");
        }
        if self.inner.initial_pending.replace(false)
            && let Some(position) = self.inner.config.initial_position
        {
            match geometry.open_target(position) {
                Some(target) => {
                    debug!(?position, "applying initial position");
                    self.set_ratio(target);
                }
                None => {
                    debug_assert!(false, "initial position {position:?} has no action row");
                    warn!(?position, "initial position has no action row; ignored");
                }
            }
        }
        if let Some(position) = self.opened_position()
            && !geometry.has_row(position)
        {
            debug!(?position, "revealed row removed; closing");
            self.set_ratio(0.0);
        } else if !self.inner.dragging.get() && !self.inner.ratio.is_animating() {
            self.inner.reseed_drag();
        }
    }

    // -- Expansion --------------------------------------------------------

    /// Expansion controller for `position`, if that row has one.
    #[must_use]
    pub fn action_controller(&self, position: ActionPosition) -> Option<&ActionController> {
        self.inner.actions(position)
    }

    fn opened_actions(&self) -> Option<&ActionController> {
        self.opened_position()
            .and_then(|position| self.inner.actions(position))
    }

    fn with_opened_actions(
        &self,
        op: &'static str,
        index: usize,
        f: impl FnOnce(&ActionController),
    ) {
        let Some(position) = self.opened_position() else {
            trace!(op, index, "ignored; no row revealed");
            return;
        };
        match self.inner.actions(position) {
            Some(actions) => f(actions),
            None => {
                warn!(
                    op,
                    index,
                    ?position,
                    "ignored; revealed row has no expansion controller"
                );
                debug_assert!(
                    false,
                    "{op}({index}) on {position:?} row with no expansion controller"
                );
            }
        }
    }

    /// Expand `index` in the revealed row.
    pub fn expand(&self, index: usize) {
        self.with_opened_actions("expand", index, |actions| actions.expand(index));
    }

    /// Collapse `index` in the revealed row.
    pub fn collapse(&self, index: usize) {
        self.with_opened_actions("collapse", index, |actions| actions.collapse(index));
    }

    /// Toggle `index` in the revealed row.
    pub fn toggle_action(&self, index: usize) {
        self.with_opened_actions("toggle", index, |actions| actions.toggle(index));
    }

    /// Whether `index` is expanded in the revealed row.
    #[must_use]
    pub fn has_expanded_at(&self, index: usize) -> bool {
        self.opened_actions()
            .is_some_and(|actions| actions.has_expanded_at(index))
    }

    /// Clear both rows' expansion immediately.
    pub fn reset_expansions(&self) {
        self.inner.reset_expansions();
    }

    // -- Drag -------------------------------------------------------------

    /// Begin a drag. Returns `false` (and does nothing) when the geometry
    /// cannot slide.
    pub fn drag_start(&self) -> bool {
        let geometry = self.inner.geometry.get();
        if !geometry.can_slide() {
            trace!("drag ignored; panel cannot slide");
            return false;
        }
        self.inner.ratio.stop();
        self.inner.reseed_drag();
        self.inner.dragging.set(true);
        self.inner.drag_start_ratio.set(self.ratio());
        debug!(ratio = self.ratio(), "drag start");
        true
    }

    /// Apply a signed delta along the slide axis.
    pub fn drag_update(&self, delta: f64) {
        if !self.inner.dragging.get() {
            return;
        }
        let geometry = self.inner.geometry.get();
        let limit = geometry.slide_extent();
        let old = self.inner.drag.get();
        let unclamped = old.drag_extent + delta;
        // Judged before clamping so pushing past full reveal stays forward.
        let forwarding = unclamped.abs() > old.drag_extent.abs();
        let extent = unclamped.clamp(-limit, limit);
        match geometry.ratio_for_extent(extent) {
            Some(ratio) => {
                self.inner.drag.set(DragSession {
                    drag_extent: extent,
                    forwarding,
                });
                let ratio = ratio.clamp(-1.0, 1.0);
                trace!(delta, extent, ratio, forwarding, "drag update");
                self.inner.ratio.set_value(ratio);
            }
            None => {
                trace!(delta, extent, "drag toward side without a row; pinned at 0");
                self.inner.drag.set(DragSession {
                    drag_extent: 0.0,
                    forwarding: false,
                });
                self.inner.ratio.set_value(0.0);
            }
        }
    }

    /// Release the drag and animate to the committed or snapped-back target.
    pub fn drag_end(&self) {
        if !self.inner.dragging.replace(false) {
            return;
        }
        let geometry = self.inner.geometry.get();
        let ratio = self.ratio();
        let session = self.inner.drag.get();
        let moved = (ratio - self.inner.drag_start_ratio.get()).abs();
        let target = if moved > self.inner.config.slide_tolerance {
            geometry.toggle_target(self.direction(), ratio, session.forwarding)
        } else if ratio.abs() >= 0.5 {
            ratio.signum()
        } else {
            0.0
        };
        debug!(ratio, moved, forwarding = session.forwarding, target, "drag end");
        let (duration, easing) = self.timings().snap();
        let reset = self.inner.config.reset_expansion_on_close;
        self.settle(target, duration, easing, reset, None);
    }

    // -- Programmatic -----------------------------------------------------

    /// Open `position` with the default timing.
    pub fn open(&self, position: ActionPosition, on_opened: Option<OnSettled>) {
        let (duration, easing) = self.timings().open();
        self.open_with(position, duration, easing, on_opened);
    }

    /// Open `position` over `duration` shaped by `easing`.
    ///
    /// No-op when that row is absent or the panel already rests there.
    pub fn open_with(
        &self,
        position: ActionPosition,
        duration: Duration,
        easing: EasingFn,
        on_opened: Option<OnSettled>,
    ) {
        let Some(target) = self.inner.geometry.get().open_target(position) else {
            debug!(?position, "open ignored; no action row");
            return;
        };
        if self.ratio() == target && !self.inner.ratio.is_animating() {
            trace!(?position, "open ignored; already open");
            return;
        }
        debug!(?position, duration_ms = duration.as_millis() as u64, "open");
        self.inner.dragging.set(false);
        self.settle(target, duration, easing, false, on_opened);
    }

    /// Dismiss with the default timing.
    pub fn dismiss(&self, on_dismissed: Option<OnSettled>) {
        let (duration, easing) = self.timings().dismiss();
        self.dismiss_with(duration, easing, on_dismissed);
    }

    /// Animate to 0 and clear both rows' expansion once there.
    ///
    /// No-op when already dismissed.
    pub fn dismiss_with(
        &self,
        duration: Duration,
        easing: EasingFn,
        on_dismissed: Option<OnSettled>,
    ) {
        if self.ratio() == 0.0 && !self.inner.ratio.is_animating() {
            trace!("dismiss ignored; already dismissed");
            return;
        }
        debug!(duration_ms = duration.as_millis() as u64, "dismiss");
        self.inner.dragging.set(false);
        self.settle(0.0, duration, easing, true, on_dismissed);
    }

    /// Jump to `ratio` without animation.
    ///
    /// Clamped to `[-1, 1]`; a ratio toward a side without a row is ignored.
    pub fn set_ratio(&self, ratio: f64) {
        let ratio = ratio.clamp(-1.0, 1.0);
        if let Some(position) = ActionPosition::from_ratio(ratio)
            && !self.inner.geometry.get().has_row(position)
        {
            debug!(ratio, "set_ratio ignored; no action row on that side");
            return;
        }
        self.inner.dragging.set(false);
        self.inner.ratio.set_value(ratio);
        self.inner.reseed_drag();
    }

    fn settle(
        &self,
        target: f64,
        duration: Duration,
        easing: EasingFn,
        reset_on_zero: bool,
        on_settled: Option<OnSettled>,
    ) {
        let weak: Weak<SlideInner> = Rc::downgrade(&self.inner);
        let done: OnDone = Box::new(move |outcome| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if outcome != AnimationOutcome::Completed || inner.ratio.value() != target {
                trace!(?outcome, target, "slide animation did not land");
                return;
            }
            inner.reseed_drag();
            if target == 0.0 && reset_on_zero {
                inner.reset_expansions();
            }
            debug!(target, "slide settled");
            if let Some(callback) = on_settled {
                callback();
            }
        });
        self.inner.ratio.animate_to(target, duration, easing, Some(done));
    }
}
