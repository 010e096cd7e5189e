#![forbid(unsafe_code)]

//! Per-row item expansion.
//!
//! An [`ActionController`] tracks which item of one action row (if any) is
//! expanded and how far, as a progress value in `[0, 1]` that the row layout
//! reads to grow the expanded item and shrink its siblings. Expansion and
//! collapse are velocity-launched flings rather than timed tweens.
//!
//! # Invariants
//!
//! 1. At most one index is expanded.
//! 2. `progress == 0` whenever no index is expanded. A collapsing item keeps
//!    its index until the fling settles at 0.

use std::cell::Cell;
use std::rc::Rc;

use slidable_layout::ItemExpansion;
use tracing::debug;

use crate::animation::{AnimationController, AnimationOutcome};
use crate::config::DEFAULT_EXPANSION_FLING_VELOCITY;
use crate::reactive::{Observable, Subscription};
use crate::ticker::Ticker;

/// Expanded index plus its fling-driven progress for one row.
#[derive(Debug)]
pub struct ActionController {
    index: Observable<Option<usize>>,
    progress: AnimationController,
    collapsing: Rc<Cell<bool>>,
    velocity: f64,
}

impl ActionController {
    /// Idle controller flinging at the default velocity.
    #[must_use]
    pub fn new(ticker: &Ticker) -> Self {
        Self::with_velocity(ticker, DEFAULT_EXPANSION_FLING_VELOCITY)
    }

    /// Idle controller flinging at `velocity` progress units per second.
    #[must_use]
    pub fn with_velocity(ticker: &Ticker, velocity: f64) -> Self {
        debug_assert!(velocity > 0.0, "fling velocity must be positive");
        Self {
            index: Observable::new(None),
            progress: AnimationController::unit(ticker),
            collapsing: Rc::new(Cell::new(false)),
            velocity: velocity.abs(),
        }
    }

    /// Expanded index, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index.get()
    }

    /// Expansion progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    /// Snapshot for the row layout.
    #[must_use]
    pub fn expansion(&self) -> ItemExpansion {
        ItemExpansion {
            index: self.index(),
            progress: self.progress(),
        }
    }

    #[must_use]
    pub fn has_expanded_at(&self, index: usize) -> bool {
        self.index() == Some(index)
    }

    /// Whether a fling is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.progress.is_animating()
    }

    /// Observe index changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_index(&self, callback: impl Fn(&Option<usize>) + 'static) -> Subscription {
        self.index.subscribe(callback)
    }

    /// Observe progress changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_progress(&self, callback: impl Fn(&f64) + 'static) -> Subscription {
        self.progress.subscribe(callback)
    }

    /// Expand item `index`, replacing any other expanded item.
    pub fn expand(&self, index: usize) {
        if self.index() == Some(index) {
            if self.collapsing.replace(false) {
                debug!(index, "expansion reversed mid-collapse");
                self.progress.fling(self.velocity, None);
            }
            return;
        }
        debug!(index, previous = ?self.index(), "expand");
        self.collapsing.set(false);
        self.index.set(Some(index));
        self.progress.set_value(0.0);
        self.progress.fling(self.velocity, None);
    }

    /// Collapse item `index` if it is the expanded one.
    pub fn collapse(&self, index: usize) {
        if self.index() != Some(index) || self.collapsing.get() {
            return;
        }
        debug!(index, "collapse");
        self.collapsing.set(true);
        let slot = self.index.clone();
        let collapsing = Rc::clone(&self.collapsing);
        self.progress.fling(
            -self.velocity,
            Some(Box::new(move |outcome| {
                if outcome == AnimationOutcome::Completed && collapsing.get() {
                    collapsing.set(false);
                    if slot.get() == Some(index) {
                        slot.set(None);
                    }
                }
            })),
        );
    }

    /// Collapse `index` if expanded, otherwise expand it.
    pub fn toggle(&self, index: usize) {
        if self.index() == Some(index) && !self.collapsing.get() {
            self.collapse(index);
        } else {
            self.expand(index);
        }
    }

    /// Clear the expansion immediately, without animation.
    pub fn reset(&self) {
        if self.index().is_none() && self.progress() == 0.0 {
            return;
        }
        debug!(index = ?self.index(), "expansion reset");
        self.collapsing.set(false);
        self.progress.set_value(0.0);
        self.index.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settle(ticker: &Ticker) {
        for _ in 0..200 {
            ticker.tick(Duration::from_millis(16));
        }
    }

    #[test]
    fn expand_flings_to_full() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.expand(1);
        assert_eq!(ctl.index(), Some(1));
        assert_eq!(ctl.progress(), 0.0);
        settle(&ticker);
        assert_eq!(ctl.progress(), 1.0);
        assert_eq!(ctl.expansion(), ItemExpansion::expanded(1, 1.0));
    }

    #[test]
    fn collapse_clears_index_after_settling() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.expand(0);
        settle(&ticker);
        ctl.collapse(0);
        assert!(ctl.has_expanded_at(0));
        settle(&ticker);
        assert_eq!(ctl.index(), None);
        assert_eq!(ctl.progress(), 0.0);
    }

    #[test]
    fn collapse_of_other_index_is_a_no_op() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.expand(2);
        settle(&ticker);
        ctl.collapse(1);
        settle(&ticker);
        assert!(ctl.has_expanded_at(2));
        assert_eq!(ctl.progress(), 1.0);
    }

    #[test]
    fn expanding_same_index_is_a_no_op() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.expand(1);
        settle(&ticker);
        let version = ctl.index.revision();
        ctl.expand(1);
        assert_eq!(ctl.index.revision(), version);
        assert_eq!(ctl.progress(), 1.0);
    }

    #[test]
    fn switching_items_restarts_progress() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.expand(0);
        settle(&ticker);
        ctl.expand(2);
        assert_eq!(ctl.index(), Some(2));
        assert_eq!(ctl.progress(), 0.0);
        settle(&ticker);
        assert_eq!(ctl.progress(), 1.0);
    }

    #[test]
    fn toggle_alternates() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.toggle(3);
        settle(&ticker);
        assert!(ctl.has_expanded_at(3));
        ctl.toggle(3);
        settle(&ticker);
        assert_eq!(ctl.index(), None);
    }

    #[test]
    fn expand_during_collapse_reverses() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.expand(1);
        settle(&ticker);
        ctl.collapse(1);
        ticker.tick(Duration::from_millis(16));
        ctl.expand(1);
        settle(&ticker);
        assert!(ctl.has_expanded_at(1));
        assert_eq!(ctl.progress(), 1.0);
    }

    #[test]
    fn reset_is_immediate() {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        ctl.expand(1);
        ticker.tick(Duration::from_millis(16));
        ctl.reset();
        assert_eq!(ctl.expansion(), ItemExpansion::NONE);
        settle(&ticker);
        assert_eq!(ctl.expansion(), ItemExpansion::NONE);
    }
}
