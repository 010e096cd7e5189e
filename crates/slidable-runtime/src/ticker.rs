#![forbid(unsafe_code)]

//! Per-frame scheduler shared by every animation of a panel.
//!
//! The host owns the frame loop and calls [`Ticker::tick`] (or
//! [`Ticker::tick_at`] with a timestamp) once per frame. Listeners are held
//! weakly and advanced in attach order. Attaching returns a [`TickerHandle`];
//! dropping it detaches the listener, so a disposed controller is never
//! called back.
//!
//! Listeners may attach, detach, or start new animations from inside their
//! own callback: the listener list is snapshotted before any callback runs.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::trace;
use web_time::Instant;

/// Something advanced once per frame.
pub trait TickListener {
    /// Called with the time elapsed since the previous frame.
    fn on_tick(&self, dt: Duration);
}

struct Entry {
    id: u64,
    listener: Weak<dyn TickListener>,
}

#[derive(Default)]
struct TickerInner {
    next_id: u64,
    entries: Vec<Entry>,
    last_frame: Option<Instant>,
    frames: u64,
}

/// Frame clock. Clones share the same listener list.
#[derive(Clone, Default)]
pub struct Ticker {
    inner: Rc<RefCell<TickerInner>>,
}

impl fmt::Debug for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Ticker")
            .field("entries", &inner.entries.len())
            .field("frames", &inner.frames)
            .finish()
    }
}

impl Ticker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start delivering frames to `listener` until the handle is dropped.
    #[must_use = "dropping the handle detaches the listener immediately"]
    pub fn attach(&self, listener: &Rc<dyn TickListener>) -> TickerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(Entry {
            id,
            listener: Rc::downgrade(listener),
        });
        trace!(id, "ticker attach");
        TickerHandle {
            id,
            ticker: Rc::downgrade(&self.inner),
        }
    }

    /// Advance every live listener by `dt`.
    pub fn tick(&self, dt: Duration) {
        let live: Vec<Rc<dyn TickListener>> = {
            let mut inner = self.inner.borrow_mut();
            inner.frames += 1;
            inner.entries.retain(|e| e.listener.strong_count() > 0);
            inner
                .entries
                .iter()
                .filter_map(|e| e.listener.upgrade())
                .collect()
        };
        trace!(dt_us = dt.as_micros() as u64, listeners = live.len(), "tick");
        for listener in live {
            listener.on_tick(dt);
        }
    }

    /// Advance using a frame timestamp; `dt` is measured from the previous
    /// `tick_at` call (zero on the first).
    pub fn tick_at(&self, now: Instant) {
        let dt = {
            let mut inner = self.inner.borrow_mut();
            let dt = inner
                .last_frame
                .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
            inner.last_frame = Some(now);
            dt
        };
        self.tick(dt);
    }

    /// Listeners that are still alive and attached.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.entries.retain(|e| e.listener.strong_count() > 0);
        inner.entries.len()
    }

    /// Frames delivered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.borrow().frames
    }
}

/// Attachment of one listener to a [`Ticker`]. Detaches on drop.
pub struct TickerHandle {
    id: u64,
    ticker: Weak<RefCell<TickerInner>>,
}

impl TickerHandle {
    /// Detach now. Equivalent to dropping the handle.
    pub fn detach(self) {}
}

impl fmt::Debug for TickerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickerHandle").field("id", &self.id).finish()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.ticker.upgrade()
            && let Ok(mut inner) = inner.try_borrow_mut()
        {
            inner.entries.retain(|e| e.id != self.id);
            trace!(id = self.id, "ticker detach");
        }
    }
}
