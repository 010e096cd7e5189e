#![forbid(unsafe_code)]

//! Shared value with change notification.
//!
//! Every change to an [`Observable<T>`] bumps its revision and is pushed to
//! each live listener, oldest first. Setting an equal value (by `PartialEq`)
//! changes nothing and notifies nobody.
//!
//! Listeners run after the cell's borrow is released, so a listener may read
//! or set the observable it is attached to. The observable only keeps a weak
//! reference; the owning reference sits in the returned [`Subscription`].

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    current: T,
    revision: u64,
    listeners: Vec<Weak<dyn Fn(&T)>>,
}

impl<T> Slot<T> {
    fn prune(&mut self) {
        self.listeners.retain(|l| l.strong_count() > 0);
    }
}

/// Shared value; clones observe and mutate the same state.
pub struct Observable<T> {
    cell: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.borrow();
        f.debug_struct("Observable")
            .field("current", &cell.current)
            .field("revision", &cell.revision)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(Slot {
                current: initial,
                revision: 0,
                listeners: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.cell.borrow().current.clone()
    }

    /// Store `next` and notify listeners. Returns `false` (and does nothing)
    /// when `next` equals the current value.
    pub fn set(&self, next: T) -> bool {
        let snapshot = {
            let mut cell = self.cell.borrow_mut();
            if cell.current == next {
                return false;
            }
            cell.current = next;
            cell.revision += 1;
            cell.prune();
            let listeners: Vec<Listener<T>> =
                cell.listeners.iter().filter_map(Weak::upgrade).collect();
            (listeners, cell.current.clone(), cell.revision)
        };
        let (listeners, value, revision) = snapshot;
        if !listeners.is_empty() {
            trace!(revision, listeners = listeners.len(), "observable changed");
        }
        for listener in &listeners {
            listener(&value);
        }
        true
    }

    /// Call `listener` on every future change while the subscription lives.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let owned: Listener<T> = Rc::new(listener);
        let mut cell = self.cell.borrow_mut();
        cell.prune();
        cell.listeners.push(Rc::downgrade(&owned));
        Subscription {
            _owned: Box::new(owned),
        }
    }

    /// Number of value-changing `set` calls so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.cell.borrow().revision
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        let mut cell = self.cell.borrow_mut();
        cell.prune();
        cell.listeners.len()
    }
}

/// Keeps one listener attached; dropping it detaches the listener.
pub struct Subscription {
    _owned: Box<dyn Any>,
}

impl Subscription {
    /// Detach now.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<std::cell::Cell<u32>>, impl Fn(&f64) + 'static) {
        let hits = Rc::new(std::cell::Cell::new(0));
        let sink = Rc::clone(&hits);
        (hits, move |_: &f64| sink.set(sink.get() + 1))
    }

    #[test]
    fn equal_value_is_ignored() {
        let ratio = Observable::new(1.0_f64);
        let (hits, listener) = counter();
        let _sub = ratio.subscribe(listener);
        assert!(!ratio.set(1.0));
        assert_eq!(ratio.revision(), 0);
        assert!(ratio.set(0.5));
        assert_eq!(ratio.revision(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listeners_fire_oldest_first() {
        let index = Observable::new(None::<usize>);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&seen), Rc::clone(&seen));
        let _pre = index.subscribe(move |v| a.borrow_mut().push(('a', *v)));
        let _post = index.subscribe(move |v| b.borrow_mut().push(('b', *v)));
        index.set(Some(2));
        assert_eq!(*seen.borrow(), vec![('a', Some(2)), ('b', Some(2))]);
    }

    #[test]
    fn unsubscribe_detaches() {
        let ratio = Observable::new(0.0_f64);
        let (hits, listener) = counter();
        let sub = ratio.subscribe(listener);
        ratio.set(0.25);
        sub.unsubscribe();
        ratio.set(0.75);
        assert_eq!(hits.get(), 1);
        assert_eq!(ratio.listener_count(), 0);
    }

    #[test]
    fn listener_may_set_again() {
        let ratio = Observable::new(0.0_f64);
        let handle = ratio.clone();
        let _sub = ratio.subscribe(move |&v| {
            if v > 1.0 {
                handle.set(1.0);
            }
        });
        ratio.set(1.4);
        assert_eq!(ratio.get(), 1.0);
        assert_eq!(ratio.revision(), 2);
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new(Some(1_usize));
        let b = a.clone();
        b.set(None);
        assert_eq!(a.get(), None);
    }
}
