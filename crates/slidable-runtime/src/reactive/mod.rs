#![forbid(unsafe_code)]

//! Reactive values with explicit subscription lifetimes.
//!
//! Slide ratios, expansion indices, and expansion progress are all
//! [`Observable`]s. Whoever needs to react (the panel coordinator marking a
//! row dirty, a host redrawing) holds a [`Subscription`]; dropping it is the
//! only way to stop being called, so a torn-down panel never receives a stale
//! callback.

pub mod observable;

pub use observable::{Observable, Subscription};
