#![forbid(unsafe_code)]

//! Slidable Runtime
//!
//! Stateful half of the slidable panel: frame clock, reactive values, and the
//! controllers that turn drag input and programmatic calls into a slide ratio
//! and per-row expansion progress.
//!
//! # Key Components
//!
//! - [`Ticker`] - per-frame scheduler the host drives
//! - [`Observable`] / [`Subscription`] - shared values with RAII subscriptions
//! - [`AnimationController`] - bounded value animated by tweens and flings
//! - [`SlideController`] - slide ratio state machine (drag, open, dismiss)
//! - [`ActionController`] - single-item expansion for one action row
//! - [`SlidablePanel`] - coordinator that lays out main content and rows
//!
//! # How it fits in the system
//! `slidable-core` supplies geometry and animation math, `slidable-layout`
//! the pure row and panel passes. This crate owns every piece of state that
//! changes over time and decides when those passes rerun.
//!
//! # Threading
//! Everything here is single-threaded (`Rc`/`RefCell`), matching a UI thread
//! that produces frames one at a time.

pub mod action;
pub mod animation;
pub mod config;
pub mod error;
pub mod panel;
pub mod reactive;
pub mod slide;
pub mod ticker;

pub use action::ActionController;
pub use animation::{AnimationController, AnimationOutcome, AnimationStatus, OnDone};
pub use config::{
    DEFAULT_EXPANSION_FLING_VELOCITY, DEFAULT_SLIDE_TOLERANCE, MotionTimings, PanelConfig,
    SlidableConfig, SlideControllerConfig,
};
pub use error::ConfigError;
pub use panel::{ActionItem, PanelChild, PanelPainter, RowRelayout, SlidablePanel, SlideGesture};
pub use reactive::{Observable, Subscription};
pub use slide::{DragSession, OnSettled, SlideController, SlidePhase};
pub use ticker::{TickListener, Ticker, TickerHandle};
