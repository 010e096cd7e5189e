#![forbid(unsafe_code)]

//! Core: geometry model and animation primitives for slidable panels.
//!
//! # Role in the workspace
//! `slidable-core` is the leaf layer. It owns the value types every other
//! crate speaks in (sizes, offsets, box constraints, axis, positions) and the
//! math that converts a signed drag distance into a slide ratio and back.
//!
//! # Primary responsibilities
//! - **PanelGeometry**: immutable per-layout snapshot of panel size, axis,
//!   row presence, and slide threshold, plus the drag/ratio conversions.
//! - **SlideDirection**: derived from the ratio sign and the axis.
//! - **Animation**: frame-driven value producers (`Tween`, `Fling`) and
//!   easing functions.
//!
//! # How it fits in the system
//! `slidable-layout` consumes the geometry types to place action items, and
//! `slidable-runtime` drives the animation primitives from its frame clock.

pub mod animation;
pub mod geometry;

pub use geometry::{
    ActionPosition, Axis, BoxConstraints, DEFAULT_MAX_SLIDE_THRESHOLD, GeometryError, Offset,
    PanelGeometry, Size, SlideDirection,
};
