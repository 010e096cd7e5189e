#![forbid(unsafe_code)]

//! Action row layout and the panel geometry pass.
//!
//! Two pure computations live here:
//! - [`layout_action_row`]: sizes and positions the items of one action row
//!   for a given [`ActionLayout`] (motion + alignment), reveal amount, and
//!   [`ItemExpansion`] state.
//! - [`PanelLayout`]: derives the main-content slide offset and each row's
//!   tight constraints from a [`PanelGeometry`] and the current slide ratio.
//!
//! Neither function holds state between passes. [`RowLayoutCache`] memoizes
//! row results when the same descriptor and row state repeat across frames.

pub mod action;
pub mod cache;
pub mod panel;
pub mod row;

pub use action::{ActionAlignment, ActionLayout, ActionMotion};
pub use cache::{RowLayoutCache, RowLayoutCacheKey, RowLayoutCacheStats};
pub use panel::{PanelLayout, RowSlot};
pub use row::{ItemExpansion, ItemLayoutResult, ItemPlacement, RowLayoutInput, layout_action_row};
pub use slidable_core::geometry::{
    ActionPosition, Axis, BoxConstraints, Offset, PanelGeometry, Size,
};
