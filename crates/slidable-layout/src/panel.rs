#![forbid(unsafe_code)]

//! Panel-level geometry pass.
//!
//! The main content is always laid out at the panel's full incoming
//! constraints; sliding only moves it. Given the resulting [`PanelGeometry`]
//! and the slide ratio this module derives:
//! - the main content's offset: `main extent × ratio × threshold` along the axis;
//! - each row's constraints: tight `main extent × threshold` by the full cross
//!   extent while that row is being revealed, otherwise tight zero;
//! - each row's origin: pre rows at the leading edge, post rows flush with
//!   the trailing edge.

use slidable_core::geometry::{ActionPosition, BoxConstraints, Offset, PanelGeometry, Size};

/// Where and how large one action row is for this pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowSlot {
    pub constraints: BoxConstraints,
    /// Row origin relative to the panel.
    pub origin: Offset,
    /// Reveal amount in `[0, 1]` for this row.
    pub reveal: f64,
}

impl RowSlot {
    /// Whether the row is hidden and should be neither laid out nor painted.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.constraints.biggest().is_empty()
    }
}

/// Result of one panel pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub geometry: PanelGeometry,
    pub main_offset: Offset,
    pub pre: RowSlot,
    pub post: RowSlot,
}

impl PanelLayout {
    /// Compute the pass for `geometry` at `ratio`.
    #[must_use]
    pub fn compute(geometry: PanelGeometry, ratio: f64) -> Self {
        Self {
            geometry,
            main_offset: Self::main_offset(&geometry, ratio),
            pre: Self::row_slot(&geometry, ActionPosition::Pre, ratio),
            post: Self::row_slot(&geometry, ActionPosition::Post, ratio),
        }
    }

    /// Slot for `position`.
    #[must_use]
    pub fn slot(&self, position: ActionPosition) -> RowSlot {
        match position {
            ActionPosition::Pre => self.pre,
            ActionPosition::Post => self.post,
        }
    }

    /// Offset of the main content at `ratio`.
    #[must_use]
    pub fn main_offset(geometry: &PanelGeometry, ratio: f64) -> Offset {
        geometry
            .axis()
            .offset(geometry.main_extent() * ratio * geometry.max_slide_threshold())
    }

    /// How far `position` is revealed at `ratio`: `|ratio|` when the ratio's
    /// sign selects that position, else 0.
    #[must_use]
    pub fn reveal(position: ActionPosition, ratio: f64) -> f64 {
        if ActionPosition::from_ratio(ratio) == Some(position) {
            ratio.abs().min(1.0)
        } else {
            0.0
        }
    }

    /// Constraints, origin, and reveal for one row at `ratio`.
    #[must_use]
    pub fn row_slot(geometry: &PanelGeometry, position: ActionPosition, ratio: f64) -> RowSlot {
        let reveal = Self::reveal(position, ratio);
        let row_main = geometry.slide_extent();
        let axis = geometry.axis();
        let constraints = if reveal > 0.0 && geometry.has_row(position) {
            BoxConstraints::tight_for(axis, row_main, geometry.cross_extent())
        } else {
            BoxConstraints::tight(Size::ZERO)
        };
        let origin = match position {
            ActionPosition::Pre => Offset::ZERO,
            ActionPosition::Post => axis.offset(geometry.main_extent() - row_main),
        };
        RowSlot {
            constraints,
            origin,
            reveal,
        }
    }
}
