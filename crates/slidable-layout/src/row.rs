#![forbid(unsafe_code)]

//! Action row solver.
//!
//! Given a row's size, its [`ActionLayout`], per-item flex values, the reveal
//! amount, and the row's [`ItemExpansion`], produce one tight constraint and
//! one row-relative offset per item.
//!
//! # Sizing
//!
//! Base shares come from the alignment (`total / n`, or `total × flex / Σflex`).
//! With an expanded item at progress `p`, every other item keeps
//! `share × (1 - p)` and the expanded item takes whatever remains, so the
//! extents always sum to the row's main extent.
//!
//! # Positioning
//!
//! Items are placed in index order from a running origin. `Stretch`/`Drawer`
//! advance by `extent × reveal`; `Behind`/`Scroll` advance by the full extent.
//! `Scroll` on the pre row and `Behind` on the post row start from
//! `-total × (reveal - 1)` instead of 0.
//!
//! # Invariants
//!
//! 1. Result length equals the item count.
//! 2. Σ main extents == row main extent (up to float rounding).
//! 3. An item with zero main extent has zero cross extent too.
//! 4. Empty rows (zero size) and zero-item rows produce no layout at all.

use serde::{Deserialize, Serialize};
use slidable_core::geometry::{ActionPosition, Axis, BoxConstraints, Offset, Size};

use crate::action::{ActionAlignment, ActionLayout};

/// Flex used for items that do not specify one.
const DEFAULT_FLEX: u32 = 1;

/// Expansion state of one row: at most one expanded item and its progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemExpansion {
    pub index: Option<usize>,
    pub progress: f64,
}

impl ItemExpansion {
    /// Nothing expanded.
    pub const NONE: Self = Self {
        index: None,
        progress: 0.0,
    };

    /// Item `index` expanded to `progress`.
    #[must_use]
    pub const fn expanded(index: usize, progress: f64) -> Self {
        Self {
            index: Some(index),
            progress,
        }
    }

    /// Whether `index` is the expanded item.
    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.index == Some(index)
    }
}

/// Everything the solver needs for one row.
#[derive(Debug, Clone, Copy)]
pub struct RowLayoutInput<'a> {
    pub position: ActionPosition,
    pub axis: Axis,
    /// The row's own (tight) size.
    pub size: Size,
    pub layout: ActionLayout,
    /// One entry per item; `None` means flex 1.
    pub flexes: &'a [Option<u32>],
    pub expansion: ItemExpansion,
    /// Reveal amount in `[0, 1]`.
    pub reveal: f64,
}

impl<'a> RowLayoutInput<'a> {
    /// Fully revealed row with default layout and no expansion.
    #[must_use]
    pub fn new(
        position: ActionPosition,
        axis: Axis,
        size: Size,
        flexes: &'a [Option<u32>],
    ) -> Self {
        Self {
            position,
            axis,
            size,
            layout: ActionLayout::default(),
            flexes,
            expansion: ItemExpansion::NONE,
            reveal: 1.0,
        }
    }

    #[must_use]
    pub fn layout(mut self, layout: ActionLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn expansion(mut self, expansion: ItemExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    #[must_use]
    pub fn reveal(mut self, reveal: f64) -> Self {
        self.reveal = reveal;
        self
    }

    /// Number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.flexes.len()
    }
}

/// Placement of a single item inside its row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemPlacement {
    pub constraints: BoxConstraints,
    /// Offset relative to the row origin.
    pub offset: Offset,
}

impl ItemPlacement {
    /// Size the item will take (its constraints are tight).
    #[must_use]
    pub const fn size(&self) -> Size {
        self.constraints.biggest()
    }

    /// Whether the item occupies no space and can be skipped for hit-testing.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.size().is_empty()
    }
}

/// Ordered per-item placements for one row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemLayoutResult {
    items: Vec<ItemPlacement>,
}

impl ItemLayoutResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemPlacement> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemPlacement> {
        self.items.iter()
    }

    /// Main-axis extent of every item, in order.
    #[must_use]
    pub fn main_extents(&self, axis: Axis) -> Vec<f64> {
        self.items
            .iter()
            .map(|item| axis.main_extent(item.size()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ItemLayoutResult {
    type Item = &'a ItemPlacement;
    type IntoIter = std::slice::Iter<'a, ItemPlacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Solve one row. Returns `None` when there is nothing to lay out: the row is
/// hidden (empty size) or has no items.
#[must_use]
pub fn layout_action_row(input: &RowLayoutInput<'_>) -> Option<ItemLayoutResult> {
    debug_assert!(
        !input.flexes.is_empty(),
        "action row laid out with no items"
    );
    if input.flexes.is_empty() || input.size.is_empty() {
        return None;
    }

    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "slidable.row_layout",
        position = ?input.position,
        items = input.flexes.len(),
        motion = ?input.layout.motion,
        reveal = input.reveal
    )
    .entered();

    let axis = input.axis;
    let total = axis.main_extent(input.size);
    let cross = axis.cross_extent(input.size);
    let reveal = input.reveal.clamp(0.0, 1.0);
    let extents = item_extents(input, total);

    let motion = input.layout.motion;
    let mut running = if motion.shifts_origin(input.position) {
        -total * (reveal - 1.0)
    } else {
        0.0
    };

    let items = extents
        .into_iter()
        .map(|extent| {
            let cross_extent = if extent > 0.0 { cross } else { 0.0 };
            let placement = ItemPlacement {
                constraints: BoxConstraints::tight_for(axis, extent, cross_extent),
                offset: axis.offset(running),
            };
            running += if motion.scales_with_reveal() {
                extent * reveal
            } else {
                extent
            };
            placement
        })
        .collect();

    Some(ItemLayoutResult { items })
}

/// Base share per item before expansion.
fn base_shares(input: &RowLayoutInput<'_>, total: f64) -> Vec<f64> {
    let count = input.flexes.len();
    match input.layout.alignment {
        ActionAlignment::SpaceEvenly => vec![total / count as f64; count],
        ActionAlignment::Flex => {
            let flexes: Vec<u32> = input
                .flexes
                .iter()
                .map(|flex| flex.unwrap_or(DEFAULT_FLEX))
                .collect();
            let sum: u64 = flexes.iter().map(|&f| u64::from(f)).sum();
            if sum == 0 {
                return vec![total / count as f64; count];
            }
            flexes
                .into_iter()
                .map(|flex| total * f64::from(flex) / sum as f64)
                .collect()
        }
    }
}

/// Final main extents, with the expanded item (or the last item) absorbing
/// whatever the others leave of `total`.
fn item_extents(input: &RowLayoutInput<'_>, total: f64) -> Vec<f64> {
    let mut extents = base_shares(input, total);
    let count = extents.len();

    let expanded = match input.expansion.index {
        Some(index) if index < count => Some(index),
        Some(index) => {
            debug_assert!(false, "expanded index {index} out of range for {count} items");
            None
        }
        None => None,
    };

    let absorber = match expanded {
        Some(index) => {
            let shrink = 1.0 - input.expansion.progress.clamp(0.0, 1.0);
            for (i, extent) in extents.iter_mut().enumerate() {
                if i != index {
                    *extent *= shrink;
                }
            }
            index
        }
        None => count - 1,
    };

    let others: f64 = extents
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != absorber)
        .map(|(_, extent)| extent)
        .sum();
    extents[absorber] = (total - others).max(0.0);
    extents
}
