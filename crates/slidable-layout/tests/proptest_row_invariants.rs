//! Property-based invariant tests for the action row solver.
//!
//! 1. One placement per item.
//! 2. Main extents sum to the row's main extent for both alignments, every
//!    motion, and any expansion state.
//! 3. Items with zero main extent also have zero cross extent.
//! 4. Extents are never negative.
//! 5. The memoizing cache returns exactly what the solver returns.

use proptest::prelude::*;
use slidable_layout::{
    ActionAlignment, ActionLayout, ActionMotion, ActionPosition, Axis, ItemExpansion,
    RowLayoutCache, RowLayoutInput, Size, layout_action_row,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn any_axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)]
}

fn any_position() -> impl Strategy<Value = ActionPosition> {
    prop_oneof![Just(ActionPosition::Pre), Just(ActionPosition::Post)]
}

fn any_layout() -> impl Strategy<Value = ActionLayout> {
    (
        prop_oneof![
            Just(ActionMotion::Behind),
            Just(ActionMotion::Stretch),
            Just(ActionMotion::Drawer),
            Just(ActionMotion::Scroll),
        ],
        prop_oneof![Just(ActionAlignment::SpaceEvenly), Just(ActionAlignment::Flex)],
    )
        .prop_map(|(motion, alignment)| ActionLayout::new(motion, alignment))
}

fn any_flexes() -> impl Strategy<Value = Vec<Option<u32>>> {
    prop::collection::vec(prop::option::of(1u32..10), 1..8)
}

/// Expansion state valid for a row of `count` items.
fn any_expansion(count: usize) -> impl Strategy<Value = ItemExpansion> {
    prop_oneof![
        Just(ItemExpansion::NONE),
        (0..count, 0.0f64..=1.0)
            .prop_map(|(index, progress)| ItemExpansion::expanded(index, progress)),
    ]
}

#[derive(Debug, Clone)]
struct Case {
    position: ActionPosition,
    axis: Axis,
    size: Size,
    layout: ActionLayout,
    flexes: Vec<Option<u32>>,
    expansion: ItemExpansion,
    reveal: f64,
}

impl Case {
    fn input(&self) -> RowLayoutInput<'_> {
        RowLayoutInput::new(self.position, self.axis, self.size, &self.flexes)
            .layout(self.layout)
            .expansion(self.expansion)
            .reveal(self.reveal)
    }
}

fn any_case() -> impl Strategy<Value = Case> {
    (
        any_position(),
        any_axis(),
        1.0f64..1200.0,
        1.0f64..200.0,
        any_layout(),
        any_flexes(),
        0.0f64..=1.0,
    )
        .prop_flat_map(|(position, axis, w, h, layout, flexes, reveal)| {
            let count = flexes.len();
            any_expansion(count).prop_map(move |expansion| Case {
                position,
                axis,
                size: Size::new(w, h),
                layout,
                flexes: flexes.clone(),
                expansion,
                reveal,
            })
        })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ═════════════════════════════════════════════════════════════════════════
// 1–4. Solver invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn one_placement_per_item(case in any_case()) {
        let result = layout_action_row(&case.input());
        prop_assert!(result.is_some());
        prop_assert_eq!(result.map(|r| r.len()).unwrap_or_default(), case.flexes.len());
    }

    #[test]
    fn extents_sum_to_row_extent(case in any_case()) {
        let input = case.input();
        let total = case.axis.main_extent(case.size);
        let extents = layout_action_row(&input)
            .map(|r| r.main_extents(case.axis))
            .unwrap_or_default();
        let sum: f64 = extents.iter().sum();
        prop_assert!(close(sum, total), "sum {} != total {} ({:?})", sum, total, extents);
    }

    #[test]
    fn collapsed_items_have_no_cross_extent(case in any_case()) {
        let result = layout_action_row(&case.input()).unwrap_or_default();
        for placement in &result {
            let size = placement.size();
            let main = case.axis.main_extent(size);
            let cross = case.axis.cross_extent(size);
            prop_assert!(main >= 0.0);
            if main == 0.0 {
                prop_assert_eq!(cross, 0.0);
            } else {
                prop_assert_eq!(cross, case.axis.cross_extent(case.size));
            }
        }
    }

    #[test]
    fn full_progress_collapses_siblings(
        flexes in any_flexes(),
        layout in any_layout(),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(flexes.len());
        let size = Size::new(300.0, 40.0);
        let input = RowLayoutInput::new(ActionPosition::Pre, Axis::Horizontal, size, &flexes)
            .layout(layout)
            .expansion(ItemExpansion::expanded(index, 1.0));
        let extents = layout_action_row(&input)
            .map(|r| r.main_extents(Axis::Horizontal))
            .unwrap_or_default();
        for (i, extent) in extents.iter().enumerate() {
            if i == index {
                prop_assert_eq!(*extent, 300.0);
            } else {
                prop_assert_eq!(*extent, 0.0);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Cache transparency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cache_matches_solver(cases in prop::collection::vec(any_case(), 1..12)) {
        let mut cache = RowLayoutCache::new(4);
        for case in cases.iter().chain(cases.iter()) {
            let input = case.input();
            prop_assert_eq!(cache.layout(&input), layout_action_row(&input));
        }
        prop_assert!(cache.len() <= 4);
    }
}
