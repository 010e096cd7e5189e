//! Property-based invariant tests for the slide ratio model.
//!
//! 1. extent → ratio → extent → ratio is stable under repeated application.
//! 2. The ratio is absent when sliding toward a side without a row.
//! 3. `toggle_target` follows the direction × forwarding table and is forced
//!    to zero when the implied side has no row.
//! 4. Directions derived from a ratio always agree with its sign.

use slidable_core::{ActionPosition, Axis, PanelGeometry, Size, SlideDirection};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn any_axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)]
}

fn any_geometry() -> impl Strategy<Value = PanelGeometry> {
    (
        1.0f64..2000.0,
        1.0f64..2000.0,
        any_axis(),
        0.05f64..=1.0,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(w, h, axis, threshold, pre, post)| {
            PanelGeometry::new(Size::new(w, h), axis, threshold)
                .expect("strategy only yields valid geometry")
                .with_rows(pre, post)
        })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Round trip through extent ↔ ratio
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ratio_round_trip_is_stable(g in any_geometry(), d in -3000.0f64..3000.0) {
        if let Some(ratio) = g.ratio_for_extent(d) {
            let again = g.ratio_for_extent(g.drag_extent_for(ratio));
            prop_assert!(again.is_some(), "round trip lost the ratio for d={}", d);
            let again = again.unwrap_or_default();
            prop_assert!(close(ratio, again), "ratio {} became {}", ratio, again);

            let twice = g
                .ratio_for_extent(g.drag_extent_for(again))
                .unwrap_or_default();
            prop_assert!(close(again, twice), "second pass drifted: {} → {}", again, twice);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Absent ratio toward missing rows
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ratio_absent_toward_missing_row(g in any_geometry(), d in -3000.0f64..3000.0) {
        let result = g.ratio_for_extent(d);
        if (d > 0.0 && !g.has_pre_row()) || (d < 0.0 && !g.has_post_row()) {
            prop_assert_eq!(result, None);
        } else {
            prop_assert!(result.is_some());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Toggle table
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn toggle_target_follows_table(
        g in any_geometry(),
        ratio in -1.0f64..=1.0,
        forwarding in any::<bool>(),
    ) {
        let direction = SlideDirection::from_ratio(ratio, g.axis());
        let target = g.toggle_target(direction, ratio, forwarding);
        let expected = match direction.position() {
            Some(position) if forwarding && g.has_row(position) => position.sign(),
            _ => 0.0,
        };
        prop_assert_eq!(target, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Direction agrees with ratio sign
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn direction_agrees_with_sign(ratio in -1.0f64..=1.0, axis in any_axis()) {
        let direction = SlideDirection::from_ratio(ratio, axis);
        prop_assert_eq!(direction.position(), ActionPosition::from_ratio(ratio));
    }
}

#[test]
fn toggle_table_all_directions() {
    let horizontal = PanelGeometry::new(Size::new(400.0, 60.0), Axis::Horizontal, 0.5)
        .expect("valid geometry")
        .with_rows(true, true);
    let vertical = PanelGeometry::new(Size::new(60.0, 400.0), Axis::Vertical, 0.5)
        .expect("valid geometry")
        .with_rows(true, true);

    let cases = [
        (horizontal, 0.3, true, 1.0),
        (horizontal, 0.3, false, 0.0),
        (horizontal, -0.3, true, -1.0),
        (horizontal, -0.3, false, 0.0),
        (vertical, 0.3, true, 1.0),
        (vertical, 0.3, false, 0.0),
        (vertical, -0.3, true, -1.0),
        (vertical, -0.3, false, 0.0),
        (horizontal, 0.0, true, 0.0),
        (horizontal, 0.0, false, 0.0),
    ];
    for (g, ratio, forwarding, expected) in cases {
        let direction = SlideDirection::from_ratio(ratio, g.axis());
        assert_eq!(
            g.toggle_target(direction, ratio, forwarding),
            expected,
            "{direction:?} forwarding={forwarding}"
        );
    }
}
