//! Property-based invariant tests for row expansion and the slide ratio.
//!
//! 1. No expanded index implies zero progress, after any operation sequence.
//! 2. Progress stays within `[0, 1]`.
//! 3. Once the ticker runs long enough every fling settles at 0 or 1.
//! 4. The slide ratio stays within `[-1, 1]` and never points at a side
//!    without a row, whatever the drag deltas.

use std::time::Duration;

use proptest::prelude::*;
use slidable_core::geometry::{ActionPosition, Axis, PanelGeometry, Size};
use slidable_runtime::{ActionController, SlideController, SlideControllerConfig, Ticker};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
enum Op {
    Expand(usize),
    Collapse(usize),
    Toggle(usize),
    Reset,
    Tick(u8),
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(Op::Expand),
        (0usize..4).prop_map(Op::Collapse),
        (0usize..4).prop_map(Op::Toggle),
        Just(Op::Reset),
        (1u8..12).prop_map(Op::Tick),
    ]
}

fn apply(ticker: &Ticker, ctl: &ActionController, op: &Op) {
    match *op {
        Op::Expand(i) => ctl.expand(i),
        Op::Collapse(i) => ctl.collapse(i),
        Op::Toggle(i) => ctl.toggle(i),
        Op::Reset => ctl.reset(),
        Op::Tick(frames) => {
            for _ in 0..frames {
                ticker.tick(FRAME);
            }
        }
    }
}

#[derive(Debug, Clone)]
enum DragOp {
    Start,
    Update(f64),
    End,
    Tick(u8),
}

fn any_drag_op() -> impl Strategy<Value = DragOp> {
    prop_oneof![
        Just(DragOp::Start),
        (-400.0f64..400.0).prop_map(DragOp::Update),
        Just(DragOp::End),
        (1u8..8).prop_map(DragOp::Tick),
    ]
}

proptest! {
    #[test]
    fn no_index_means_no_progress(ops in prop::collection::vec(any_op(), 1..40)) {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        for op in &ops {
            apply(&ticker, &ctl, op);
            let progress = ctl.progress();
            prop_assert!((0.0..=1.0).contains(&progress), "progress {} after {:?}", progress, op);
            if ctl.index().is_none() {
                prop_assert_eq!(progress, 0.0, "after {:?}", op);
            }
        }
    }

    #[test]
    fn flings_settle_on_a_bound(ops in prop::collection::vec(any_op(), 1..20)) {
        let ticker = Ticker::new();
        let ctl = ActionController::new(&ticker);
        for op in &ops {
            apply(&ticker, &ctl, op);
        }
        for _ in 0..200 {
            ticker.tick(FRAME);
        }
        prop_assert!(!ctl.is_animating());
        let progress = ctl.progress();
        prop_assert!(progress == 0.0 || progress == 1.0, "settled at {}", progress);
        if progress == 1.0 {
            prop_assert!(ctl.index().is_some());
        }
    }

    #[test]
    fn ratio_respects_rows(
        pre in any::<bool>(),
        post in any::<bool>(),
        ops in prop::collection::vec(any_drag_op(), 1..40),
    ) {
        let ticker = Ticker::new();
        let ctl = SlideController::new(&ticker, SlideControllerConfig::default())
            .expect("default config is valid");
        let geometry = PanelGeometry::new(Size::new(400.0, 60.0), Axis::Horizontal, 0.6)
            .expect("valid geometry")
            .with_rows(pre, post);
        ctl.set_geometry(geometry);

        for op in &ops {
            match *op {
                DragOp::Start => {
                    ctl.drag_start();
                }
                DragOp::Update(delta) => ctl.drag_update(delta),
                DragOp::End => ctl.drag_end(),
                DragOp::Tick(frames) => {
                    for _ in 0..frames {
                        ticker.tick(FRAME);
                    }
                }
            }
            let ratio = ctl.ratio();
            prop_assert!((-1.0..=1.0).contains(&ratio));
            if let Some(position) = ActionPosition::from_ratio(ratio) {
                prop_assert!(geometry.has_row(position), "ratio {} without row", ratio);
            }
        }
    }
}
