#![forbid(unsafe_code)]

//! Panel coordinator: main content plus pre/post action rows.
//!
//! A [`SlidablePanel`] owns three explicit slots: the main content and one
//! action row on each side. On [`layout`](SlidablePanel::layout) the main
//! content always receives the panel's full incoming constraints, the
//! resulting [`PanelGeometry`] is pushed into the [`SlideController`], and
//! each row is solved against the constraints [`PanelLayout`] gives it.
//!
//! Between layouts the panel tracks which rows went stale:
//! - a ratio change marks the row on the ratio's side (and the side it left)
//!   and flags the main content for repaint;
//! - an expansion index or progress change marks that row only.
//!
//! [`flush_layout`](SlidablePanel::flush_layout) re-solves just the stale
//! rows, so expansion animations never relayout the main content.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use slidable_core::geometry::{ActionPosition, Axis, BoxConstraints, Offset, PanelGeometry, Size};
use slidable_layout::{
    ItemExpansion, ItemPlacement, PanelLayout, RowLayoutCache, RowLayoutInput, RowSlot,
};
use tracing::{debug, debug_span, trace, warn};

use crate::config::PanelConfig;
use crate::error::ConfigError;
use crate::reactive::Subscription;
use crate::slide::SlideController;

/// A child the panel can size.
pub trait PanelChild {
    /// Lay out under `constraints` and report the chosen size.
    fn perform_layout(&mut self, constraints: BoxConstraints) -> Size;
}

impl<F> PanelChild for F
where
    F: FnMut(BoxConstraints) -> Size,
{
    fn perform_layout(&mut self, constraints: BoxConstraints) -> Size {
        self(constraints)
    }
}

/// Receives the panel's paint calls, back to front.
pub trait PanelPainter {
    /// One visible action item, at its panel-relative offset.
    fn paint_action(&mut self, position: ActionPosition, index: usize, offset: Offset, size: Size);

    /// The main content, at its current slide offset.
    fn paint_main(&mut self, offset: Offset, size: Size);
}

/// Drag input projected by the host's gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideGesture {
    Start,
    /// Movement since the previous update; only the slide axis component is used.
    Update { delta: Offset },
    End,
}

/// One action row entry with its parent data.
pub struct ActionItem {
    child: Box<dyn PanelChild>,
    flex: Option<u32>,
    placement: Option<ItemPlacement>,
}

impl fmt::Debug for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("flex", &self.flex)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

impl ActionItem {
    #[must_use]
    pub fn new(child: impl PanelChild + 'static) -> Self {
        Self {
            child: Box::new(child),
            flex: None,
            placement: None,
        }
    }

    /// Share weight under `ActionAlignment::Flex` (builder pattern).
    #[must_use]
    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }

    /// Placement from the last row pass; `None` while the row is hidden.
    #[must_use]
    pub fn placement(&self) -> Option<ItemPlacement> {
        self.placement
    }
}

/// Which rows a [`SlidablePanel::flush_layout`] re-solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowRelayout {
    pub pre: bool,
    pub post: bool,
}

impl RowRelayout {
    #[must_use]
    pub fn any(&self) -> bool {
        self.pre || self.post
    }

    fn mark(&mut self, position: ActionPosition) {
        match position {
            ActionPosition::Pre => self.pre = true,
            ActionPosition::Post => self.post = true,
        }
    }
}

#[derive(Debug, Default)]
struct DirtyFlags {
    pre: Cell<bool>,
    post: Cell<bool>,
    paint: Cell<bool>,
    last_ratio: Cell<f64>,
}

impl DirtyFlags {
    fn mark(&self, position: ActionPosition) {
        match position {
            ActionPosition::Pre => self.pre.set(true),
            ActionPosition::Post => self.post.set(true),
        }
    }

    fn take(&self, position: ActionPosition) -> bool {
        match position {
            ActionPosition::Pre => self.pre.replace(false),
            ActionPosition::Post => self.post.replace(false),
        }
    }

    fn is_dirty(&self, position: ActionPosition) -> bool {
        match position {
            ActionPosition::Pre => self.pre.get(),
            ActionPosition::Post => self.post.get(),
        }
    }

    fn on_ratio(&self, ratio: f64) {
        let previous = self.last_ratio.replace(ratio);
        for position in [
            ActionPosition::from_ratio(previous),
            ActionPosition::from_ratio(ratio),
        ]
        .into_iter()
        .flatten()
        {
            self.mark(position);
        }
        self.paint.set(true);
    }
}

/// Slidable panel coordinator.
pub struct SlidablePanel {
    config: PanelConfig,
    controller: SlideController,
    main: Box<dyn PanelChild>,
    main_size: Size,
    pre: Vec<ActionItem>,
    post: Vec<ActionItem>,
    pass: Option<PanelLayout>,
    cache: RowLayoutCache,
    dirty: Rc<DirtyFlags>,
    on_slide_start: Option<Box<dyn FnMut()>>,
    _subscriptions: Vec<Subscription>,
}

impl fmt::Debug for SlidablePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidablePanel")
            .field("config", &self.config)
            .field("controller", &self.controller)
            .field("pre", &self.pre.len())
            .field("post", &self.post.len())
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

impl SlidablePanel {
    /// Panel around `main`, driven by `controller`.
    pub fn new(
        controller: SlideController,
        config: PanelConfig,
        main: impl PanelChild + 'static,
    ) -> Result<Self, ConfigError> {
        config.check()?;
        let dirty = Rc::new(DirtyFlags::default());
        dirty.last_ratio.set(controller.ratio());

        let mut subscriptions = Vec::new();
        let flags = Rc::clone(&dirty);
        subscriptions.push(controller.subscribe_ratio(move |&ratio| flags.on_ratio(ratio)));
        for position in ActionPosition::ALL {
            if let Some(actions) = controller.action_controller(position) {
                let flags = Rc::clone(&dirty);
                subscriptions.push(actions.subscribe_index(move |_| flags.mark(position)));
                let flags = Rc::clone(&dirty);
                subscriptions.push(actions.subscribe_progress(move |_| flags.mark(position)));
            }
        }
        debug!(axis = ?config.axis, threshold = config.max_slide_threshold, "panel created");

        Ok(Self {
            config,
            controller,
            main: Box::new(main),
            main_size: Size::ZERO,
            pre: Vec::new(),
            post: Vec::new(),
            pass: None,
            cache: RowLayoutCache::default(),
            dirty,
            on_slide_start: None,
            _subscriptions: subscriptions,
        })
    }

    /// Set the pre row items (builder pattern).
    #[must_use]
    pub fn pre_actions(mut self, items: Vec<ActionItem>) -> Self {
        self.pre = items;
        self.dirty.mark(ActionPosition::Pre);
        self
    }

    /// Set the post row items (builder pattern).
    #[must_use]
    pub fn post_actions(mut self, items: Vec<ActionItem>) -> Self {
        self.post = items;
        self.dirty.mark(ActionPosition::Post);
        self
    }

    /// Called whenever a drag actually starts (builder pattern).
    #[must_use]
    pub fn on_slide_start(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_slide_start = Some(Box::new(callback));
        self
    }

    // -- Accessors --------------------------------------------------------

    #[must_use]
    pub fn controller(&self) -> &SlideController {
        &self.controller
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.config.axis
    }

    /// Panel size from the last layout.
    #[must_use]
    pub fn size(&self) -> Size {
        self.pass.map_or(Size::ZERO, |pass| pass.geometry.size())
    }

    /// Size the main content chose in the last layout.
    #[must_use]
    pub fn main_size(&self) -> Size {
        self.main_size
    }

    /// Most recent panel pass, once laid out.
    #[must_use]
    pub fn layout_pass(&self) -> Option<&PanelLayout> {
        self.pass.as_ref()
    }

    #[must_use]
    pub fn main_offset(&self) -> Offset {
        self.pass.map_or(Offset::ZERO, |pass| pass.main_offset)
    }

    #[must_use]
    pub fn row_slot(&self, position: ActionPosition) -> Option<RowSlot> {
        self.pass.map(|pass| pass.slot(position))
    }

    #[must_use]
    pub fn items(&self, position: ActionPosition) -> &[ActionItem] {
        match position {
            ActionPosition::Pre => &self.pre,
            ActionPosition::Post => &self.post,
        }
    }

    /// Placement of one item from its row's last pass.
    #[must_use]
    pub fn item_placement(&self, position: ActionPosition, index: usize) -> Option<ItemPlacement> {
        self.items(position).get(index).and_then(ActionItem::placement)
    }

    /// Whether anything changed since the last paint.
    #[must_use]
    pub fn needs_paint(&self) -> bool {
        self.dirty.paint.get()
            || self.dirty.is_dirty(ActionPosition::Pre)
            || self.dirty.is_dirty(ActionPosition::Post)
    }

    /// Whether `position` is waiting for a row relayout.
    #[must_use]
    pub fn is_row_dirty(&self, position: ActionPosition) -> bool {
        self.dirty.is_dirty(position)
    }

    // -- Input ------------------------------------------------------------

    /// Feed one drag event. Returns whether the panel consumed it.
    pub fn handle_gesture(&mut self, gesture: SlideGesture) -> bool {
        if self.config.gesture_disabled {
            trace!(?gesture, "gesture ignored; disabled");
            return false;
        }
        match gesture {
            SlideGesture::Start => {
                let started = self.controller.drag_start();
                if started && let Some(callback) = self.on_slide_start.as_mut() {
                    callback();
                }
                started
            }
            SlideGesture::Update { delta } => {
                self.controller
                    .drag_update(self.config.axis.main_component(delta));
                true
            }
            SlideGesture::End => {
                self.controller.drag_end();
                true
            }
        }
    }

    // -- Layout -----------------------------------------------------------

    /// Full layout: main content, geometry, then both rows.
    pub fn layout(&mut self, constraints: BoxConstraints) -> Size {
        let _span = debug_span!("slidable.panel_layout").entered();
        self.main_size = self.main.perform_layout(constraints);
        let size = constraints.constrain(self.main_size);
        let threshold = self.config.max_slide_threshold;
        let geometry = match PanelGeometry::new(size, self.config.axis, threshold) {
            Ok(geometry) => geometry.with_rows(!self.pre.is_empty(), !self.post.is_empty()),
            Err(err) => {
                debug_assert!(false, "panel geometry rejected: {err}");
                warn!(%err, "panel geometry rejected; keeping previous");
                return self.size();
            }
        };
        self.controller.set_geometry(geometry);
        debug!(
            width = size.width,
            height = size.height,
            ratio = self.controller.ratio(),
            "panel layout"
        );
        self.pass = Some(PanelLayout::compute(geometry, self.controller.ratio()));
        for position in ActionPosition::ALL {
            self.dirty.take(position);
            self.layout_row(position);
        }
        self.dirty.paint.set(true);
        size
    }

    /// Re-solve only the rows marked stale since the last pass.
    pub fn flush_layout(&mut self) -> RowRelayout {
        let mut report = RowRelayout::default();
        let Some(pass) = self.pass else {
            return report;
        };
        self.pass = Some(PanelLayout::compute(pass.geometry, self.controller.ratio()));
        for position in ActionPosition::ALL {
            if self.dirty.take(position) {
                self.layout_row(position);
                report.mark(position);
            }
        }
        if report.any() {
            trace!(pre = report.pre, post = report.post, "rows relaid");
        }
        report
    }

    fn layout_row(&mut self, position: ActionPosition) {
        let Some(pass) = self.pass else {
            return;
        };
        let slot = pass.slot(position);
        let expansion = self
            .controller
            .action_controller(position)
            .map_or(ItemExpansion::NONE, |actions| actions.expansion());
        let layout = self.config.layout_for(position);
        let axis = self.config.axis;
        let items = match position {
            ActionPosition::Pre => &mut self.pre,
            ActionPosition::Post => &mut self.post,
        };
        if items.is_empty() {
            return;
        }
        if slot.is_hidden() {
            for item in items.iter_mut() {
                item.placement = None;
            }
            return;
        }

        let flexes: Vec<Option<u32>> = items.iter().map(|item| item.flex).collect();
        let input = RowLayoutInput::new(position, axis, slot.constraints.biggest(), &flexes)
            .layout(layout)
            .expansion(expansion)
            .reveal(slot.reveal);
        let Some(result) = self.cache.layout(&input) else {
            return;
        };
        for (item, placement) in items.iter_mut().zip(&result) {
            item.child.perform_layout(placement.constraints);
            item.placement = Some(*placement);
        }
    }

    // -- Paint ------------------------------------------------------------

    /// Flush stale rows, then paint visible action items and the main content.
    pub fn paint(&mut self, painter: &mut dyn PanelPainter) {
        self.flush_layout();
        let Some(pass) = self.pass else {
            return;
        };
        for position in ActionPosition::ALL {
            let slot = pass.slot(position);
            if slot.is_hidden() {
                continue;
            }
            for (index, item) in self.items(position).iter().enumerate() {
                let Some(placement) = item.placement else {
                    continue;
                };
                if placement.is_collapsed() {
                    continue;
                }
                painter.paint_action(
                    position,
                    index,
                    slot.origin + placement.offset,
                    placement.size(),
                );
            }
        }
        painter.paint_main(pass.main_offset, pass.geometry.size());
        self.dirty.paint.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlideControllerConfig;
    use crate::ticker::Ticker;
    use std::cell::RefCell;
    use std::time::Duration;

    fn fill(constraints: BoxConstraints) -> Size {
        constraints.biggest()
    }

    fn items(n: usize) -> Vec<ActionItem> {
        (0..n).map(|_| ActionItem::new(fill)).collect()
    }

    fn panel(ticker: &Ticker, config: SlideControllerConfig) -> SlidablePanel {
        let controller = SlideController::new(ticker, config).expect("valid config");
        let mut panel = SlidablePanel::new(controller, PanelConfig::default(), fill)
            .expect("valid panel")
            .pre_actions(items(3))
            .post_actions(items(2));
        panel.layout(BoxConstraints::tight(Size::new(500.0, 80.0)));
        panel
    }

    #[derive(Default)]
    struct Recorder {
        actions: Vec<(ActionPosition, usize, Offset, Size)>,
        main: Option<Offset>,
    }

    impl PanelPainter for Recorder {
        fn paint_action(
            &mut self,
            position: ActionPosition,
            index: usize,
            offset: Offset,
            size: Size,
        ) {
            self.actions.push((position, index, offset, size));
        }

        fn paint_main(&mut self, offset: Offset, _size: Size) {
            self.main = Some(offset);
        }
    }

    #[test]
    fn layout_pushes_geometry() {
        let ticker = Ticker::new();
        let panel = panel(&ticker, SlideControllerConfig::default());
        let geometry = panel.controller().geometry();
        assert_eq!(geometry.size(), Size::new(500.0, 80.0));
        assert!(geometry.has_pre_row() && geometry.has_post_row());
        assert_eq!(panel.size(), Size::new(500.0, 80.0));
    }

    #[test]
    fn closed_panel_paints_main_only() {
        let ticker = Ticker::new();
        let mut panel = panel(&ticker, SlideControllerConfig::default());
        let mut painter = Recorder::default();
        panel.paint(&mut painter);
        assert!(painter.actions.is_empty());
        assert_eq!(painter.main, Some(Offset::ZERO));
        assert!(!panel.needs_paint());
        assert_eq!(panel.item_placement(ActionPosition::Pre, 0), None);
    }

    #[test]
    fn drag_relayouts_only_revealed_row() {
        let ticker = Ticker::new();
        let mut panel = panel(&ticker, SlideControllerConfig::default());
        assert!(panel.handle_gesture(SlideGesture::Start));
        panel.handle_gesture(SlideGesture::Update {
            delta: Offset::new(300.0, 12.0),
        });
        assert!(panel.needs_paint());
        assert!(panel.is_row_dirty(ActionPosition::Pre));
        assert!(!panel.is_row_dirty(ActionPosition::Post));
        let report = panel.flush_layout();
        assert_eq!(report, RowRelayout { pre: true, post: false });
        assert_eq!(panel.main_offset(), Offset::new(300.0, 0.0));
        let extents: Vec<f64> = (0..3)
            .filter_map(|i| panel.item_placement(ActionPosition::Pre, i))
            .map(|p| p.size().width)
            .collect();
        assert_eq!(extents, vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn paint_positions_items_from_row_origin() {
        let ticker = Ticker::new();
        let mut panel = panel(&ticker, SlideControllerConfig::default());
        panel.controller().set_ratio(-1.0);
        let mut painter = Recorder::default();
        panel.paint(&mut painter);
        let offsets: Vec<Offset> = painter.actions.iter().map(|a| a.2).collect();
        assert_eq!(offsets, vec![Offset::new(200.0, 0.0), Offset::new(350.0, 0.0)]);
        assert!(painter.actions.iter().all(|a| a.0 == ActionPosition::Post));
        assert_eq!(painter.main, Some(Offset::new(-300.0, 0.0)));
    }

    #[test]
    fn crossing_sides_hides_previous_row() {
        let ticker = Ticker::new();
        let mut panel = panel(&ticker, SlideControllerConfig::default());
        panel.controller().set_ratio(1.0);
        panel.flush_layout();
        assert!(panel.item_placement(ActionPosition::Pre, 0).is_some());
        panel.controller().set_ratio(-0.5);
        let report = panel.flush_layout();
        assert!(report.pre && report.post);
        assert_eq!(panel.item_placement(ActionPosition::Pre, 0), None);
        assert!(panel.item_placement(ActionPosition::Post, 0).is_some());
    }

    #[test]
    fn expansion_marks_only_its_row() {
        let ticker = Ticker::new();
        let config = SlideControllerConfig::default().expansion(true, true);
        let mut panel = panel(&ticker, config);
        panel.controller().set_ratio(1.0);
        panel.flush_layout();
        panel.controller().expand(1);
        assert!(panel.is_row_dirty(ActionPosition::Pre));
        assert!(!panel.is_row_dirty(ActionPosition::Post));
        for _ in 0..200 {
            ticker.tick(Duration::from_millis(16));
        }
        panel.flush_layout();
        let widths: Vec<f64> = (0..3)
            .filter_map(|i| panel.item_placement(ActionPosition::Pre, i))
            .map(|p| p.size().width)
            .collect();
        assert_eq!(widths, vec![0.0, 300.0, 0.0]);
    }

    #[test]
    fn disabled_gestures_are_ignored() {
        let ticker = Ticker::new();
        let controller =
            SlideController::new(&ticker, SlideControllerConfig::default()).expect("valid config");
        let config = PanelConfig::default().gesture_disabled(true);
        let mut panel = SlidablePanel::new(controller, config, fill)
            .expect("valid panel")
            .pre_actions(items(1));
        panel.layout(BoxConstraints::tight(Size::new(200.0, 40.0)));
        assert!(!panel.handle_gesture(SlideGesture::Start));
        panel.handle_gesture(SlideGesture::Update {
            delta: Offset::new(100.0, 0.0),
        });
        assert_eq!(panel.controller().ratio(), 0.0);
    }

    #[test]
    fn slide_start_callback_fires_on_real_drags() {
        let ticker = Ticker::new();
        let starts = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&starts);
        let controller =
            SlideController::new(&ticker, SlideControllerConfig::default()).expect("valid config");
        let mut panel = SlidablePanel::new(controller, PanelConfig::default(), fill)
            .expect("valid panel")
            .on_slide_start(move || *sink.borrow_mut() += 1);
        panel.layout(BoxConstraints::tight(Size::new(200.0, 40.0)));
        assert!(!panel.handle_gesture(SlideGesture::Start));
        assert_eq!(*starts.borrow(), 0);

        let controller =
            SlideController::new(&ticker, SlideControllerConfig::default()).expect("valid config");
        let sink = Rc::clone(&starts);
        let mut panel = SlidablePanel::new(controller, PanelConfig::default(), fill)
            .expect("valid panel")
            .post_actions(items(1))
            .on_slide_start(move || *sink.borrow_mut() += 1);
        panel.layout(BoxConstraints::tight(Size::new(200.0, 40.0)));
        assert!(panel.handle_gesture(SlideGesture::Start));
        assert_eq!(*starts.borrow(), 1);
    }

    #[test]
    fn vertical_panel_uses_dy() {
        let ticker = Ticker::new();
        let controller =
            SlideController::new(&ticker, SlideControllerConfig::default()).expect("valid config");
        let config = PanelConfig::default()
            .axis(Axis::Vertical)
            .max_slide_threshold(0.5);
        let mut panel = SlidablePanel::new(controller, config, fill)
            .expect("valid panel")
            .pre_actions(items(2));
        panel.layout(BoxConstraints::tight(Size::new(80.0, 400.0)));
        panel.handle_gesture(SlideGesture::Start);
        panel.handle_gesture(SlideGesture::Update {
            delta: Offset::new(500.0, 100.0),
        });
        assert_eq!(panel.controller().ratio(), 0.5);
        panel.flush_layout();
        assert_eq!(panel.main_offset(), Offset::new(0.0, 100.0));
    }

    #[test]
    fn invalid_threshold_rejected() {
        let ticker = Ticker::new();
        let controller =
            SlideController::new(&ticker, SlideControllerConfig::default()).expect("valid config");
        let config = PanelConfig::default().max_slide_threshold(1.5);
        let err = SlidablePanel::new(controller, config, fill);
        assert!(matches!(err, Err(ConfigError::InvalidThreshold { .. })));
    }
}
