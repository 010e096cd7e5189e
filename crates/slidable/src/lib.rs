#![forbid(unsafe_code)]

//! Slidable panel public facade crate.
//!
//! Re-exports the types most hosts need from the geometry, layout, and
//! runtime crates, plus a prelude for day-to-day use.
//!
//! ```ignore
//! use slidable::prelude::*;
//!
//! let ticker = Ticker::new();
//! let controller = SlideController::new(&ticker, SlideControllerConfig::default())?;
//! let mut panel = SlidablePanel::new(controller, PanelConfig::default(), |c: BoxConstraints| c.biggest())?
//!     .post_actions(vec![ActionItem::new(|c: BoxConstraints| c.biggest())]);
//! panel.layout(BoxConstraints::tight(Size::new(360.0, 64.0)));
//! panel.controller().open(ActionPosition::Post, None);
//! ticker.tick(std::time::Duration::from_millis(16));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use slidable_core::animation::{Animation, Curve, EasingFn, Fling, Tween};
pub use slidable_core::geometry::{
    ActionPosition, Axis, BoxConstraints, DEFAULT_MAX_SLIDE_THRESHOLD, GeometryError, Offset,
    PanelGeometry, Size, SlideDirection,
};

// --- Layout re-exports -----------------------------------------------------

pub use slidable_layout::{
    ActionAlignment, ActionLayout, ActionMotion, ItemExpansion, ItemPlacement, PanelLayout,
    RowSlot,
};

// --- Runtime re-exports ----------------------------------------------------

pub use slidable_runtime::{
    ActionController, ActionItem, AnimationController, ConfigError, DragSession, MotionTimings,
    Observable, OnSettled, PanelChild, PanelConfig, PanelPainter, SlidableConfig, SlidablePanel,
    SlideController, SlideControllerConfig, SlideGesture, SlidePhase, Subscription, Ticker,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for slidable hosts.
#[derive(Debug)]
pub enum Error {
    /// Panel geometry rejected.
    Geometry(GeometryError),
    /// Controller or panel configuration rejected, or a config file failed to load.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for slidable APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a controller and panel from one [`SlidableConfig`].
///
/// The config is validated as a whole first, so every problem is reported
/// together rather than one constructor at a time.
pub fn build_panel(
    ticker: &Ticker,
    config: SlidableConfig,
    main: impl PanelChild + 'static,
) -> Result<SlidablePanel> {
    let config = config.validated()?;
    let controller =
        SlideController::new(ticker, config.controller)?.with_timings(config.timings);
    Ok(SlidablePanel::new(controller, config.panel, main)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionItem, ActionPosition, Axis, BoxConstraints, Error, Offset, PanelConfig, Result,
        Size, SlidablePanel, SlideController, SlideControllerConfig, SlideGesture, SlidePhase,
        Ticker, build_panel,
    };

    pub use crate::{core, layout, runtime};
}

pub use slidable_core as core;
pub use slidable_layout as layout;
pub use slidable_runtime as runtime;
