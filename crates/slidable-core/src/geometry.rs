#![forbid(unsafe_code)]

//! Geometric primitives and the slide ratio model.
//!
//! All extents are logical pixels stored as `f64`. A panel slides along a
//! single [`Axis`]; the signed slide ratio in `[-1, 1]` selects which action
//! row is revealed (positive = [`ActionPosition::Pre`], negative =
//! [`ActionPosition::Post`]) and how deep.
//!
//! # Invariants
//!
//! 1. `PanelGeometry::max_slide_threshold()` is always in `[0, 1]`.
//! 2. `PanelGeometry::ratio_for_extent(d)` is `None` whenever `d > 0` and the
//!    panel has no pre row, or `d < 0` and it has no post row.
//! 3. `SlideDirection` is a pure function of `(ratio sign, axis)`.

use std::fmt;
use std::ops::{Add, Neg};

use serde::{Deserialize, Serialize};

/// Fraction of the main-axis extent the action rows may occupy by default.
pub const DEFAULT_MAX_SLIDE_THRESHOLD: f64 = 0.6;

/// Axis along which a panel slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Slides left/right; width is the main extent.
    #[default]
    Horizontal,
    /// Slides up/down; height is the main extent.
    Vertical,
}

impl Axis {
    /// Extent of `size` along this axis.
    #[inline]
    #[must_use]
    pub const fn main_extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` across this axis.
    #[inline]
    #[must_use]
    pub const fn cross_extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Component of a 2D delta that drives sliding.
    #[inline]
    #[must_use]
    pub const fn main_component(self, delta: Offset) -> f64 {
        match self {
            Self::Horizontal => delta.dx,
            Self::Vertical => delta.dy,
        }
    }

    /// An offset of `main` along this axis and zero across it.
    #[inline]
    #[must_use]
    pub const fn offset(self, main: f64) -> Offset {
        match self {
            Self::Horizontal => Offset::new(main, 0.0),
            Self::Vertical => Offset::new(0.0, main),
        }
    }

    /// Build a size from main/cross extents.
    #[inline]
    #[must_use]
    pub const fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Zero-area size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (or negative).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Relative position of a child inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new offset.
    #[inline]
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

/// Box layout constraints handed from parent to child.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxConstraints {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl BoxConstraints {
    /// Constraints that only admit exactly `size`.
    #[must_use]
    pub const fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            max_width: size.width,
            min_height: size.height,
            max_height: size.height,
        }
    }

    /// Tight constraints expressed along an axis.
    #[must_use]
    pub const fn tight_for(axis: Axis, main: f64, cross: f64) -> Self {
        Self::tight(axis.size(main, cross))
    }

    /// Constraints admitting anything from zero up to `size`.
    #[must_use]
    pub const fn loose(size: Size) -> Self {
        Self {
            min_width: 0.0,
            max_width: size.width,
            min_height: 0.0,
            max_height: size.height,
        }
    }

    /// Whether exactly one size satisfies these constraints.
    #[must_use]
    pub fn is_tight(&self) -> bool {
        self.min_width >= self.max_width && self.min_height >= self.max_height
    }

    /// Largest admitted size.
    #[must_use]
    pub const fn biggest(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }

    /// Smallest admitted size.
    #[must_use]
    pub const fn smallest(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// Clamp `size` into these constraints.
    #[must_use]
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min_width, self.max_width.max(self.min_width)),
            size.height.clamp(self.min_height, self.max_height.max(self.min_height)),
        )
    }
}

/// Side of the main content an action row occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPosition {
    /// Leading side (left or top); revealed by positive ratios.
    Pre,
    /// Trailing side (right or bottom); revealed by negative ratios.
    Post,
}

impl ActionPosition {
    /// Both positions, pre first.
    pub const ALL: [Self; 2] = [Self::Pre, Self::Post];

    /// Sign of the ratio that reveals this position.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Pre => 1.0,
            Self::Post => -1.0,
        }
    }

    /// Position revealed by `ratio`, if any.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Option<Self> {
        if ratio > 0.0 {
            Some(Self::Pre)
        } else if ratio < 0.0 {
            Some(Self::Post)
        } else {
            None
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Pre => Self::Post,
            Self::Post => Self::Pre,
        }
    }
}

/// Direction the main content currently sits relative to rest.
///
/// Never stored; always derived via [`SlideDirection::from_ratio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlideDirection {
    #[default]
    Idle,
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl SlideDirection {
    /// Derive the direction from the ratio sign and the axis.
    #[must_use]
    pub fn from_ratio(ratio: f64, axis: Axis) -> Self {
        match (ActionPosition::from_ratio(ratio), axis) {
            (None, _) => Self::Idle,
            (Some(ActionPosition::Pre), Axis::Horizontal) => Self::LeftToRight,
            (Some(ActionPosition::Post), Axis::Horizontal) => Self::RightToLeft,
            (Some(ActionPosition::Pre), Axis::Vertical) => Self::TopToBottom,
            (Some(ActionPosition::Post), Axis::Vertical) => Self::BottomToTop,
        }
    }

    /// Position this direction reveals.
    #[must_use]
    pub const fn position(self) -> Option<ActionPosition> {
        match self {
            Self::Idle => None,
            Self::LeftToRight | Self::TopToBottom => Some(ActionPosition::Pre),
            Self::RightToLeft | Self::BottomToTop => Some(ActionPosition::Post),
        }
    }
}

/// Rejected panel geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// `max_slide_threshold` was outside `[0, 1]` or not finite.
    InvalidThreshold { value: f64 },
    /// Size had a negative or non-finite dimension.
    InvalidSize { width: f64, height: f64 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { value } => {
                write!(f, "max slide threshold must be in [0, 1], got {value}")
            }
            Self::InvalidSize { width, height } => {
                write!(f, "panel size must be finite and non-negative, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Immutable snapshot of the panel's sizing, recomputed every layout pass.
///
/// Owned by the panel coordinator and replaced wholesale; the slide state
/// machine and the row layout only ever read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    size: Size,
    has_pre_row: bool,
    has_post_row: bool,
    axis: Axis,
    max_slide_threshold: f64,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            has_pre_row: false,
            has_post_row: false,
            axis: Axis::Horizontal,
            max_slide_threshold: DEFAULT_MAX_SLIDE_THRESHOLD,
        }
    }
}

impl PanelGeometry {
    /// Create a geometry with no action rows.
    pub fn new(size: Size, axis: Axis, max_slide_threshold: f64) -> Result<Self, GeometryError> {
        if !size.is_valid() {
            return Err(GeometryError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        if !(0.0..=1.0).contains(&max_slide_threshold) {
            return Err(GeometryError::InvalidThreshold {
                value: max_slide_threshold,
            });
        }
        Ok(Self {
            size,
            has_pre_row: false,
            has_post_row: false,
            axis,
            max_slide_threshold,
        })
    }

    /// Declare which action rows exist (builder pattern).
    #[must_use]
    pub const fn with_rows(mut self, has_pre_row: bool, has_post_row: bool) -> Self {
        self.has_pre_row = has_pre_row;
        self.has_post_row = has_post_row;
        self
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    #[must_use]
    pub const fn max_slide_threshold(&self) -> f64 {
        self.max_slide_threshold
    }

    #[inline]
    #[must_use]
    pub const fn has_pre_row(&self) -> bool {
        self.has_pre_row
    }

    #[inline]
    #[must_use]
    pub const fn has_post_row(&self) -> bool {
        self.has_post_row
    }

    /// Whether a row exists at `position`.
    #[inline]
    #[must_use]
    pub const fn has_row(&self, position: ActionPosition) -> bool {
        match position {
            ActionPosition::Pre => self.has_pre_row,
            ActionPosition::Post => self.has_post_row,
        }
    }

    /// Panel extent along the slide axis.
    #[inline]
    #[must_use]
    pub const fn main_extent(&self) -> f64 {
        self.axis.main_extent(self.size)
    }

    /// Panel extent across the slide axis.
    #[inline]
    #[must_use]
    pub const fn cross_extent(&self) -> f64 {
        self.axis.cross_extent(self.size)
    }

    /// Distance the main content travels between ratio 0 and ratio ±1.
    #[inline]
    #[must_use]
    pub fn slide_extent(&self) -> f64 {
        self.main_extent() * self.max_slide_threshold
    }

    /// Whether any drag can move this panel.
    #[must_use]
    pub fn can_slide(&self) -> bool {
        self.slide_extent() > 0.0 && (self.has_pre_row || self.has_post_row)
    }

    /// Convert an accumulated drag distance into an unclamped ratio.
    ///
    /// `None` means "slide toward a side with nothing to reveal": the caller
    /// must treat the drag as a no-op. Callers clamp `Some` results to
    /// `[-1, 1]`.
    #[must_use]
    pub fn ratio_for_extent(&self, drag_extent: f64) -> Option<f64> {
        if (drag_extent > 0.0 && !self.has_pre_row) || (drag_extent < 0.0 && !self.has_post_row) {
            return None;
        }
        let extent = self.slide_extent();
        if extent <= 0.0 {
            return None;
        }
        Some(drag_extent / extent)
    }

    /// Drag distance that produces `ratio`; inverse of
    /// [`ratio_for_extent`](Self::ratio_for_extent).
    #[must_use]
    pub fn drag_extent_for(&self, ratio: f64) -> f64 {
        ratio * self.slide_extent()
    }

    /// Ratio that fully opens `position`, or `None` if that row is absent.
    #[must_use]
    pub fn open_target(&self, position: ActionPosition) -> Option<f64> {
        self.has_row(position).then_some(position.sign())
    }

    /// Ratio a released drag should settle on.
    ///
    /// Moving away from rest (`forwarding`) opens the side the panel is on;
    /// moving back closes it. The result is forced to 0 when the implied side
    /// has no row. `direction` must be the one derived from `ratio`.
    #[must_use]
    pub fn toggle_target(&self, direction: SlideDirection, ratio: f64, forwarding: bool) -> f64 {
        debug_assert!(
            direction == SlideDirection::Idle
                || direction == SlideDirection::from_ratio(ratio, self.axis),
            "direction {direction:?} disagrees with ratio {ratio}"
        );
        let Some(position) = direction.position() else {
            return 0.0;
        };
        if forwarding && self.has_row(position) {
            position.sign()
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
