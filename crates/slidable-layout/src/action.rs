#![forbid(unsafe_code)]

//! Declarative description of how an action row lays out its items.

use serde::{Deserialize, Serialize};
use slidable_core::geometry::ActionPosition;

/// How action items move as the row is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMotion {
    /// Items sit in place under the main content and are uncovered.
    #[default]
    Behind,
    /// Items spread out with the reveal, compressing toward the edge as it closes.
    Stretch,
    /// Like `Stretch`, items pull apart from the edge like drawers.
    Drawer,
    /// Items keep fixed spacing and the whole row slides in.
    Scroll,
}

impl ActionMotion {
    /// Whether each item's advance is scaled by the reveal amount.
    #[inline]
    #[must_use]
    pub const fn scales_with_reveal(self) -> bool {
        matches!(self, Self::Stretch | Self::Drawer)
    }

    /// Whether the row origin is shifted by `total × (reveal - 1)` at `position`.
    #[inline]
    #[must_use]
    pub const fn shifts_origin(self, position: ActionPosition) -> bool {
        matches!(
            (self, position),
            (Self::Scroll, ActionPosition::Pre) | (Self::Behind, ActionPosition::Post)
        )
    }
}

/// How row space is divided among items when nothing is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionAlignment {
    /// Equal shares; item flex values are ignored.
    #[default]
    SpaceEvenly,
    /// Shares proportional to each item's flex (default 1).
    Flex,
}

/// Motion + alignment pair for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionLayout {
    pub motion: ActionMotion,
    pub alignment: ActionAlignment,
}

impl ActionLayout {
    /// Create a layout descriptor.
    #[must_use]
    pub const fn new(motion: ActionMotion, alignment: ActionAlignment) -> Self {
        Self { motion, alignment }
    }

    /// Replace the motion (builder pattern).
    #[must_use]
    pub const fn motion(mut self, motion: ActionMotion) -> Self {
        self.motion = motion;
        self
    }

    /// Replace the alignment (builder pattern).
    #[must_use]
    pub const fn alignment(mut self, alignment: ActionAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}
