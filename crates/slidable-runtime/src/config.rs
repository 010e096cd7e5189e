#![forbid(unsafe_code)]

//! Controller, panel, and timing configuration.
//!
//! Every config has a `Default` matching the stock behaviour and a
//! `validate()` returning human-readable problems. With the `config` feature
//! the structs derive serde (missing fields fall back to defaults) and
//! [`SlidableConfig`] can be loaded from TOML or JSON.
//!
//! # Example (TOML)
//!
//! ```toml
//! [controller]
//! slide_tolerance = 0.2
//! initial_position = "pre"
//!
//! [panel]
//! axis = "vertical"
//! max_slide_threshold = 0.5
//!
//! [panel.pre_layout]
//! motion = "drawer"
//!
//! [timings]
//! open_ms = 250
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use slidable_core::animation::{Curve, EasingFn};
use slidable_core::geometry::{ActionPosition, Axis, DEFAULT_MAX_SLIDE_THRESHOLD};
use slidable_layout::ActionLayout;

use crate::error::ConfigError;

/// Default net drag fraction that commits a release to the toggle target.
pub const DEFAULT_SLIDE_TOLERANCE: f64 = 0.15;

/// Default expansion fling velocity, in progress units per second.
pub const DEFAULT_EXPANSION_FLING_VELOCITY: f64 = 1.0;

fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

// ---------------------------------------------------------------------------
// Slide controller
// ---------------------------------------------------------------------------

/// Settings for [`SlideController`](crate::SlideController).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SlideControllerConfig {
    /// Net fraction of the slide a drag must cover before release commits to
    /// the toggle target instead of snapping back.
    pub slide_tolerance: f64,
    /// Give the pre row an expansion controller.
    pub pre_expansion: bool,
    /// Give the post row an expansion controller.
    pub post_expansion: bool,
    /// Row to show fully open once the first geometry arrives.
    pub initial_position: Option<ActionPosition>,
    /// Reset row expansion when a drag settles the panel closed.
    /// Programmatic `dismiss` always resets.
    pub reset_expansion_on_close: bool,
    /// Fling velocity for expand/collapse.
    pub expansion_fling_velocity: f64,
}

impl Default for SlideControllerConfig {
    fn default() -> Self {
        Self {
            slide_tolerance: DEFAULT_SLIDE_TOLERANCE,
            pre_expansion: false,
            post_expansion: false,
            initial_position: None,
            reset_expansion_on_close: true,
            expansion_fling_velocity: DEFAULT_EXPANSION_FLING_VELOCITY,
        }
    }
}

impl SlideControllerConfig {
    #[must_use]
    pub fn slide_tolerance(mut self, tolerance: f64) -> Self {
        self.slide_tolerance = tolerance;
        self
    }

    /// Enable expansion controllers per row (builder pattern).
    #[must_use]
    pub fn expansion(mut self, pre: bool, post: bool) -> Self {
        self.pre_expansion = pre;
        self.post_expansion = post;
        self
    }

    #[must_use]
    pub fn initial_position(mut self, position: Option<ActionPosition>) -> Self {
        self.initial_position = position;
        self
    }

    #[must_use]
    pub fn reset_expansion_on_close(mut self, reset: bool) -> Self {
        self.reset_expansion_on_close = reset;
        self
    }

    #[must_use]
    pub fn expansion_fling_velocity(mut self, velocity: f64) -> Self {
        self.expansion_fling_velocity = velocity;
        self
    }

    /// Whether `position` has an expansion controller.
    #[must_use]
    pub fn expansion_enabled(&self, position: ActionPosition) -> bool {
        match position {
            ActionPosition::Pre => self.pre_expansion,
            ActionPosition::Post => self.post_expansion,
        }
    }

    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !in_unit_range(self.slide_tolerance) {
            errors.push(format!(
                "slide_tolerance must be in [0, 1], got {}",
                self.slide_tolerance
            ));
        }
        if !(self.expansion_fling_velocity.is_finite() && self.expansion_fling_velocity > 0.0) {
            errors.push(format!(
                "expansion_fling_velocity must be positive, got {}",
                self.expansion_fling_velocity
            ));
        }
        errors
    }

    /// First hard error, as a typed [`ConfigError`].
    pub fn check(&self) -> Result<(), ConfigError> {
        if !in_unit_range(self.slide_tolerance) {
            return Err(ConfigError::InvalidTolerance {
                value: self.slide_tolerance,
            });
        }
        if !(self.expansion_fling_velocity.is_finite() && self.expansion_fling_velocity > 0.0) {
            return Err(ConfigError::InvalidFlingVelocity {
                value: self.expansion_fling_velocity,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// Settings for [`SlidablePanel`](crate::SlidablePanel).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelConfig {
    pub axis: Axis,
    /// Fraction of the main extent the action rows occupy when fully open.
    pub max_slide_threshold: f64,
    pub pre_layout: ActionLayout,
    pub post_layout: ActionLayout,
    /// Ignore drag input entirely.
    pub gesture_disabled: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            max_slide_threshold: DEFAULT_MAX_SLIDE_THRESHOLD,
            pre_layout: ActionLayout::default(),
            post_layout: ActionLayout::default(),
            gesture_disabled: false,
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn max_slide_threshold(mut self, threshold: f64) -> Self {
        self.max_slide_threshold = threshold;
        self
    }

    #[must_use]
    pub fn pre_layout(mut self, layout: ActionLayout) -> Self {
        self.pre_layout = layout;
        self
    }

    #[must_use]
    pub fn post_layout(mut self, layout: ActionLayout) -> Self {
        self.post_layout = layout;
        self
    }

    #[must_use]
    pub fn gesture_disabled(mut self, disabled: bool) -> Self {
        self.gesture_disabled = disabled;
        self
    }

    /// Row layout descriptor for `position`.
    #[must_use]
    pub fn layout_for(&self, position: ActionPosition) -> ActionLayout {
        match position {
            ActionPosition::Pre => self.pre_layout,
            ActionPosition::Post => self.post_layout,
        }
    }

    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        if in_unit_range(self.max_slide_threshold) {
            Vec::new()
        } else {
            vec![format!(
                "max_slide_threshold must be in [0, 1], got {}",
                self.max_slide_threshold
            )]
        }
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if in_unit_range(self.max_slide_threshold) {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold {
                value: self.max_slide_threshold,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Timings
// ---------------------------------------------------------------------------

/// Default durations and curves for slide animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MotionTimings {
    pub open_ms: u64,
    pub open_curve: Curve,
    pub dismiss_ms: u64,
    pub dismiss_curve: Curve,
    /// Drag release, both commit and snap-back.
    pub snap_ms: u64,
    pub snap_curve: Curve,
}

impl Default for MotionTimings {
    fn default() -> Self {
        Self {
            open_ms: 300,
            open_curve: Curve::EaseInOut,
            dismiss_ms: 300,
            dismiss_curve: Curve::EaseInOut,
            snap_ms: 200,
            snap_curve: Curve::Linear,
        }
    }
}

impl MotionTimings {
    #[must_use]
    pub fn open(&self) -> (Duration, EasingFn) {
        (Duration::from_millis(self.open_ms), self.open_curve.easing())
    }

    #[must_use]
    pub fn dismiss(&self) -> (Duration, EasingFn) {
        (Duration::from_millis(self.dismiss_ms), self.dismiss_curve.easing())
    }

    #[must_use]
    pub fn snap(&self) -> (Duration, EasingFn) {
        (Duration::from_millis(self.snap_ms), self.snap_curve.easing())
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Everything needed to build a panel, loadable from one file.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SlidableConfig {
    pub controller: SlideControllerConfig,
    pub panel: PanelConfig,
    pub timings: MotionTimings,
}

impl SlidableConfig {
    /// Parse from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Problems across all sections.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.controller.validate();
        errors.extend(self.panel.validate());
        errors
    }

    /// `Ok(self)` if [`validate`](Self::validate) reports nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
