#![forbid(unsafe_code)]

//! Configuration errors.

use std::fmt;

use slidable_core::GeometryError;

/// Rejected controller or panel configuration, or a config file that could
/// not be loaded.
#[derive(Debug)]
pub enum ConfigError {
    /// `slide_tolerance` outside `[0, 1]` or not finite.
    InvalidTolerance { value: f64 },
    /// `max_slide_threshold` outside `[0, 1]` or not finite.
    InvalidThreshold { value: f64 },
    /// `expansion_fling_velocity` not strictly positive and finite.
    InvalidFlingVelocity { value: f64 },
    /// I/O error reading a config file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Everything `validate()` reported.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTolerance { value } => {
                write!(f, "slide tolerance must be in [0, 1], got {value}")
            }
            Self::InvalidThreshold { value } => {
                write!(f, "max slide threshold must be in [0, 1], got {value}")
            }
            Self::InvalidFlingVelocity { value } => {
                write!(f, "expansion fling velocity must be positive, got {value}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for ConfigError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::InvalidThreshold { value } => Self::InvalidThreshold { value },
            other => Self::Validation(vec![other.to_string()]),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
