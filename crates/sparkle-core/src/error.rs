#![forbid(unsafe_code)]

//! Error types.
//!
//! Only [`ConfigError`] is ever surfaced to callers of `apply`. A
//! [`ResourceError`] is recorded on the sprite sheet and degrades rendering to
//! tint-only; it never interrupts the tick loop.

use std::fmt;

/// Invalid effect configuration. The effect is not started.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Particle count must be a positive integer.
    InvalidCount(i64),
    /// Speed must be finite and strictly positive.
    InvalidSpeed(f64),
    /// Overlap must be finite and non-negative.
    InvalidOverlap(f64),
    /// A color palette must name at least one color.
    EmptyPalette,
    /// A color string could not be parsed.
    InvalidColor(String),
    /// Configuration input was not well-formed.
    Malformed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCount(n) => write!(f, "count must be a positive integer (got {n})"),
            Self::InvalidSpeed(v) => write!(f, "speed must be a positive number (got {v})"),
            Self::InvalidOverlap(v) => {
                write!(f, "overlap must be a non-negative number (got {v})")
            }
            Self::EmptyPalette => write!(f, "color palette is empty"),
            Self::InvalidColor(s) => write!(f, "invalid color: {s:?}"),
            Self::Malformed(msg) => write!(f, "malformed configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Sprite atlas could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The host failed to fetch or decode the atlas.
    Load(String),
    /// The atlas is too small to hold every frame.
    AtlasTooSmall { width: u32, height: u32 },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(msg) => write!(f, "sprite atlas failed to load: {msg}"),
            Self::AtlasTooSmall { width, height } => {
                write!(f, "sprite atlas too small ({width}x{height})")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// Crate-level error union.
#[derive(Debug, Clone, PartialEq)]
pub enum SparkleError {
    Config(ConfigError),
    Resource(ResourceError),
}

impl fmt::Display for SparkleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Resource(e) => write!(f, "resource error: {e}"),
        }
    }
}

impl std::error::Error for SparkleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Resource(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SparkleError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ResourceError> for SparkleError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}
