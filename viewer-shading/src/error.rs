//! Setup-time errors
//!
//! The per-vertex and per-fragment stages never fail; invalid inputs degrade
//! to a discard or a fallback color. Errors only surface while building the
//! inputs those stages read: style palettes and configuration.

use std::path::PathBuf;

use shading_common::{MAX_SHADOW_MAP_SIZE, MAX_STYLE_PALETTE_SIDE};

/// Errors raised while defining styles in a [`crate::style::StylePalette`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// Index above the reserved threshold or outside the palette
    #[error("style index {index} out of range (must be 0-{max})")]
    IndexOutOfRange { index: u32, max: u32 },
}

/// Errors raised while loading or validating a [`crate::config::ShadingConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid shadow map size {0} (must be 1-{max})", max = MAX_SHADOW_MAP_SIZE)]
    InvalidShadowMapSize(u32),

    #[error("invalid palette side {0} (must be 1-{max})", max = MAX_STYLE_PALETTE_SIDE)]
    InvalidPaletteSide(u32),

    /// A negative threshold leaves no usable palette slot
    #[error("invalid reserved threshold {0} (must not be negative)")]
    InvalidReservedThreshold(i32),

    #[error("invalid style entry: {0}")]
    Style(#[from] StyleError),
}
