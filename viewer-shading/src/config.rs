//! Shading configuration (`shading.toml`)
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Conversions turn the plain settings into the palette, clip planes and
//! uniforms the stages consume.
//!
//! ```toml
//! [highlight]
//! color = [1.0, 0.0, 0.0, 1.0]
//!
//! [[palette.styles]]
//! index = 10
//! color = [0, 128, 255, 255]
//!
//! [clipping]
//! plane_a = [0.0, 1.0, 0.0, -1.5]
//!
//! [shadow]
//! map_size = 1024
//! convention = "remapped"
//! ```

use std::path::Path;

use glam::Vec4;
use serde::{Deserialize, Serialize};
use shading_common::{
    DEFAULT_HIGHLIGHT_ALPHA_MAX, DEFAULT_HIGHLIGHT_ALPHA_MIN, DEFAULT_SHADOW_BIAS,
    DEFAULT_SHADOW_FLOOR, DEFAULT_SHADOW_INTENSITY, DEFAULT_SHADOW_MAP_SIZE, DepthConvention,
    MAX_SHADOW_MAP_SIZE, MAX_STYLE_PALETTE_SIDE, STYLE_PALETTE_SIDE, STYLE_RESERVED_THRESHOLD,
};

use crate::clip::ClipPlane;
use crate::error::ConfigError;
use crate::raster::CullMode;
use crate::shadow::{ShadowMap, ShadowParams};
use crate::style::{PaletteLayout, StylePalette};
use crate::uniforms::HighlightUniforms;

/// Shading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShadingConfig {
    /// Highlight color and pulse range
    #[serde(default)]
    pub highlight: HighlightConfig,
    /// Style palette layout and style colors
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Section planes
    #[serde(default)]
    pub clipping: ClippingConfig,
    /// Shadow map and filter settings
    #[serde(default)]
    pub shadow: ShadowConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// RGBA highlight color in [0, 1] (default: opaque red)
    #[serde(default = "default_highlight_color")]
    pub color: [f32; 4],
    /// Alpha at phase 0 (default: 0.3)
    #[serde(default = "default_alpha_min")]
    pub alpha_min: f32,
    /// Alpha at phase 1 (default: 0.6)
    #[serde(default = "default_alpha_max")]
    pub alpha_max: f32,
}

/// One `[[palette.styles]]` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub index: u32,
    /// RGBA8 color
    pub color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Palette side in texels (default: 15)
    #[serde(default = "default_palette_side")]
    pub side: u32,
    /// Highest index read from the palette (default: 224)
    #[serde(default = "default_reserved_threshold")]
    pub reserved_threshold: i32,
    #[serde(default)]
    pub styles: Vec<StyleEntry>,
}

/// Up to two clipping planes; an absent plane is disabled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ClippingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane_a: Option<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane_b: Option<[f32; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowConfig {
    /// Master switch (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Shadow intensity in [0, 1]; zero disables shadowing (default: 0.6)
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    /// Depth bias (default: 0.007)
    #[serde(default = "default_bias")]
    pub bias: f32,
    /// Shadow map side in texels (default: 512)
    #[serde(default = "default_map_size")]
    pub map_size: u32,
    /// Brightness floor of fully shadowed fragments (default: 0.5)
    #[serde(default = "default_floor")]
    pub floor: f32,
    /// How depth is stored in the map (default: unit)
    #[serde(default)]
    pub convention: DepthConvention,
    /// Skip back faces in the depth pass (default: false)
    #[serde(default)]
    pub backface_culling: bool,
}

fn default_highlight_color() -> [f32; 4] {
    [1.0, 0.0, 0.0, 1.0]
}
fn default_alpha_min() -> f32 {
    DEFAULT_HIGHLIGHT_ALPHA_MIN
}
fn default_alpha_max() -> f32 {
    DEFAULT_HIGHLIGHT_ALPHA_MAX
}

fn default_palette_side() -> u32 {
    STYLE_PALETTE_SIDE
}
fn default_reserved_threshold() -> i32 {
    STYLE_RESERVED_THRESHOLD
}

fn default_true() -> bool {
    true
}
fn default_intensity() -> f32 {
    DEFAULT_SHADOW_INTENSITY
}
fn default_bias() -> f32 {
    DEFAULT_SHADOW_BIAS
}
fn default_map_size() -> u32 {
    DEFAULT_SHADOW_MAP_SIZE
}
fn default_floor() -> f32 {
    DEFAULT_SHADOW_FLOOR
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            color: default_highlight_color(),
            alpha_min: default_alpha_min(),
            alpha_max: default_alpha_max(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            side: default_palette_side(),
            reserved_threshold: default_reserved_threshold(),
            styles: Vec::new(),
        }
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            intensity: default_intensity(),
            bias: default_bias(),
            map_size: default_map_size(),
            floor: default_floor(),
            convention: DepthConvention::default(),
            backface_culling: false,
        }
    }
}

impl PaletteConfig {
    pub fn layout(&self) -> PaletteLayout {
        PaletteLayout {
            side: self.side,
            reserved_threshold: self.reserved_threshold,
        }
    }
}

impl ShadowConfig {
    /// Shadows run only when switched on with a non-zero intensity
    pub fn is_effective(&self) -> bool {
        self.enabled && self.intensity.clamp(0.0, 1.0) != 0.0
    }
}

impl ShadingConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded shading config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the stages cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SHADOW_MAP_SIZE).contains(&self.shadow.map_size) {
            return Err(ConfigError::InvalidShadowMapSize(self.shadow.map_size));
        }
        if !(1..=MAX_STYLE_PALETTE_SIDE).contains(&self.palette.side) {
            return Err(ConfigError::InvalidPaletteSide(self.palette.side));
        }
        if self.palette.reserved_threshold < 0 {
            return Err(ConfigError::InvalidReservedThreshold(
                self.palette.reserved_threshold,
            ));
        }
        self.build_palette()?;

        if self.highlight.alpha_min > self.highlight.alpha_max {
            tracing::warn!(
                "highlight alpha_min {} exceeds alpha_max {}; the pulse runs backwards",
                self.highlight.alpha_min,
                self.highlight.alpha_max
            );
        }
        Ok(())
    }

    /// Palette holding every configured style
    pub fn build_palette(&self) -> Result<StylePalette, ConfigError> {
        let mut palette = StylePalette::new(self.palette.layout());
        for entry in &self.palette.styles {
            palette.define_style(entry.index, entry.color)?;
        }
        Ok(palette)
    }

    pub fn clip_planes(&self) -> [ClipPlane; 2] {
        [self.clipping.plane_a, self.clipping.plane_b].map(|plane| {
            plane
                .map(|equation| ClipPlane::new(Vec4::from_array(equation)))
                .unwrap_or_default()
        })
    }

    pub fn shadow_params(&self) -> ShadowParams {
        ShadowParams {
            enabled: self.shadow.is_effective(),
            bias: self.shadow.bias,
            map_size: self.shadow.map_size as f32,
            floor: self.shadow.floor,
        }
    }

    /// Empty shadow map sized and encoded as configured
    pub fn shadow_map(&self) -> ShadowMap {
        ShadowMap::new(self.shadow.map_size, self.shadow.convention)
    }

    /// Face culling for the depth pass
    pub fn shadow_cull_mode(&self) -> CullMode {
        if self.shadow.backface_culling {
            CullMode::Back
        } else {
            CullMode::None
        }
    }

    /// Highlight uniforms at a given pulse phase
    pub fn highlight_uniforms(&self, phase: f32) -> HighlightUniforms {
        HighlightUniforms {
            color: Vec4::from_array(self.highlight.color),
            alpha_min: self.highlight.alpha_min,
            alpha_max: self.highlight.alpha_max,
            phase,
        }
    }
}
