//! Per-draw uniform parameters
//!
//! Owned by the caller and immutable for the duration of a draw.

use glam::{Mat4, Vec4};
use shading_common::{DEFAULT_HIGHLIGHT_ALPHA_MAX, DEFAULT_HIGHLIGHT_ALPHA_MIN};

use crate::clip::ClipPlane;
use crate::shadow::ShadowParams;

/// Highlight color and pulse parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightUniforms {
    /// Highlight color, used for indices the palette does not cover
    pub color: Vec4,
    pub alpha_min: f32,
    pub alpha_max: f32,
    /// Externally animated pulse phase in [0, 1]
    pub phase: f32,
}

impl Default for HighlightUniforms {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            alpha_min: DEFAULT_HIGHLIGHT_ALPHA_MIN,
            alpha_max: DEFAULT_HIGHLIGHT_ALPHA_MAX,
            phase: 1.0,
        }
    }
}

/// Everything a draw call binds besides textures
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawUniforms {
    pub model_view: Mat4,
    pub projection: Mat4,
    pub light_model_view: Mat4,
    pub light_projection: Mat4,
    pub highlight: HighlightUniforms,
    pub clip_planes: [ClipPlane; 2],
    pub shadow: ShadowParams,
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self {
            model_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_model_view: Mat4::IDENTITY,
            light_projection: Mat4::IDENTITY,
            highlight: HighlightUniforms::default(),
            clip_planes: [ClipPlane::disabled(); 2],
            shadow: ShadowParams::disabled(),
        }
    }
}

impl DrawUniforms {
    /// `projection * model_view`
    #[inline]
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.model_view
    }

    /// `light_projection * light_model_view`
    #[inline]
    pub fn light_view_projection(&self) -> Mat4 {
        self.light_projection * self.light_model_view
    }
}
