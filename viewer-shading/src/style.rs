//! Style palette and highlight color resolution
//!
//! The palette replaces a small square RGBA8 texture: restyle index `i` lives
//! at texel `(i mod N, i div N)`. Indices above the reserved threshold, and any
//! index the palette cannot hold, resolve to the uniform highlight color.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use shading_common::{STYLE_PALETTE_SIDE, STYLE_RESERVED_THRESHOLD, unpack_color_rgba_unorm8};

use crate::error::StyleError;
use crate::uniforms::HighlightUniforms;

/// Palette geometry shared with the style catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaletteLayout {
    /// Side of the square palette, in texels
    pub side: u32,
    /// Highest index looked up in the palette
    pub reserved_threshold: i32,
}

impl Default for PaletteLayout {
    fn default() -> Self {
        Self {
            side: STYLE_PALETTE_SIDE,
            reserved_threshold: STYLE_RESERVED_THRESHOLD,
        }
    }
}

impl PaletteLayout {
    /// Number of texels in the palette
    #[inline]
    pub fn capacity(&self) -> usize {
        (self.side as usize) * (self.side as usize)
    }

    /// Texel-centre coordinate of a linear index
    ///
    /// `((i mod N) + 0.5) / N, ((i div N) + 0.5) / N`
    pub fn texel_coords(&self, index: u32) -> Vec2 {
        let side = self.side.max(1);
        let pixel = 1.0 / side as f32;
        let x = (index % side) as f32;
        let y = (index / side) as f32;
        Vec2::new((x + 0.5) * pixel, (y + 0.5) * pixel)
    }

    /// Palette slot for a restyle index, or `None` when it falls back
    #[inline]
    pub fn slot(&self, restyle: i32) -> Option<usize> {
        if restyle < 0 || restyle > self.reserved_threshold {
            return None;
        }
        let slot = restyle as usize;
        (slot < self.capacity()).then_some(slot)
    }
}

/// Fixed-size table of RGBA8 style colors
#[derive(Clone, Debug, PartialEq)]
pub struct StylePalette {
    layout: PaletteLayout,
    texels: Vec<[u8; 4]>,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self::new(PaletteLayout::default())
    }
}

impl StylePalette {
    /// Create a palette with every style undefined (transparent black)
    pub fn new(layout: PaletteLayout) -> Self {
        Self {
            layout,
            texels: vec![[0; 4]; layout.capacity()],
        }
    }

    pub fn layout(&self) -> PaletteLayout {
        self.layout
    }

    /// Raw texels in row-major order, ready for upload
    pub fn texels(&self) -> &[[u8; 4]] {
        &self.texels
    }

    /// Define the color of a style index
    pub fn define_style(&mut self, index: u32, rgba: [u8; 4]) -> Result<(), StyleError> {
        let max = self.max_index();
        let slot = i32::try_from(index)
            .ok()
            .and_then(|restyle| self.layout.slot(restyle))
            .ok_or(StyleError::IndexOutOfRange { index, max })?;

        if rgba == [0; 4] {
            tracing::warn!(
                "style {} defined as transparent black; restyled elements will be invisible",
                index
            );
        }

        self.texels[slot] = rgba;
        Ok(())
    }

    /// Highest index [`Self::define_style`] accepts
    pub fn max_index(&self) -> u32 {
        let by_capacity = self.layout.capacity().saturating_sub(1) as i64;
        let by_threshold = self.layout.reserved_threshold as i64;
        by_capacity.min(by_threshold).max(0) as u32
    }

    /// Whether a style has been given a color
    pub fn is_defined(&self, index: u32) -> bool {
        self.texels
            .get(index as usize)
            .is_some_and(|texel| *texel != [0; 4])
    }

    /// Color stored for a restyle index, `None` when it falls back
    #[inline]
    pub fn texel(&self, restyle: i32) -> Option<Vec4> {
        self.layout
            .slot(restyle)
            .map(|slot| unpack_color_rgba_unorm8(self.texels[slot]))
    }

    /// Nearest-texel lookup by normalized coordinate, clamped to the edge
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let side = self.layout.side.max(1);
        let x = ((uv.x * side as f32).floor().max(0.0) as u32).min(side - 1);
        let y = ((uv.y * side as f32).floor().max(0.0) as u32).min(side - 1);
        self.texels
            .get((y * side + x) as usize)
            .map(|texel| unpack_color_rgba_unorm8(*texel))
            .unwrap_or(Vec4::ZERO)
    }
}

/// Pulsing alpha: `alpha_min + (alpha_max - alpha_min) * phase`
#[inline]
pub fn pulse_alpha(alpha_min: f32, alpha_max: f32, phase: f32) -> f32 {
    alpha_min + (alpha_max - alpha_min) * phase
}

/// RGB for a restyle index
///
/// Without a palette every index resolves to the highlight color.
#[inline]
pub fn resolve_style_rgb(restyle: i32, highlight: Vec4, palette: Option<&StylePalette>) -> Vec3 {
    palette
        .and_then(|palette| palette.texel(restyle))
        .unwrap_or(highlight)
        .truncate()
}

/// Final highlight color: resolved RGB with the pulsing alpha
pub fn highlight_color(
    restyle: i32,
    uniforms: &HighlightUniforms,
    palette: Option<&StylePalette>,
) -> Vec4 {
    resolve_style_rgb(restyle, uniforms.color, palette).extend(pulse_alpha(
        uniforms.alpha_min,
        uniforms.alpha_max,
        uniforms.phase,
    ))
}
