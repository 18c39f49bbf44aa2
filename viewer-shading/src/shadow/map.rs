use bytemuck::cast_slice;
use glam::Vec2;
use shading_common::{DepthConvention, SHADOW_CLEAR_TEXEL};

/// Square RGBA8 depth texture produced by the light pass
///
/// Row 0 is the bottom of the light's view (v = 0), matching texture space.
/// The map remembers the convention it was written with, so reads always use
/// the same one.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowMap {
    size: u32,
    convention: DepthConvention,
    texels: Vec<[u8; 4]>,
}

impl ShadowMap {
    /// Create a cleared map. A zero size is bumped to one texel.
    pub fn new(size: u32, convention: DepthConvention) -> Self {
        let size = size.max(1);
        Self {
            size,
            convention,
            texels: vec![SHADOW_CLEAR_TEXEL; (size as usize) * (size as usize)],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn convention(&self) -> DepthConvention {
        self.convention
    }

    pub fn texels(&self) -> &[[u8; 4]] {
        &self.texels
    }

    pub(crate) fn texels_mut(&mut self) -> &mut [[u8; 4]] {
        &mut self.texels
    }

    /// Raw RGBA8 bytes, row-major from the bottom row
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.texels)
    }

    /// Reset every texel to the far clear value
    pub fn clear(&mut self) {
        self.texels.fill(SHADOW_CLEAR_TEXEL);
    }

    /// Store a window depth at every texel
    pub fn fill_depth(&mut self, window_depth: f32) {
        let texel = self.convention.pack(window_depth);
        self.texels.fill(texel);
    }

    /// Store a window depth at one texel; out-of-range writes are dropped
    pub fn write_depth(&mut self, x: u32, y: u32, window_depth: f32) {
        if x < self.size && y < self.size {
            let index = (y * self.size + x) as usize;
            self.texels[index] = self.convention.pack(window_depth);
        }
    }

    /// Decoded window depth at one texel
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let texel = self.texels[(y * self.size + x) as usize];
        Some(self.convention.unpack(texel))
    }

    /// Nearest-texel depth lookup
    ///
    /// `None` outside [0, 1)²; the filter treats such samples as lit.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> Option<f32> {
        if !(0.0..1.0).contains(&uv.x) || !(0.0..1.0).contains(&uv.y) {
            return None;
        }
        let size = self.size as f32;
        let x = (uv.x * size).floor() as u32;
        let y = (uv.y * size).floor() as u32;
        self.depth_at(x.min(self.size - 1), y.min(self.size - 1))
    }
}
