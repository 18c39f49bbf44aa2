//! Attribute and texel packing utilities
//!
//! Provides the conversions shared by the shading stage and the tools that
//! feed it:
//! - f32 ↔ unorm8 (colour channels, palette texels)
//! - packed vertex state (two bytes widened to floats, recovered by round-half-up)
//! - scalar depth ↔ RGBA8 (shadow map texels)
//!
//! All functions are pure and reproduce the GPU arithmetic they stand in for,
//! including GLSL's floor-based `fract`.

use bytemuck::cast_slice;
use serde::{Deserialize, Serialize};

// ============================================================================
// Scalar Helpers
// ============================================================================

/// GLSL `fract`: `x - floor(x)`, always in [0, 1).
///
/// Differs from [`f32::fract`] for negative inputs, which truncates toward zero.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Round half up (`floor(x + 0.5)`), the reconstruction used for integers
/// transported through float attributes.
#[inline]
pub fn round_half_up(x: f32) -> i32 {
    (x + 0.5).floor() as i32
}

/// Convert f32 to unsigned normalized 8-bit integer (unorm8)
///
/// Maps f32 range [0.0, 1.0] to u8 range [0, 255], rounding to nearest.
#[inline]
pub fn f32_to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert unorm8 back to f32 in [0.0, 1.0]
#[inline]
pub fn unorm8_to_f32(value: u8) -> f32 {
    value as f32 / 255.0
}

// ============================================================================
// Color Packing
// ============================================================================

/// Pack an RGBA color (f32x4) to Unorm8x4 format
#[inline]
pub fn pack_color_rgba_unorm8(r: f32, g: f32, b: f32, a: f32) -> [u8; 4] {
    [
        f32_to_unorm8(r),
        f32_to_unorm8(g),
        f32_to_unorm8(b),
        f32_to_unorm8(a),
    ]
}

/// Unpack a Unorm8x4 texel to an RGBA color
#[inline]
pub fn unpack_color_rgba_unorm8(texel: [u8; 4]) -> glam::Vec4 {
    glam::Vec4::new(
        unorm8_to_f32(texel[0]),
        unorm8_to_f32(texel[1]),
        unorm8_to_f32(texel[2]),
        unorm8_to_f32(texel[3]),
    )
}

// ============================================================================
// Vertex State Packing
// ============================================================================

/// Pack a product state and restyle index into the two-byte state attribute
#[inline]
pub fn pack_state_attribute(state: u8, restyle: u8) -> [u8; 2] {
    [state, restyle]
}

/// Widen a two-byte state attribute to the float pair the vertex stage reads
///
/// Bytes are read unnormalized, so `253` arrives as `253.0`.
#[inline]
pub fn unpack_state_attribute(packed: [u8; 2]) -> [f32; 2] {
    [packed[0] as f32, packed[1] as f32]
}

/// Pack a whole state attribute stream into a GPU-ready byte buffer
pub fn pack_vertex_states(states: &[(u8, u8)]) -> Vec<u8> {
    let packed: Vec<[u8; 2]> = states
        .iter()
        .map(|&(state, restyle)| pack_state_attribute(state, restyle))
        .collect();
    cast_slice(&packed).to_vec()
}

/// Widen a byte buffer produced by [`pack_vertex_states`] back to attributes
///
/// A trailing odd byte is ignored.
pub fn unpack_vertex_states(bytes: &[u8]) -> Vec<[f32; 2]> {
    bytes
        .chunks_exact(2)
        .map(|pair| unpack_state_attribute([pair[0], pair[1]]))
        .collect()
}

// ============================================================================
// Depth Packing
// ============================================================================

/// Per-channel scale used to spread a depth value across four 8-bit channels
pub const DEPTH_ENCODE_SCALE: [f32; 4] = [1.0, 255.0, 65025.0, 16581375.0];

/// Inverse of [`DEPTH_ENCODE_SCALE`], the decode dot-product weights
pub const DEPTH_DECODE_WEIGHTS: [f32; 4] = [1.0, 1.0 / 255.0, 1.0 / 65025.0, 1.0 / 16581375.0];

/// Encode a depth in [0, 1] into four channels in [0, 1)
///
/// Each channel holds the fractional part at its scale minus the carry that
/// the next, finer channel accounts for. Every channel but the last lands on a
/// multiple of 1/255, so the result survives 8-bit storage. `1.0` saturates to
/// `(1, 0, 0, 0)` because `fract(1.0)` would wrap it to zero.
pub fn encode_depth(value: f32) -> [f32; 4] {
    let v = value.clamp(0.0, 1.0);
    if v >= 1.0 {
        return [1.0, 0.0, 0.0, 0.0];
    }

    let f = [
        fract(v * DEPTH_ENCODE_SCALE[0]),
        fract(v * DEPTH_ENCODE_SCALE[1]),
        fract(v * DEPTH_ENCODE_SCALE[2]),
        fract(v * DEPTH_ENCODE_SCALE[3]),
    ];

    [
        f[0] - f[1] / 255.0,
        f[1] - f[2] / 255.0,
        f[2] - f[3] / 255.0,
        f[3],
    ]
}

/// Decode four channels back to a scalar depth
#[inline]
pub fn decode_depth(texel: [f32; 4]) -> f32 {
    texel[0] * DEPTH_DECODE_WEIGHTS[0]
        + texel[1] * DEPTH_DECODE_WEIGHTS[1]
        + texel[2] * DEPTH_DECODE_WEIGHTS[2]
        + texel[3] * DEPTH_DECODE_WEIGHTS[3]
}

/// Encode a depth straight to an RGBA8 texel
#[inline]
pub fn pack_depth_rgba8(value: f32) -> [u8; 4] {
    let [r, g, b, a] = encode_depth(value);
    pack_color_rgba_unorm8(r, g, b, a)
}

/// Decode an RGBA8 texel to a scalar depth
#[inline]
pub fn unpack_depth_rgba8(texel: [u8; 4]) -> f32 {
    decode_depth(unpack_color_rgba_unorm8(texel).to_array())
}

/// How window depth is mapped before it is packed into a shadow texel.
///
/// Both conventions decode back to window depth in [0, 1]; they differ only in
/// the stored bytes. A shadow map is written and read with the same convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthConvention {
    /// Stored value is the window depth itself
    #[default]
    Unit,
    /// Stored value is `z * 0.5 + 0.5`, decoded through `(d - 0.5) / 0.5`
    Remapped,
}

impl DepthConvention {
    /// Map window depth to the value that gets encoded
    #[inline]
    pub fn to_stored(self, window_depth: f32) -> f32 {
        match self {
            DepthConvention::Unit => window_depth,
            DepthConvention::Remapped => window_depth * 0.5 + 0.5,
        }
    }

    /// Map a decoded value back to window depth
    #[inline]
    pub fn from_stored(self, stored: f32) -> f32 {
        match self {
            DepthConvention::Unit => stored,
            DepthConvention::Remapped => (stored - 0.5) / 0.5,
        }
    }

    /// Encode window depth into an RGBA8 texel
    #[inline]
    pub fn pack(self, window_depth: f32) -> [u8; 4] {
        pack_depth_rgba8(self.to_stored(window_depth))
    }

    /// Decode an RGBA8 texel to window depth
    #[inline]
    pub fn unpack(self, texel: [u8; 4]) -> f32 {
        self.from_stored(unpack_depth_rgba8(texel))
    }
}
