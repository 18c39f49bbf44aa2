use glam::{Vec2, Vec3, Vec4};
use shading_common::{DEFAULT_SHADOW_BIAS, DEFAULT_SHADOW_FLOOR, DEFAULT_SHADOW_MAP_SIZE};

use super::map::ShadowMap;

/// Texel offsets of the 3x3 box filter
pub const PCF_KERNEL: [(i32, i32); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Shadow uniforms for one draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParams {
    /// When false the factor is exactly 1.0 and the map is never read
    pub enabled: bool,
    /// Subtracted from the fragment depth before comparison
    pub bias: f32,
    /// Map side used for the filter's texel size
    pub map_size: f32,
    /// Brightness floor added to the filtered visibility
    pub floor: f32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            enabled: true,
            bias: DEFAULT_SHADOW_BIAS,
            map_size: DEFAULT_SHADOW_MAP_SIZE as f32,
            floor: DEFAULT_SHADOW_FLOOR,
        }
    }
}

impl ShadowParams {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Texel size from the uniform resolution, or the map's own size when
    /// the uniform is not positive
    #[inline]
    pub fn texel_size(&self, map: &ShadowMap) -> f32 {
        if self.map_size > 0.0 {
            1.0 / self.map_size
        } else {
            1.0 / map.size() as f32
        }
    }
}

/// Project a light clip-space position into shadow texture space
///
/// Returns `(u, v, window_depth)`, each in [0, 1] inside the light frustum.
/// `None` when `w` is zero.
#[inline]
pub fn light_texture_coords(light_clip: Vec4) -> Option<Vec3> {
    if light_clip.w == 0.0 {
        return None;
    }
    let ndc = light_clip.truncate() / light_clip.w;
    Some(ndc * 0.5 + Vec3::splat(0.5))
}

/// Filtered light visibility for a fragment
///
/// Counts the kernel samples whose stored depth lies beyond the biased
/// fragment depth, averages over the 9 samples, then lifts the result by the
/// brightness floor: `min(1, lit / 9 + floor)`.
pub fn shadow_factor(coords: Vec3, params: &ShadowParams, map: Option<&ShadowMap>) -> f32 {
    let map = match map {
        Some(map) if params.enabled => map,
        _ => return 1.0,
    };

    let texel_size = params.texel_size(map);
    let fragment_depth = coords.z - params.bias;

    let lit = PCF_KERNEL
        .iter()
        .filter(|&&(x, y)| {
            let uv = coords.truncate() + Vec2::new(x as f32, y as f32) * texel_size;
            map.sample(uv)
                .is_none_or(|texel_depth| fragment_depth < texel_depth)
        })
        .count();

    (lit as f32 / PCF_KERNEL.len() as f32 + params.floor).min(1.0)
}
