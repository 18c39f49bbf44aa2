//! Fragment stage
//!
//! `hidden? -> clipped? -> shadow factor -> composite`. The first failing test
//! decides the discard reason.

use glam::{Vec3, Vec4};
use shading_common::DepthConvention;

use crate::clip::is_clipped;
use crate::shadow::{ShadowMap, light_texture_coords, shadow_factor};
use crate::uniforms::DrawUniforms;
use crate::vertex::Varyings;

/// Interpolated inputs of one fragment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentInput {
    pub front_facing: bool,
    pub discard: bool,
    pub front_color: Vec4,
    pub back_color: Vec4,
    pub world_position: Vec3,
    pub light_position: Vec4,
}

impl FragmentInput {
    /// Fragment of a primitive whose vertices were all kept
    pub fn from_varyings(varyings: &Varyings, front_facing: bool) -> Self {
        Self {
            front_facing,
            discard: false,
            front_color: varyings.front_color,
            back_color: varyings.back_color,
            world_position: varyings.world_position,
            light_position: varyings.light_position,
        }
    }
}

/// Why a fragment produced no color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// The vertex stage flagged the primitive as not highlighted
    Hidden,
    /// An enabled clipping plane rejected the position
    Clipped,
}

/// Result of the fragment stage
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fragment {
    Kept(Vec4),
    Discarded(DiscardReason),
}

impl Fragment {
    pub fn color(&self) -> Option<Vec4> {
        match self {
            Fragment::Kept(color) => Some(*color),
            Fragment::Discarded(_) => None,
        }
    }

    pub fn is_kept(&self) -> bool {
        matches!(self, Fragment::Kept(_))
    }
}

/// Select the facing color and darken its RGB; alpha passes through
#[inline]
pub fn composite(front_facing: bool, front_color: Vec4, back_color: Vec4, shadow: f32) -> Vec4 {
    let color = if front_facing { front_color } else { back_color };
    (color.truncate() * shadow).extend(color.w)
}

/// Run the highlight fragment stage
pub fn shade_fragment(
    input: &FragmentInput,
    uniforms: &DrawUniforms,
    shadow_map: Option<&ShadowMap>,
) -> Fragment {
    if input.discard {
        return Fragment::Discarded(DiscardReason::Hidden);
    }

    if is_clipped(&uniforms.clip_planes, input.world_position) {
        return Fragment::Discarded(DiscardReason::Clipped);
    }

    let shadow = if uniforms.shadow.enabled {
        light_texture_coords(input.light_position)
            .map_or(1.0, |coords| shadow_factor(coords, &uniforms.shadow, shadow_map))
    } else {
        1.0
    };

    Fragment::Kept(composite(
        input.front_facing,
        input.front_color,
        input.back_color,
        shadow,
    ))
}

/// Light-pass fragment stage: encode window depth in the map's convention
#[inline]
pub fn depth_fragment(window_depth: f32, convention: DepthConvention) -> [u8; 4] {
    convention.pack(window_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipPlane;
    use crate::shadow::ShadowParams;

    fn input() -> FragmentInput {
        FragmentInput {
            front_facing: true,
            discard: false,
            front_color: Vec4::new(0.8, 0.6, 0.4, 0.5),
            back_color: Vec4::new(0.1, 0.2, 0.3, 0.9),
            world_position: Vec3::new(0.0, 1.0, 0.0),
            light_position: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    fn occluding_map() -> ShadowMap {
        let mut map = ShadowMap::new(16, DepthConvention::Unit);
        map.fill_depth(0.1);
        map
    }

    #[test]
    fn test_unclipped_unshadowed_fragment_keeps_color() {
        let fragment = shade_fragment(&input(), &DrawUniforms::default(), None);
        assert!(fragment.is_kept());
        assert_eq!(fragment, Fragment::Kept(input().front_color));
    }

    #[test]
    fn test_back_facing_uses_back_color() {
        let fragment = FragmentInput {
            front_facing: false,
            ..input()
        };
        let result = shade_fragment(&fragment, &DrawUniforms::default(), None);
        assert_eq!(result.color(), Some(input().back_color));
    }

    #[test]
    fn test_discard_flag_wins_over_clipping() {
        let mut uniforms = DrawUniforms::default();
        uniforms.clip_planes[0] = ClipPlane::new(Vec4::new(0.0, -1.0, 0.0, 0.0));
        let fragment = FragmentInput {
            discard: true,
            ..input()
        };
        assert_eq!(
            shade_fragment(&fragment, &uniforms, None),
            Fragment::Discarded(DiscardReason::Hidden)
        );
        assert_eq!(
            shade_fragment(&input(), &uniforms, None),
            Fragment::Discarded(DiscardReason::Clipped)
        );
    }

    #[test]
    fn test_second_plane_clips_alone() {
        let mut uniforms = DrawUniforms::default();
        uniforms.clip_planes[1] = ClipPlane::new(Vec4::new(0.0, 1.0, 0.0, -2.0));
        let fragment = shade_fragment(&input(), &uniforms, None);
        assert!(!fragment.is_kept());
        assert_eq!(fragment, Fragment::Discarded(DiscardReason::Clipped));
    }

    #[test]
    fn test_shadow_darkens_rgb_only() {
        let map = occluding_map();
        let uniforms = DrawUniforms {
            shadow: ShadowParams {
                map_size: 16.0,
                ..ShadowParams::default()
            },
            ..Default::default()
        };

        let color = shade_fragment(&input(), &uniforms, Some(&map))
            .color()
            .unwrap();
        let expected = input().front_color;
        assert!((color.truncate() - expected.truncate() * 0.5).length() < 1e-5);
        assert_eq!(color.w, expected.w);
    }

    #[test]
    fn test_disabled_shadows_ignore_map() {
        let map = occluding_map();
        let fragment = shade_fragment(&input(), &DrawUniforms::default(), Some(&map));
        assert_eq!(fragment.color(), Some(input().front_color));
    }

    #[test]
    fn test_composite() {
        let front = Vec4::new(1.0, 1.0, 1.0, 0.25);
        let back = Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(composite(true, front, back, 0.5), Vec4::new(0.5, 0.5, 0.5, 0.25));
        assert_eq!(composite(false, front, back, 1.0), back);
    }

    #[test]
    fn test_depth_fragment_follows_convention() {
        for convention in [DepthConvention::Unit, DepthConvention::Remapped] {
            let texel = depth_fragment(0.42, convention);
            assert!((convention.unpack(texel) - 0.42).abs() < 1e-5);
        }
        assert_ne!(
            depth_fragment(0.42, DepthConvention::Unit),
            depth_fragment(0.42, DepthConvention::Remapped)
        );
    }
}
