//! End-to-end tests for the highlight and depth passes

use glam::{Mat4, Vec3, Vec4};
use viewer_shading::{
    ClipPlane, CullMode, DepthConvention, DiscardReason, DrawUniforms, Fragment, FragmentInput,
    Framebuffer, HighlightPipeline, HighlightUniforms, LightView, ShadowMap, ShadowParams,
    StylePalette, VertexInput, VertexOutput, render_shadow_map, shade_fragment, shade_vertex,
};

const HIGHLIGHTED: u8 = 253;
const HIDDEN: u8 = 254;
const UNSTYLED: u8 = 225;

/// Axis-aligned quad in clip space (identity matrices), counter-clockwise
fn quad(min: f32, max: f32, z: f32, state: u8, restyle: u8) -> (Vec<VertexInput>, Vec<[u32; 3]>) {
    let vertices = [
        Vec3::new(min, min, z),
        Vec3::new(max, min, z),
        Vec3::new(max, max, z),
        Vec3::new(min, max, z),
    ]
    .map(|position| VertexInput::new(position, state, restyle))
    .to_vec();
    (vertices, vec![[0, 1, 2], [0, 2, 3]])
}

fn opaque_red() -> HighlightUniforms {
    HighlightUniforms {
        color: Vec4::new(1.0, 0.0, 0.0, 1.0),
        alpha_min: 1.0,
        alpha_max: 1.0,
        phase: 1.0,
    }
}

fn assert_color(actual: Option<Vec4>, expected: Vec4) {
    let actual = actual.expect("pixel inside framebuffer");
    assert!(
        (actual - expected).length() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Stage-level scenarios
// ============================================================================

#[test]
fn test_restyled_highlight_end_to_end() {
    let mut palette = StylePalette::default();
    palette.define_style(10, [51, 102, 204, 255]).unwrap();

    let uniforms = DrawUniforms {
        highlight: HighlightUniforms {
            color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            alpha_min: 0.2,
            alpha_max: 0.8,
            phase: 1.0,
        },
        ..Default::default()
    };

    let vertex = VertexInput::new(Vec3::new(0.1, 0.2, 0.3), HIGHLIGHTED, 10);
    let VertexOutput::Kept(varyings) = shade_vertex(&vertex, &uniforms, Some(&palette)) else {
        panic!("highlighted vertex was discarded");
    };

    let input = FragmentInput::from_varyings(&varyings, true);
    let Fragment::Kept(color) = shade_fragment(&input, &uniforms, None) else {
        panic!("fragment was discarded");
    };

    let texel = palette.sample(palette.layout().texel_coords(10));
    assert_eq!(color.truncate(), texel.truncate());
    assert!((color.w - 0.8).abs() < 1e-6);
}

#[test]
fn test_every_other_state_is_discarded() {
    let uniforms = DrawUniforms::default();
    for state in 0..=255u8 {
        for restyle in [0u8, 10, 224, UNSTYLED] {
            let output = shade_vertex(
                &VertexInput::new(Vec3::ONE, state, restyle),
                &uniforms,
                None,
            );
            assert_eq!(output.is_discarded(), state != HIGHLIGHTED, "state {state}");
        }
    }
}

#[test]
fn test_unstyled_highlight_uses_uniform_color() {
    let mut palette = StylePalette::default();
    palette.define_style(0, [0, 255, 0, 255]).unwrap();
    let uniforms = DrawUniforms {
        highlight: opaque_red(),
        ..Default::default()
    };
    let output = shade_vertex(
        &VertexInput::new(Vec3::ZERO, HIGHLIGHTED, UNSTYLED),
        &uniforms,
        Some(&palette),
    );
    let varyings = output.varyings().unwrap();
    assert_eq!(varyings.front_color, Vec4::new(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn test_clipped_fragment_reports_reason() {
    let mut uniforms = DrawUniforms::default();
    uniforms.clip_planes[0] = ClipPlane::new(Vec4::new(1.0, 0.0, 0.0, 0.0));
    let output = shade_vertex(
        &VertexInput::new(Vec3::new(-0.5, 0.0, 0.0), HIGHLIGHTED, UNSTYLED),
        &uniforms,
        None,
    );
    let input = FragmentInput::from_varyings(output.varyings().unwrap(), true);
    assert_eq!(
        shade_fragment(&input, &uniforms, None),
        Fragment::Discarded(DiscardReason::Clipped)
    );
}

// ============================================================================
// Highlight pass
// ============================================================================

#[test]
fn test_full_screen_quad_blends_over_background() {
    let (vertices, triangles) = quad(-1.0, 1.0, 0.0, HIGHLIGHTED, UNSTYLED);
    let uniforms = DrawUniforms {
        highlight: HighlightUniforms {
            alpha_min: 0.8,
            alpha_max: 0.8,
            ..opaque_red()
        },
        ..Default::default()
    };

    let mut target = Framebuffer::new(8, 8, Vec4::new(0.0, 0.0, 0.0, 1.0));
    let stats = HighlightPipeline::new(uniforms).render(&vertices, &triangles, &mut target);

    assert_eq!(stats.triangles, 2);
    assert_eq!(stats.skipped, 0);
    // Every pixel exactly once: the shared diagonal is not blended twice
    assert_eq!(stats.fragments_written, 64);
    for y in 0..8 {
        for x in 0..8 {
            assert_color(target.pixel(x, y), Vec4::new(0.8, 0.0, 0.0, 0.84));
        }
    }
}

#[test]
fn test_hidden_geometry_leaves_target_untouched() {
    let (vertices, triangles) = quad(-1.0, 1.0, 0.0, HIDDEN, UNSTYLED);
    let background = Vec4::new(0.2, 0.3, 0.4, 1.0);
    let mut target = Framebuffer::new(4, 4, background);

    let stats = HighlightPipeline::new(DrawUniforms::default()).render(
        &vertices,
        &triangles,
        &mut target,
    );

    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.fragments_written, 0);
    assert!((0..4).all(|y| (0..4).all(|x| target.pixel(x, y) == Some(background))));
}

#[test]
fn test_mixed_states_skip_whole_triangle() {
    let (mut vertices, triangles) = quad(-1.0, 1.0, 0.0, HIGHLIGHTED, UNSTYLED);
    // Vertex 3 is only used by the second triangle
    vertices[3].state = [HIDDEN as f32, UNSTYLED as f32];

    let mut target = Framebuffer::new(8, 8, Vec4::ZERO);
    let stats = HighlightPipeline::new(DrawUniforms {
        highlight: opaque_red(),
        ..Default::default()
    })
    .render(&vertices, &triangles, &mut target);

    assert_eq!(stats.skipped, 1);
    // Bottom-right half drawn, top-left half untouched
    assert_color(target.pixel(7, 0), Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_color(target.pixel(0, 7), Vec4::ZERO);
}

#[test]
fn test_clip_plane_cuts_quad_in_half() {
    let (vertices, triangles) = quad(-1.0, 1.0, 0.0, HIGHLIGHTED, UNSTYLED);
    let mut uniforms = DrawUniforms {
        highlight: opaque_red(),
        ..Default::default()
    };
    uniforms.clip_planes[1] = ClipPlane::new(Vec4::new(1.0, 0.0, 0.0, 0.0));

    let mut target = Framebuffer::new(8, 8, Vec4::ZERO);
    let stats = HighlightPipeline::new(uniforms).render(&vertices, &triangles, &mut target);

    assert_eq!(stats.fragments_clipped, 32);
    assert_eq!(stats.fragments_written, 32);
    for y in 0..8 {
        assert_color(target.pixel(3, y), Vec4::ZERO);
        assert_color(target.pixel(4, y), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }
}

#[test]
fn test_invalid_indices_are_skipped() {
    let (vertices, _) = quad(-1.0, 1.0, 0.0, HIGHLIGHTED, UNSTYLED);
    let mut target = Framebuffer::new(4, 4, Vec4::ZERO);
    let stats = HighlightPipeline::new(DrawUniforms::default()).render(
        &vertices,
        &[[0, 1, 9]],
        &mut target,
    );
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.fragments_written, 0);
}

// ============================================================================
// Depth pass and shadowed highlight
// ============================================================================

fn identity_light() -> LightView {
    LightView {
        view: Mat4::IDENTITY,
        projection: Mat4::IDENTITY,
    }
}

/// Occluder at window depth 0.25 spanning `min..max` in x and y, receiver
/// everywhere at 0.75
fn shadow_scene_with(min: f32, max: f32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let (receiver, receiver_triangles) = quad(-1.0, 1.0, 0.5, HIGHLIGHTED, UNSTYLED);
    let (occluder, occluder_triangles) = quad(min, max, -0.5, HIDDEN, UNSTYLED);

    let positions = receiver
        .iter()
        .chain(&occluder)
        .map(|vertex| vertex.position)
        .collect();
    let triangles = receiver_triangles
        .into_iter()
        .chain(occluder_triangles.into_iter().map(|t| t.map(|i| i + 4)))
        .collect();
    (positions, triangles)
}

/// Occluder over the centre
fn shadow_scene() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    shadow_scene_with(-0.5, 0.5)
}

#[test]
fn test_depth_pass_keeps_nearest_depth() {
    let (positions, triangles) = shadow_scene();
    let mut map = ShadowMap::new(16, DepthConvention::Unit);
    let stats = render_shadow_map(
        &positions,
        &triangles,
        &identity_light(),
        &mut map,
        CullMode::None,
    );

    assert_eq!(stats.triangles, 4);
    assert_eq!(stats.skipped, 0);
    assert!((map.depth_at(8, 8).unwrap() - 0.25).abs() < 1e-5);
    assert!((map.depth_at(0, 0).unwrap() - 0.75).abs() < 1e-5);
    assert!((map.depth_at(15, 15).unwrap() - 0.75).abs() < 1e-5);
}

#[test]
fn test_backface_culling_in_depth_pass() {
    // Clockwise triangle seen from the light
    let positions = vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
    ];
    let triangles = vec![[0, 1, 2]];

    let mut map = ShadowMap::new(8, DepthConvention::Unit);
    let stats = render_shadow_map(
        &positions,
        &triangles,
        &identity_light(),
        &mut map,
        CullMode::Back,
    );
    assert_eq!(stats.skipped, 1);
    assert!(map.as_bytes().iter().all(|byte| *byte == 255));

    let stats = render_shadow_map(
        &positions,
        &triangles,
        &identity_light(),
        &mut map,
        CullMode::None,
    );
    assert_eq!(stats.skipped, 0);
    assert!(map.depth_at(0, 0).unwrap() < 1.0);
}

fn render_shadowed(convention: DepthConvention) -> Framebuffer {
    render_shadowed_scene(convention, shadow_scene())
}

fn render_shadowed_scene(
    convention: DepthConvention,
    (positions, triangles): (Vec<Vec3>, Vec<[u32; 3]>),
) -> Framebuffer {
    let light = identity_light();
    let mut map = ShadowMap::new(16, convention);
    render_shadow_map(&positions, &triangles, &light, &mut map, CullMode::None);

    let (receiver, receiver_triangles) = quad(-1.0, 1.0, 0.5, HIGHLIGHTED, UNSTYLED);
    let uniforms = DrawUniforms {
        light_model_view: light.view,
        light_projection: light.projection,
        highlight: opaque_red(),
        shadow: ShadowParams {
            map_size: 16.0,
            ..ShadowParams::default()
        },
        ..Default::default()
    };

    let mut target = Framebuffer::new(16, 16, Vec4::ZERO);
    HighlightPipeline::new(uniforms)
        .with_shadow_map(&map)
        .render(&receiver, &receiver_triangles, &mut target);
    target
}

#[test]
fn test_occluder_darkens_receiver() {
    let target = render_shadowed(DepthConvention::Unit);
    // Under the occluder: floor only
    assert_color(target.pixel(8, 8), Vec4::new(0.5, 0.0, 0.0, 1.0));
    // Far from it: fully lit
    assert_color(target.pixel(0, 0), Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_color(target.pixel(15, 0), Vec4::new(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn test_shadow_lands_in_occluded_quadrant() {
    // Occluder over the top-right quadrant only; rows count up from the bottom
    let target = render_shadowed_scene(DepthConvention::Unit, shadow_scene_with(0.25, 1.0));

    assert_color(target.pixel(13, 13), Vec4::new(0.5, 0.0, 0.0, 1.0));
    assert_color(target.pixel(13, 2), Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_color(target.pixel(2, 13), Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_color(target.pixel(2, 2), Vec4::new(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn test_depth_conventions_render_identically() {
    let unit = render_shadowed(DepthConvention::Unit);
    let remapped = render_shadowed(DepthConvention::Remapped);
    assert_eq!(unit.to_rgba8(), remapped.to_rgba8());
}

#[test]
fn test_disabled_shadows_ignore_occluder() {
    let (positions, triangles) = shadow_scene();
    let mut map = ShadowMap::new(16, DepthConvention::Unit);
    render_shadow_map(&positions, &triangles, &identity_light(), &mut map, CullMode::None);

    let (receiver, receiver_triangles) = quad(-1.0, 1.0, 0.5, HIGHLIGHTED, UNSTYLED);
    let uniforms = DrawUniforms {
        highlight: opaque_red(),
        shadow: ShadowParams::disabled(),
        ..Default::default()
    };
    let mut target = Framebuffer::new(16, 16, Vec4::ZERO);
    HighlightPipeline::new(uniforms)
        .with_shadow_map(&map)
        .render(&receiver, &receiver_triangles, &mut target);

    assert_color(target.pixel(8, 8), Vec4::new(1.0, 0.0, 0.0, 1.0));
}
