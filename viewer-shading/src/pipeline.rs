//! Render passes
//!
//! Two passes over an indexed triangle list:
//! - the depth pass renders every triangle from the light into a [`ShadowMap`]
//! - the highlight pass runs the vertex and fragment stages and blends the
//!   surviving fragments into a [`Framebuffer`]
//!
//! Rows are shaded in parallel. Within a row, triangles are visited in
//! submission order so blending stays deterministic.

use glam::{Vec3, Vec4};
use rayon::prelude::*;
use tracing::debug;

use crate::fragment::{DiscardReason, Fragment, FragmentInput, depth_fragment, shade_fragment};
use crate::raster::{CullMode, Framebuffer, ScreenTriangle, Viewport, blend_over};
use crate::shadow::{LightView, ShadowMap};
use crate::style::StylePalette;
use crate::uniforms::DrawUniforms;
use crate::vertex::{Varyings, VertexInput, VertexOutput, shade_light_vertex, shade_vertex};

/// Counters collected by a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Triangles submitted
    pub triangles: usize,
    /// Triangles skipped before rasterization (bad index, hidden vertex,
    /// culled, behind the eye or without area)
    pub skipped: usize,
    /// Fragments that reached the output
    pub fragments_written: usize,
    /// Fragments dropped by a clipping plane
    pub fragments_clipped: usize,
    /// Fragments dropped by the hidden flag or the depth test
    pub fragments_rejected: usize,
}

impl PassStats {
    fn merge(self, other: PassStats) -> PassStats {
        PassStats {
            triangles: self.triangles + other.triangles,
            skipped: self.skipped + other.skipped,
            fragments_written: self.fragments_written + other.fragments_written,
            fragments_clipped: self.fragments_clipped + other.fragments_clipped,
            fragments_rejected: self.fragments_rejected + other.fragments_rejected,
        }
    }
}

fn triangle_vertices<T: Copy>(items: &[T], triangle: [u32; 3]) -> Option<[T; 3]> {
    Some([
        *items.get(triangle[0] as usize)?,
        *items.get(triangle[1] as usize)?,
        *items.get(triangle[2] as usize)?,
    ])
}

// ============================================================================
// Depth pass
// ============================================================================

/// Render the light's view of the scene into `map`
///
/// Clears the map, then keeps the nearest window depth per texel (depth test
/// LESS against a buffer cleared to 1.0) and stores it in the map's
/// convention. Every triangle casts shadows regardless of its state.
pub fn render_shadow_map(
    positions: &[Vec3],
    triangles: &[[u32; 3]],
    light: &LightView,
    map: &mut ShadowMap,
    cull: CullMode,
) -> PassStats {
    let size = map.size();
    let viewport = Viewport::full(size, size);
    let view_projection = light.view_projection();
    let convention = map.convention();

    let clip: Vec<Vec4> = positions
        .par_iter()
        .map(|position| shade_light_vertex(*position, &view_projection))
        .collect();

    let mut skipped = 0;
    let setup: Vec<ScreenTriangle> = triangles
        .iter()
        .filter_map(|triangle| {
            let prepared = triangle_vertices(&clip, *triangle)
                .and_then(|vertices| ScreenTriangle::new(vertices, &viewport))
                .filter(|screen| !cull.culls(screen.front_facing()));
            if prepared.is_none() {
                skipped += 1;
            }
            prepared
        })
        .collect();

    map.clear();
    let mut depth = vec![1.0f32; (size as usize) * (size as usize)];

    let rows = map
        .texels_mut()
        .par_chunks_mut(size as usize)
        .zip(depth.par_chunks_mut(size as usize))
        .enumerate()
        .map(|(y, (texels, depths))| {
            let y = y as u32;
            let mut stats = PassStats::default();
            for triangle in setup.iter().filter(|t| t.rows(size).contains(&y)) {
                for x in triangle.columns(size) {
                    let Some(coverage) = triangle.cover(x, y) else {
                        continue;
                    };
                    let slot = x as usize;
                    if coverage.depth < depths[slot] {
                        depths[slot] = coverage.depth;
                        texels[slot] = depth_fragment(coverage.depth, convention);
                        stats.fragments_written += 1;
                    } else {
                        stats.fragments_rejected += 1;
                    }
                }
            }
            stats
        })
        .reduce(PassStats::default, PassStats::merge);

    let stats = PassStats {
        triangles: triangles.len(),
        skipped,
        ..rows
    };
    debug!(
        "Depth pass: {} triangles ({} skipped), {} depth writes, {} rejected, {}x{} map",
        stats.triangles,
        stats.skipped,
        stats.fragments_written,
        stats.fragments_rejected,
        size,
        size
    );
    stats
}

// ============================================================================
// Highlight pass
// ============================================================================

/// Everything one highlight draw reads
#[derive(Debug, Clone, Copy)]
pub struct HighlightPipeline<'a> {
    pub uniforms: DrawUniforms,
    pub palette: Option<&'a StylePalette>,
    pub shadow_map: Option<&'a ShadowMap>,
}

impl<'a> HighlightPipeline<'a> {
    pub fn new(uniforms: DrawUniforms) -> Self {
        Self {
            uniforms,
            palette: None,
            shadow_map: None,
        }
    }

    pub fn with_palette(mut self, palette: &'a StylePalette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_shadow_map(mut self, shadow_map: &'a ShadowMap) -> Self {
        self.shadow_map = Some(shadow_map);
        self
    }

    /// Vertex stage over every vertex
    pub fn shade_vertices(&self, vertices: &[VertexInput]) -> Vec<VertexOutput> {
        vertices
            .par_iter()
            .map(|vertex| shade_vertex(vertex, &self.uniforms, self.palette))
            .collect()
    }

    /// Fragment stage for one interpolated fragment
    #[inline]
    pub fn shade_fragment(&self, input: &FragmentInput) -> Fragment {
        shade_fragment(input, &self.uniforms, self.shadow_map)
    }

    /// Draw a triangle list into `target`
    ///
    /// A triangle with any discarded vertex produces no fragments. There is no
    /// depth test and no face culling; kept fragments blend over the target.
    pub fn render(
        &self,
        vertices: &[VertexInput],
        triangles: &[[u32; 3]],
        target: &mut Framebuffer,
    ) -> PassStats {
        let outputs = self.shade_vertices(vertices);
        let viewport = target.viewport();
        let (width, height) = (target.width(), target.height());

        let mut skipped = 0;
        let setup: Vec<(ScreenTriangle, [Varyings; 3])> = triangles
            .iter()
            .filter_map(|triangle| {
                let prepared = triangle_vertices(&outputs, *triangle).and_then(|[a, b, c]| {
                    let varyings = [*a.varyings()?, *b.varyings()?, *c.varyings()?];
                    let clip = varyings.map(|v| v.clip_position);
                    ScreenTriangle::new(clip, &viewport).map(|screen| (screen, varyings))
                });
                if prepared.is_none() {
                    skipped += 1;
                }
                prepared
            })
            .collect();

        let rows = target
            .par_rows_mut()
            .enumerate()
            .map(|(y, row)| {
                let y = y as u32;
                let mut stats = PassStats::default();
                let visible = setup
                    .iter()
                    .filter(|(triangle, _)| triangle.rows(height).contains(&y));
                for (triangle, [a, b, c]) in visible {
                    for x in triangle.columns(width) {
                        let Some(coverage) = triangle.cover(x, y) else {
                            continue;
                        };
                        let interpolated = Varyings::blend([a, b, c], coverage.weights);
                        let input =
                            FragmentInput::from_varyings(&interpolated, triangle.front_facing());
                        match self.shade_fragment(&input) {
                            Fragment::Kept(color) => {
                                let pixel = &mut row[x as usize];
                                *pixel = blend_over(*pixel, color);
                                stats.fragments_written += 1;
                            }
                            Fragment::Discarded(DiscardReason::Clipped) => {
                                stats.fragments_clipped += 1;
                            }
                            Fragment::Discarded(DiscardReason::Hidden) => {
                                stats.fragments_rejected += 1;
                            }
                        }
                    }
                }
                stats
            })
            .reduce(PassStats::default, PassStats::merge);

        let stats = PassStats {
            triangles: triangles.len(),
            skipped,
            ..rows
        };
        debug!(
            "Highlight pass: {} triangles ({} skipped), {} fragments written, {} clipped",
            stats.triangles, stats.skipped, stats.fragments_written, stats.fragments_clipped
        );
        stats
    }
}
