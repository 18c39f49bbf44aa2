//! Vertex stage
//!
//! Decodes the state attribute, drops every vertex that is not highlighted,
//! and emits the varyings the fragment stage interpolates.

use glam::{Mat4, Vec3, Vec4};
use shading_common::DEGENERATE_CLIP_POSITION;

use crate::state::decode_state;
use crate::style::{StylePalette, highlight_color};
use crate::uniforms::DrawUniforms;

/// Per-vertex attributes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexInput {
    pub position: Vec3,
    /// Packed `(state, restyle)` as transported in the float attribute
    pub state: [f32; 2],
}

impl VertexInput {
    pub fn new(position: Vec3, state: u8, restyle: u8) -> Self {
        Self {
            position,
            state: [state as f32, restyle as f32],
        }
    }
}

/// Values the vertex stage hands to the rasterizer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Varyings {
    pub clip_position: Vec4,
    pub front_color: Vec4,
    pub back_color: Vec4,
    /// Untransformed position, used for clipping
    pub world_position: Vec3,
    /// Light clip-space position, used for the shadow lookup
    pub light_position: Vec4,
}

impl Varyings {
    /// Weighted sum of three vertices' varyings
    ///
    /// `weights` are the perspective-corrected barycentric weights and sum to 1.
    pub fn blend(vertices: [&Varyings; 3], weights: [f32; 3]) -> Varyings {
        let [a, b, c] = vertices;
        let [wa, wb, wc] = weights;
        Varyings {
            clip_position: a.clip_position * wa + b.clip_position * wb + c.clip_position * wc,
            front_color: a.front_color * wa + b.front_color * wb + c.front_color * wc,
            back_color: a.back_color * wa + b.back_color * wb + c.back_color * wc,
            world_position: a.world_position * wa + b.world_position * wb + c.world_position * wc,
            light_position: a.light_position * wa
                + b.light_position * wb
                + c.light_position * wc,
        }
    }
}

/// Result of the vertex stage
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VertexOutput {
    Kept(Varyings),
    /// Not highlighted; the vertex produces no colors and no position
    Discarded,
}

impl VertexOutput {
    /// Clip-space position; discarded vertices collapse to `(0, 0, 0, 1)`
    pub fn clip_position(&self) -> Vec4 {
        match self {
            VertexOutput::Kept(varyings) => varyings.clip_position,
            VertexOutput::Discarded => Vec4::from_array(DEGENERATE_CLIP_POSITION),
        }
    }

    pub fn varyings(&self) -> Option<&Varyings> {
        match self {
            VertexOutput::Kept(varyings) => Some(varyings),
            VertexOutput::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, VertexOutput::Discarded)
    }
}

/// Run the highlight vertex stage for one vertex
pub fn shade_vertex(
    vertex: &VertexInput,
    uniforms: &DrawUniforms,
    palette: Option<&StylePalette>,
) -> VertexOutput {
    let decoded = decode_state(vertex.state);
    if !decoded.is_highlighted() {
        return VertexOutput::Discarded;
    }

    let color = highlight_color(decoded.restyle, &uniforms.highlight, palette);
    let position = vertex.position.extend(1.0);

    VertexOutput::Kept(Varyings {
        clip_position: uniforms.model_view_projection() * position,
        front_color: color,
        back_color: color,
        world_position: vertex.position,
        light_position: uniforms.light_view_projection() * position,
    })
}

/// Light-pass vertex stage: `light_view_projection * position`
#[inline]
pub fn shade_light_vertex(position: Vec3, light_view_projection: &Mat4) -> Vec4 {
    *light_view_projection * position.extend(1.0)
}
