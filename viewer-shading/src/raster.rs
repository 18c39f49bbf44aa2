//! Software rasterizer
//!
//! Triangle setup, coverage and interpolation weights for the two render
//! passes. Window space has its origin at the bottom-left corner with Y up, so
//! counter-clockwise triangles face the viewer. Pixels are sampled at their
//! centres; a pixel exactly on an edge belongs to the triangle that owns that
//! edge, so triangles sharing an edge never both cover it.

use bytemuck::cast_slice;
use glam::{Vec3, Vec4};
use rayon::prelude::*;
use shading_common::f32_to_unorm8;

// ============================================================================
// Viewport and face culling
// ============================================================================

/// Window rectangle that normalized device coordinates map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: u32,
    /// Bottom edge in pixels
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport covering a whole target
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Width / height, or 1.0 for an empty viewport
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Clip space to window space: pixels in X/Y, depth in [0, 1]
    ///
    /// `None` for points on or behind the eye plane (`w <= 0`).
    #[inline]
    pub fn to_window(&self, clip: Vec4) -> Option<Vec3> {
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec3::new(
            (ndc.x * 0.5 + 0.5) * self.width as f32 + self.x as f32,
            (ndc.y * 0.5 + 0.5) * self.height as f32 + self.y as f32,
            ndc.z * 0.5 + 0.5,
        ))
    }
}

/// Which faces a pass skips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    #[default]
    None,
    /// Skip clockwise triangles
    Back,
    /// Skip counter-clockwise triangles
    Front,
}

impl CullMode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => CullMode::Back,
            2 => CullMode::Front,
            _ => CullMode::None,
        }
    }

    #[inline]
    pub fn culls(self, front_facing: bool) -> bool {
        match self {
            CullMode::None => false,
            CullMode::Back => !front_facing,
            CullMode::Front => front_facing,
        }
    }
}

// ============================================================================
// Triangle setup
// ============================================================================

/// Twice the signed area of a window-space triangle; positive when CCW
#[inline]
pub fn signed_area(v0: Vec3, v1: Vec3, v2: Vec3) -> f32 {
    (v1.x - v0.x) * (v2.y - v0.y) - (v2.x - v0.x) * (v1.y - v0.y)
}

#[inline]
fn edge(a: Vec3, b: Vec3, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Whether a CCW triangle keeps pixels lying exactly on edge `a -> b`
///
/// Each shared edge is walked in opposite directions by its two triangles,
/// so exactly one of them owns it.
#[inline]
fn owns_edge(a: Vec3, b: Vec3) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dy < 0.0 || (dy == 0.0 && dx < 0.0)
}

/// Interpolation weights at one covered pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    /// Window depth, linear in screen space
    pub depth: f32,
    /// Perspective-correct weights in the caller's vertex order; sum to 1
    pub weights: [f32; 3],
}

/// A triangle ready for rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    /// Window positions, reordered counter-clockwise
    window: [Vec3; 3],
    /// `1 / w` per reordered vertex
    inv_w: [f32; 3],
    /// Caller's vertex index for each reordered vertex
    order: [usize; 3],
    /// Doubled area of the reordered (positive) triangle
    area: f32,
    front_facing: bool,
    edge_owned: [bool; 3],
}

impl ScreenTriangle {
    /// Set up a triangle from clip-space positions
    ///
    /// Returns `None` when any vertex has `w <= 0` or the triangle has no
    /// area in window space.
    pub fn new(clip: [Vec4; 3], viewport: &Viewport) -> Option<Self> {
        let window = [
            viewport.to_window(clip[0])?,
            viewport.to_window(clip[1])?,
            viewport.to_window(clip[2])?,
        ];
        let area = signed_area(window[0], window[1], window[2]);
        if area == 0.0 || !area.is_finite() {
            return None;
        }

        let front_facing = area > 0.0;
        let order = if front_facing { [0, 1, 2] } else { [0, 2, 1] };
        let window = order.map(|i| window[i]);
        let inv_w = order.map(|i| 1.0 / clip[i].w);

        // Edge i is the one opposite vertex i
        let edge_owned = [
            owns_edge(window[1], window[2]),
            owns_edge(window[2], window[0]),
            owns_edge(window[0], window[1]),
        ];

        Some(Self {
            window,
            inv_w,
            order,
            area: area.abs(),
            front_facing,
            edge_owned,
        })
    }

    /// Counter-clockwise in window space
    #[inline]
    pub fn front_facing(&self) -> bool {
        self.front_facing
    }

    /// Pixel rows the triangle may touch, clamped to `height`
    pub fn rows(&self, height: u32) -> std::ops::Range<u32> {
        let (lo, hi) = self.span(|v| v.y);
        clamp_span(lo, hi, height)
    }

    /// Pixel columns the triangle may touch, clamped to `width`
    pub fn columns(&self, width: u32) -> std::ops::Range<u32> {
        let (lo, hi) = self.span(|v| v.x);
        clamp_span(lo, hi, width)
    }

    fn span(&self, axis: impl Fn(&Vec3) -> f32) -> (f32, f32) {
        self.window
            .iter()
            .map(axis)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Coverage of the pixel centred at `(x + 0.5, y + 0.5)`
    pub fn cover(&self, x: u32, y: u32) -> Option<Coverage> {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let [v0, v1, v2] = self.window;
        let e = [edge(v1, v2, px, py), edge(v2, v0, px, py), edge(v0, v1, px, py)];

        for (value, owned) in e.iter().zip(self.edge_owned) {
            if *value < 0.0 || (*value == 0.0 && !owned) {
                return None;
            }
        }

        let screen = e.map(|value| value / self.area);
        let depth = screen[0] * v0.z + screen[1] * v1.z + screen[2] * v2.z;

        let corrected = [
            screen[0] * self.inv_w[0],
            screen[1] * self.inv_w[1],
            screen[2] * self.inv_w[2],
        ];
        let sum = corrected[0] + corrected[1] + corrected[2];
        if sum <= 0.0 {
            return None;
        }

        let mut weights = [0.0; 3];
        for (slot, value) in self.order.iter().zip(corrected) {
            weights[*slot] = value / sum;
        }

        Some(Coverage { depth, weights })
    }
}

fn clamp_span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<u32> {
    // Pixel i is sampled at i + 0.5
    let start = (lo - 0.5).ceil().max(0.0);
    let end = ((hi - 0.5).floor() + 1.0).min(limit as f32);
    if start >= end {
        return 0..0;
    }
    start as u32..end as u32
}

// ============================================================================
// Color target
// ============================================================================

/// `src * a + dst * (1 - a)` on all four channels
#[inline]
pub fn blend_over(dst: Vec4, src: Vec4) -> Vec4 {
    src * src.w + dst * (1.0 - src.w)
}

/// RGBA float color target, row 0 at the bottom
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, clear: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![clear; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::full(self.width, self.height)
    }

    pub fn clear(&mut self, color: Vec4) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Rows bottom-up, one slice per row, for parallel shading
    pub(crate) fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, Vec4> {
        self.pixels.par_chunks_mut(self.width.max(1) as usize)
    }

    /// RGBA8 bytes, top row first
    pub fn to_rgba8(&self) -> Vec<u8> {
        let width = self.width as usize;
        let texels: Vec<[u8; 4]> = if width == 0 {
            Vec::new()
        } else {
            self.pixels
                .chunks(width)
                .rev()
                .flatten()
                .map(|color| {
                    let c = color.clamp(Vec4::ZERO, Vec4::ONE);
                    [
                        f32_to_unorm8(c.x),
                        f32_to_unorm8(c.y),
                        f32_to_unorm8(c.z),
                        f32_to_unorm8(c.w),
                    ]
                })
                .collect()
        };
        cast_slice::<[u8; 4], u8>(&texels).to_vec()
    }
}
