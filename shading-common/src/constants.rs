//! Centralized constants for the shading stage.
//!
//! Single source of truth for the values shared between the host that builds
//! attribute streams and style palettes, and the stage that consumes them.

/// Product state rendered by the highlight stage. Every other state is discarded.
pub const STATE_HIGHLIGHTED: u8 = 253;

/// Style index meaning "no restyle"; above the reserved threshold, so it
/// resolves to the uniform highlight color.
pub const STYLE_UNSTYLED: u8 = 225;

/// Side of the square style palette, in texels.
///
/// Must match the side the style catalog was built for.
pub const STYLE_PALETTE_SIDE: u32 = 15;

/// Largest palette side a config may request.
pub const MAX_STYLE_PALETTE_SIDE: u32 = 256;

/// Highest restyle index looked up in the palette.
///
/// Indices above this fall back to the uniform highlight color.
pub const STYLE_RESERVED_THRESHOLD: i32 = 224;

/// Default shadow map side, in texels.
pub const DEFAULT_SHADOW_MAP_SIZE: u32 = 512;

/// Largest shadow map side a config may request; keeps texel indices in `u32`.
pub const MAX_SHADOW_MAP_SIZE: u32 = 16384;

/// Default depth bias subtracted from the fragment's light-space depth.
pub const DEFAULT_SHADOW_BIAS: f32 = 0.007;

/// Default brightness floor added to the filtered visibility.
pub const DEFAULT_SHADOW_FLOOR: f32 = 0.5;

/// Default shadow intensity; zero turns shadowing off.
pub const DEFAULT_SHADOW_INTENSITY: f32 = 0.6;

/// Default lower bound of the highlight pulse alpha.
pub const DEFAULT_HIGHLIGHT_ALPHA_MIN: f32 = 0.3;

/// Default upper bound of the highlight pulse alpha.
pub const DEFAULT_HIGHLIGHT_ALPHA_MAX: f32 = 0.6;

/// Shadow map clear texel. Decodes beyond any depth, so cleared texels are lit.
pub const SHADOW_CLEAR_TEXEL: [u8; 4] = [255, 255, 255, 255];

/// Clip-space position emitted for discarded vertices.
pub const DEGENERATE_CLIP_POSITION: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
