//! Highlight, clipping and shadow shading for a 3D model viewer
//!
//! The stages are pure functions over per-vertex attributes and per-draw
//! uniforms:
//!
//! - [`vertex`] decodes the packed product state, drops everything that is not
//!   highlighted and resolves the pulsing style color
//! - [`fragment`] applies the hidden flag and the clipping planes, then darkens
//!   the color by the filtered shadow factor
//! - [`shadow`] holds the depth-encoded shadow map, its 3x3 filter and the
//!   directional light fitting
//!
//! [`pipeline`] drives both stages through the software rasterizer in
//! [`raster`], and [`config`] builds the inputs from a TOML file.

pub mod clip;
pub mod config;
pub mod error;
pub mod fragment;
pub mod pipeline;
pub mod raster;
pub mod shadow;
pub mod state;
pub mod style;
pub mod uniforms;
pub mod vertex;

pub use clip::{ClipPlane, is_clipped};
pub use config::ShadingConfig;
pub use error::{ConfigError, StyleError};
pub use fragment::{DiscardReason, Fragment, FragmentInput, composite, shade_fragment};
pub use pipeline::{HighlightPipeline, PassStats, render_shadow_map};
pub use raster::{CullMode, Framebuffer, Viewport};
pub use shadow::{
    DirectionalLight, LightView, SceneBounds, ShadowMap, ShadowParams, fit_light_view,
    shadow_factor,
};
pub use state::{DecodedState, ProductState, decode_state};
pub use style::{PaletteLayout, StylePalette, highlight_color};
pub use uniforms::{DrawUniforms, HighlightUniforms};
pub use vertex::{Varyings, VertexInput, VertexOutput, shade_vertex};

pub use shading_common::DepthConvention;
