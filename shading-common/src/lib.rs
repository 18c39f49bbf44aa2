//! Shared types and utilities for the highlight shading stage
//!
//! This crate provides the pieces shared between:
//! - `viewer-shading` (pipeline stages and software passes)
//! - `shade-preview` (scene building and image export)
//!
//! # Modules
//!
//! - [`packing`] - Attribute and texel packing (unorm8, vertex state, RGBA depth)
//! - [`constants`] - State sentinels, palette layout and shadow defaults

pub mod constants;
pub mod packing;

// Re-export commonly used packing items
pub use packing::{
    DEPTH_DECODE_WEIGHTS, DEPTH_ENCODE_SCALE, DepthConvention, decode_depth, encode_depth,
    f32_to_unorm8, fract, pack_color_rgba_unorm8, pack_depth_rgba8, pack_state_attribute,
    pack_vertex_states, round_half_up, unorm8_to_f32, unpack_color_rgba_unorm8,
    unpack_depth_rgba8, unpack_state_attribute, unpack_vertex_states,
};

pub use constants::*;
