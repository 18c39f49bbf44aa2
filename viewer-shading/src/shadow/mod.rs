// ============================================================================
// Shadow Module
// ============================================================================
//
// Everything the shadow feature needs on both sides of the shadow map:
// - map: RGBA8 depth texture written by the light pass
// - filter: 3x3 percentage-closer filter read by the colour pass
// - light: directional light placement and light-space matrices
// - tests: cross-module scenarios

mod filter;
mod light;
mod map;


pub use filter::{PCF_KERNEL, ShadowParams, light_texture_coords, shadow_factor};
pub use light::{DirectionalLight, LightView, SceneBounds, fit_light_view};
pub use map::ShadowMap;
