//! shade-preview - renders a demo scene through the highlight shading stage
//!
//! Runs the light depth pass, then the highlight pass, and writes the result
//! as PNG. Optionally dumps the encoded shadow map as well.

mod scene;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec4;
use viewer_shading::{
    DirectionalLight, DrawUniforms, Framebuffer, HighlightPipeline, ShadingConfig, ShadowMap,
    Viewport, fit_light_view, render_shadow_map,
};

use scene::{Camera, Scene};

const BACKGROUND: Vec4 = Vec4::new(0.08, 0.08, 0.1, 1.0);

#[derive(Parser)]
#[command(name = "shade-preview")]
#[command(about = "Render the highlight shading demo scene to PNG")]
#[command(version)]
struct Cli {
    /// Shading config (shading.toml); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long, default_value = "preview.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Highlight pulse phase in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    phase: f32,

    /// Light pitch in radians
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    light_pitch: f32,

    /// Light yaw in radians
    #[arg(long, default_value_t = 1.2, allow_negative_numbers = true)]
    light_yaw: f32,

    /// Length of one meter in scene units; the light's near plane
    #[arg(long, default_value_t = 1.0)]
    meter: f32,

    /// Also write the encoded shadow map to this PNG
    #[arg(long)]
    shadow_map: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if !Viewport::full(cli.width, cli.height).is_valid() {
        anyhow::bail!("Image size must be non-zero (got {}x{})", cli.width, cli.height);
    }

    let mut config = match &cli.config {
        Some(path) => ShadingConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ShadingConfig::default(),
    };
    if config.palette.styles.is_empty() {
        config.palette.styles = Scene::demo_styles();
    }
    let palette = config.build_palette().context("Invalid palette styles")?;

    let scene = Scene::demo();
    let bounds = scene.bounds().context("Scene is empty")?;
    let light = DirectionalLight {
        pitch: cli.light_pitch,
        yaw: cli.light_yaw,
    };
    let light_view = fit_light_view(light, bounds, cli.meter)
        .context("Scene bounds are too small to fit the light view")?;

    let shadow = config.shadow_params();
    let mut map = config.shadow_map();
    if shadow.enabled {
        let stats = render_shadow_map(
            &scene.positions(),
            &scene.triangles,
            &light_view,
            &mut map,
            config.shadow_cull_mode(),
        );
        tracing::info!(
            "Shadow map {}x{}: {} depth writes",
            map.size(),
            map.size(),
            stats.fragments_written
        );
    } else {
        tracing::info!("Shadows disabled");
    }

    let camera = Camera::default();
    let mut target = Framebuffer::new(cli.width, cli.height, BACKGROUND);
    let uniforms = DrawUniforms {
        model_view: camera.view(),
        projection: camera.projection(target.viewport().aspect_ratio()),
        light_model_view: light_view.view,
        light_projection: light_view.projection,
        highlight: config.highlight_uniforms(cli.phase),
        clip_planes: config.clip_planes(),
        shadow,
    };

    let stats = HighlightPipeline::new(uniforms)
        .with_palette(&palette)
        .with_shadow_map(&map)
        .render(&scene.vertices, &scene.triangles, &mut target);
    tracing::info!(
        "Highlight pass: {} of {} triangles drawn, {} fragments, {} clipped",
        stats.triangles - stats.skipped,
        stats.triangles,
        stats.fragments_written,
        stats.fragments_clipped
    );

    write_png(&cli.output, cli.width, cli.height, target.to_rgba8(), false)?;
    tracing::info!("Wrote {}", cli.output.display());

    if let Some(path) = &cli.shadow_map {
        save_shadow_map(path, &map)?;
        tracing::info!("Wrote shadow map {}", path.display());
    }

    Ok(())
}

/// Encoded shadow texels as an RGBA PNG, top row first
fn save_shadow_map(path: &Path, map: &ShadowMap) -> Result<()> {
    write_png(path, map.size(), map.size(), map.as_bytes().to_vec(), true)
}

fn write_png(path: &Path, width: u32, height: u32, rgba: Vec<u8>, flip: bool) -> Result<()> {
    let mut image = image::RgbaImage::from_raw(width, height, rgba)
        .context("Pixel buffer does not match image size")?;
    if flip {
        image::imageops::flip_vertical_in_place(&mut image);
    }
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading_common::DepthConvention;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["shade-preview"]);
        assert_eq!(cli.output, PathBuf::from("preview.png"));
        assert_eq!((cli.width, cli.height), (640, 480));
        assert_eq!(cli.phase, 1.0);
        assert!(cli.config.is_none());
        assert!(cli.shadow_map.is_none());
    }

    #[test]
    fn test_cli_accepts_negative_angles() {
        let cli = Cli::parse_from(["shade-preview", "--light-pitch", "-0.3", "--light-yaw", "-1"]);
        assert_eq!(cli.light_pitch, -0.3);
        assert_eq!(cli.light_yaw, -1.0);
    }

    #[test]
    fn test_shadow_map_png_is_flipped_to_top_down() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");

        let mut map = ShadowMap::new(2, DepthConvention::Unit);
        map.write_depth(0, 0, 0.0);
        save_shadow_map(&path, &map).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (2, 2));
        // Bottom-left texel lands in the last row
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
