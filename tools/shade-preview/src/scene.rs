//! Demo scene: a floor and a handful of boxes in different product states
//!
//! Faces wind counter-clockwise seen from outside. Units are meters, Y up.

use glam::{Mat4, Vec3};
use shading_common::{STATE_HIGHLIGHTED, STYLE_UNSTYLED};
use viewer_shading::config::StyleEntry;
use viewer_shading::{ProductState, SceneBounds, VertexInput};

/// Style index of the blue box
pub const STYLE_BLUE: u8 = 10;
/// Style index of the amber box
pub const STYLE_AMBER: u8 = 20;

/// Restyle index above the palette, so the floor takes the highlight color
const FLOOR_RESTYLE: u8 = 230;

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub vertices: Vec<VertexInput>,
    pub triangles: Vec<[u32; 3]>,
}

impl Scene {
    /// Floor, two restyled boxes, one unstyled box and one hidden box
    pub fn demo() -> Self {
        let mut scene = Scene::default();
        scene.push_quad(
            [
                Vec3::new(-5.0, 0.0, -5.0),
                Vec3::new(-5.0, 0.0, 5.0),
                Vec3::new(5.0, 0.0, 5.0),
                Vec3::new(5.0, 0.0, -5.0),
            ],
            STATE_HIGHLIGHTED,
            FLOOR_RESTYLE,
        );

        let highlighted = STATE_HIGHLIGHTED;
        scene.push_box(
            Vec3::new(-2.5, 0.0, -1.0),
            Vec3::new(-1.0, 2.0, 0.5),
            highlighted,
            STYLE_BLUE,
        );
        scene.push_box(
            Vec3::new(0.5, 0.0, -2.5),
            Vec3::new(2.0, 1.0, -1.0),
            highlighted,
            STYLE_AMBER,
        );
        scene.push_box(
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(2.5, 3.0, 2.5),
            highlighted,
            STYLE_UNSTYLED,
        );

        // Hidden: invisible in the highlight pass but still casts a shadow
        scene.push_box(
            Vec3::new(-1.0, 2.5, 1.5),
            Vec3::new(0.0, 3.0, 2.5),
            ProductState::Hidden.to_u8(),
            STYLE_UNSTYLED,
        );
        scene
    }

    /// Colors for the demo's restyled boxes
    pub fn demo_styles() -> Vec<StyleEntry> {
        vec![
            StyleEntry {
                index: STYLE_BLUE as u32,
                color: [40, 110, 230, 255],
            },
            StyleEntry {
                index: STYLE_AMBER as u32,
                color: [240, 170, 30, 255],
            },
        ]
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|vertex| vertex.position).collect()
    }

    pub fn bounds(&self) -> Option<SceneBounds> {
        SceneBounds::from_points(self.vertices.iter().map(|vertex| vertex.position))
    }

    /// Quad from four counter-clockwise corners
    pub fn push_quad(&mut self, corners: [Vec3; 4], state: u8, restyle: u8) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(
            corners
                .iter()
                .map(|corner| VertexInput::new(*corner, state, restyle)),
        );
        self.triangles.push([base, base + 1, base + 2]);
        self.triangles.push([base, base + 2, base + 3]);
    }

    /// Axis-aligned box with outward-facing sides
    pub fn push_box(&mut self, min: Vec3, max: Vec3, state: u8, restyle: u8) {
        let (x0, y0, z0) = min.into();
        let (x1, y1, z1) = max.into();
        let faces = [
            // +X
            [(x1, y0, z0), (x1, y1, z0), (x1, y1, z1), (x1, y0, z1)],
            // -X
            [(x0, y0, z0), (x0, y0, z1), (x0, y1, z1), (x0, y1, z0)],
            // +Y
            [(x0, y1, z0), (x0, y1, z1), (x1, y1, z1), (x1, y1, z0)],
            // -Y
            [(x0, y0, z0), (x1, y0, z0), (x1, y0, z1), (x0, y0, z1)],
            // +Z
            [(x0, y0, z1), (x1, y0, z1), (x1, y1, z1), (x0, y1, z1)],
            // -Z
            [(x0, y0, z0), (x0, y1, z0), (x1, y1, z0), (x1, y0, z0)],
        ];
        for face in faces {
            self.push_quad(face.map(Vec3::from), state, restyle);
        }
    }
}

/// Orbit camera looking at the scene centre
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(7.0, 6.0, 9.0),
            target: Vec3::new(0.0, 0.5, 0.0),
            fov_y: 45f32.to_radians(),
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, aspect_ratio, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(scene: &Scene, triangle: [u32; 3]) -> (Vec3, Vec3) {
        let [a, b, c] = triangle.map(|i| scene.vertices[i as usize].position);
        ((b - a).cross(c - a), (a + b + c) / 3.0)
    }

    #[test]
    fn test_box_faces_point_outward() {
        let mut scene = Scene::default();
        let (min, max) = (Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 5.0));
        scene.push_box(min, max, STATE_HIGHLIGHTED, STYLE_UNSTYLED);
        let centre = (min + max) * 0.5;

        assert_eq!(scene.vertices.len(), 24);
        assert_eq!(scene.triangles.len(), 12);
        for triangle in &scene.triangles {
            let (normal, centroid) = triangle_normal(&scene, *triangle);
            assert!(normal.dot(centroid - centre) > 0.0, "{triangle:?}");
        }
    }

    #[test]
    fn test_floor_faces_up() {
        let scene = Scene::demo();
        let (normal, _) = triangle_normal(&scene, scene.triangles[0]);
        assert!(normal.y > 0.0);
    }

    #[test]
    fn test_demo_has_hidden_and_restyled_geometry() {
        let scene = Scene::demo();
        let states: Vec<[f32; 2]> = scene.vertices.iter().map(|v| v.state).collect();
        assert!(states.iter().any(|s| s[0] == ProductState::Hidden.to_u8() as f32));
        assert!(states.iter().any(|s| s[1] == STYLE_BLUE as f32));
        assert!(states.iter().any(|s| s[1] == STYLE_AMBER as f32));

        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(bounds.size, Vec3::new(10.0, 3.0, 10.0));
    }

    #[test]
    fn test_demo_styles_fit_palette() {
        let mut palette = viewer_shading::StylePalette::default();
        for entry in Scene::demo_styles() {
            palette.define_style(entry.index, entry.color).unwrap();
        }
        assert!(palette.is_defined(STYLE_BLUE as u32));
    }
}
