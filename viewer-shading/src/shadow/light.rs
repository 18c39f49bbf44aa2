use glam::{Mat4, Vec3};

/// Directional light orientation, in radians
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DirectionalLight {
    pub pitch: f32,
    pub yaw: f32,
}

/// Axis-aligned scene bounds as origin corner plus extent
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub size: Vec3,
}

impl SceneBounds {
    /// Bounds enclosing every point, `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self {
            min,
            size: max - min,
        })
    }

    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size.length()
    }
}

/// Light-space matrices for the depth pass and the shadow lookup
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightView {
    pub view: Mat4,
    pub projection: Mat4,
}

impl LightView {
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Light vertex stage: `P_light * MV_light * position`
    #[inline]
    pub fn clip_position(&self, position: Vec3) -> glam::Vec4 {
        self.view_projection() * position.extend(1.0)
    }
}

/// Fit an orthographic light view around the scene bounds
///
/// The eye sits on a sphere of radius `diagonal / 2` around the bounds centre
/// (with the centre's Y pinned to 0 so the light never dips under the floor),
/// looking at the centre. The projection covers the light-space extent of the
/// bounds, from `1 * meter` to `diagonal` along the view axis.
///
/// Returns `None` for bounds too small to frame.
pub fn fit_light_view(
    light: DirectionalLight,
    bounds: SceneBounds,
    meter: f32,
) -> Option<LightView> {
    let diagonal = bounds.diagonal();
    let near = meter;
    let far = diagonal;
    if !diagonal.is_finite() || far <= near {
        return None;
    }

    let pitch = -light.pitch + std::f32::consts::FRAC_PI_2;
    let yaw = light.yaw;

    let center = Vec3::new(
        bounds.min.x + 0.5 * bounds.size.x,
        0.0,
        bounds.min.z + 0.5 * bounds.size.z,
    );
    let distance = diagonal * 0.5;
    let eye = center
        + distance
            * Vec3::new(
                yaw.cos() * pitch.sin(),
                yaw.sin() * pitch.sin(),
                pitch.cos(),
            );

    // look_at degenerates when looking straight along the up axis
    let forward = (center - eye).normalize_or_zero();
    let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(eye, center, up);

    let corners = [
        bounds.min,
        bounds.min + bounds.size,
        bounds.min + Vec3::new(bounds.size.x, 0.0, 0.0),
        bounds.min + Vec3::new(0.0, bounds.size.y, bounds.size.z),
    ]
    .map(|corner| view.transform_point3(corner));

    let (lo, hi) = corners
        .iter()
        .fold((corners[0], corners[0]), |(lo, hi), c| (lo.min(*c), hi.max(*c)));
    if hi.x - lo.x <= f32::EPSILON || hi.y - lo.y <= f32::EPSILON {
        return None;
    }

    let projection = Mat4::orthographic_rh_gl(lo.x, hi.x, lo.y, hi.y, near, far);

    Some(LightView { view, projection })
}
