//! Clipping planes
//!
//! A plane `(a, b, c, d)` keeps the half-space where
//! `(a*x + b*y + c*z + d) / |(a, b, c)| >= 0`. Points exactly on the plane are
//! kept.

use glam::{Vec3, Vec4};

/// One clipping plane and its enable flag
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipPlane {
    /// Plane equation `(a, b, c, d)`
    pub equation: Vec4,
    pub enabled: bool,
}

impl ClipPlane {
    /// An enabled plane
    pub fn new(equation: Vec4) -> Self {
        Self {
            equation,
            enabled: true,
        }
    }

    /// A disabled plane, never evaluated
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Signed distance of `position` from the plane
    ///
    /// `None` when the normal has zero length; such a plane clips nothing.
    #[inline]
    pub fn signed_distance(&self, position: Vec3) -> Option<f32> {
        let normal = self.equation.truncate();
        let length = normal.length();
        if length == 0.0 {
            return None;
        }
        Some((normal.dot(position) + self.equation.w) / length)
    }

    /// Whether the plane discards `position`
    #[inline]
    pub fn clips(&self, position: Vec3) -> bool {
        self.enabled
            && self
                .signed_distance(position)
                .is_some_and(|distance| distance < 0.0)
    }
}

/// Whether any enabled plane discards `position`
///
/// Stops at the first plane that clips.
#[inline]
pub fn is_clipped(planes: &[ClipPlane], position: Vec3) -> bool {
    planes.iter().any(|plane| plane.clips(position))
}
