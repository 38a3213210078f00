use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::utils::{orientation_from, project_on_plane, try_direction};

/// Local orthonormal basis at a point on the sphere.
///
/// `normal` points radially out, `forward` is the tangent direction of travel and
/// `right = normal × forward`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TangentFrame {
    pub normal: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
}

impl TangentFrame {
    /// Builds the frame at `position` for a world spinning about `spin_axis`.
    ///
    /// Travel follows `-(spin_axis × normal)`. Near the poles of the spin axis that cross
    /// product vanishes and `fallback_forward` projected onto the tangent plane is used
    /// instead; if that is degenerate too, an arbitrary tangent is picked so the result is
    /// always finite. A `position` at `center` yields a frame with `normal = Y`.
    #[inline]
    pub fn compute(position: Vec3, center: Vec3, spin_axis: Vec3, fallback_forward: Vec3) -> Self {
        let normal = (position - center).try_normalize().unwrap_or(Vec3::Y);

        let forward = try_direction(-spin_axis.cross(normal))
            .or_else(|| try_direction(project_on_plane(fallback_forward, normal)))
            .unwrap_or_else(|| normal.any_orthonormal_vector());

        let right = normal.cross(forward).normalize();

        Self {
            normal,
            forward,
            right,
        }
    }

    /// Decomposes an offset into (along, lateral, radial) components of this frame.
    #[inline]
    pub fn decompose(&self, offset: Vec3) -> (f32, f32, f32) {
        (
            offset.dot(self.forward),
            offset.dot(self.right),
            offset.dot(self.normal),
        )
    }

    /// World rotation facing `forward` with `normal` as up.
    pub fn rotation(&self) -> Quat {
        orientation_from(self.forward, self.normal)
    }
}
