use bevy::math::{Mat3, Quat, Vec3};

use crate::utils::DEGENERATE_EPSILON;

/// Removes the component of `v` along the unit vector `normal`.
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Normalises `v`, or returns `None` when it is too short to carry a direction.
#[inline]
pub fn try_direction(v: Vec3) -> Option<Vec3> {
    if v.length_squared() < DEGENERATE_EPSILON {
        None
    } else {
        Some(v.normalize())
    }
}

/// Rotation whose local `-Z` faces `forward` and local `Y` is `up`.
///
/// `forward` is re-orthogonalised against `up`. The lateral axis `up × forward` ends up on
/// local `-X` in Bevy's right-handed convention.
pub fn orientation_from(forward: Vec3, up: Vec3) -> Quat {
    let up = up.normalize();
    let forward = try_direction(project_on_plane(forward, up))
        .unwrap_or_else(|| up.any_orthonormal_vector());
    let x = up.cross(-forward);
    Quat::from_mat3(&Mat3::from_cols(x, up, -forward)).normalize()
}

/// Unit forward (`-Z`) of a rotation produced by [`orientation_from`].
#[inline]
pub fn forward_of(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

/// Unit up (`Y`) of a rotation produced by [`orientation_from`].
#[inline]
pub fn up_of(rotation: Quat) -> Vec3 {
    rotation * Vec3::Y
}

/// Clamps to the symmetric unit interval.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(-1.0, 1.0)
}
