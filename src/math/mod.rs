//! Math Module - thin layer over glam
//!
//! glam supplies the vector, quaternion and matrix types. This module adds the
//! handful of guarded helpers the solver relies on and the transform value
//! types that game code embeds.

pub mod transform;

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
pub use transform::{Transform2D, Transform3D};

use crate::constants::ANGULAR_EPSILON;

/// Normalize `v`, returning the zero vector instead of NaN for zero-length input
pub fn safe_normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// 2D counterpart of [`safe_normalize`]
pub fn safe_normalize2(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Advance `rotation` by `angular_velocity` (rad/s) over `dt`.
///
/// The delta rotation is applied on the left (world frame) and the result is
/// renormalized. Negligible angular speeds leave the rotation untouched.
pub fn integrate_rotation(rotation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    let angular_speed = angular_velocity.length();
    if angular_speed <= ANGULAR_EPSILON {
        return rotation;
    }

    let axis = angular_velocity / angular_speed;
    let delta = Quat::from_axis_angle(axis, angular_speed * dt);
    (delta * rotation).normalize()
}

/// Component-wise sign with zero mapped to +1
pub(crate) fn sign_or_positive(value: f32) -> f32 {
    if value >= 0.0 {
        1.0
    } else {
        -1.0
    }
}
