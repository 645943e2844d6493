//! Transform value types
//!
//! Plain `Copy` data. The physics world stores one `Transform3D` inline per
//! body and writes it every sub-step; rendering reads it back after `step`.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Position, orientation and scale of a 3D object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform3D {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Scale, then rotate, then translate
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Map a world-space point into this transform's rotated frame (scale ignored)
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// Map a local-frame point back to world space (scale ignored)
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }
}

/// Position, angle (radians) and scale of a 2D object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform2D {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn to_matrix(&self) -> Mat3 {
        Mat3::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_matrix_compose_order() {
        let transform = Transform3D {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_z(FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        // Scale (1,0,0) -> (2,0,0), rotate -> (0,2,0), translate -> (1,4,3)
        let p = transform.to_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 4.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_inverse_transform_point_round_trip() {
        let transform =
            Transform3D::from_position_rotation(Vec3::new(5.0, 0.0, -2.0), Quat::from_rotation_y(0.7));
        let world = Vec3::new(1.0, 2.0, 3.0);
        let local = transform.inverse_transform_point(world);
        assert!((transform.transform_point(local) - world).length() < 1e-5);
    }

    #[test]
    fn test_transform2d_matrix() {
        let transform = Transform2D {
            position: Vec2::new(10.0, 0.0),
            rotation: FRAC_PI_2,
            scale: Vec2::ONE,
        };
        let p = transform.to_matrix().transform_point2(Vec2::X);
        assert!((p - Vec2::new(10.0, 1.0)).length() < 1e-5);
    }
}
