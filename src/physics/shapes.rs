//! 3D collision shapes
//!
//! A closed set of shape kinds. Shapes carry only their dimensions; the owning
//! body's transform places them in the world at query time.

use crate::collision2d::aabb::{create_aabb, Aabb2D};
use crate::math::Transform3D;
use glam::{Mat3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Collision shape descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    Sphere { radius: f32 },
    Box { half_extent: Vec3 },
    /// Infinite one-sided plane: points with `dot(normal, p) >= offset` are outside.
    /// Defined in world space, independent of the body transform.
    Plane { normal: Vec3, offset: f32 },
}

impl CollisionShape {
    pub fn sphere(radius: f32) -> Self {
        CollisionShape::Sphere { radius }
    }

    pub fn cuboid(half_extent: Vec3) -> Self {
        CollisionShape::Box { half_extent }
    }

    /// Plane through `normal * offset`; the normal is normalized here
    pub fn plane(normal: Vec3, offset: f32) -> Self {
        CollisionShape::Plane {
            normal: normal.normalize_or_zero(),
            offset,
        }
    }

    /// Radius of a sphere around the shape origin that contains the shape.
    /// Planes are unbounded.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            CollisionShape::Sphere { radius } => *radius,
            CollisionShape::Box { half_extent } => half_extent.length(),
            CollisionShape::Plane { .. } => f32::INFINITY,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            CollisionShape::Sphere { .. } => "sphere",
            CollisionShape::Box { .. } => "box",
            CollisionShape::Plane { .. } => "plane",
        }
    }
}

/// World-space box of a shape, projected onto the XY plane.
///
/// Boxes account for rotation (the box enclosing the rotated box). Planes
/// have no finite bounds.
pub fn shape_world_bounds2d(shape: &CollisionShape, transform: &Transform3D) -> Option<Aabb2D> {
    let center = transform.position.truncate();
    match shape {
        CollisionShape::Sphere { radius } => {
            let extent = Vec2::splat(*radius);
            Some(create_aabb(center - extent, center + extent))
        }
        CollisionShape::Box { half_extent } => {
            let rotation = Mat3::from_quat(transform.rotation);
            let extent = rotation.x_axis.abs() * half_extent.x
                + rotation.y_axis.abs() * half_extent.y
                + rotation.z_axis.abs() * half_extent.z;
            let extent = extent.truncate();
            Some(create_aabb(center - extent, center + extent))
        }
        CollisionShape::Plane { .. } => None,
    }
}
