//! Narrowphase collision routines
//!
//! Pure functions over (shape, transform) pairs. Each routine returns `None`
//! when the shapes are apart and otherwise a contact with positive penetration
//! whose normal points from the first shape toward the second. All routing
//! between shape kinds goes through [`check_collision3d`].

use super::collision_data::ContactPoint;
use super::shapes::CollisionShape;
use crate::constants::DISTANCE_EPSILON;
use crate::math::{sign_or_positive, Transform3D};
use glam::Vec3;

// ============================================================================
// DISPATCH
// ============================================================================

/// Test two placed shapes for contact.
///
/// Mirrored pairs reuse the canonical routine with the arguments swapped and
/// the normal negated. Plane vs plane never reports contact.
pub fn check_collision3d(
    shape_a: &CollisionShape,
    transform_a: &Transform3D,
    shape_b: &CollisionShape,
    transform_b: &Transform3D,
) -> Option<ContactPoint> {
    use CollisionShape::*;

    match (shape_a, shape_b) {
        (Sphere { radius: ra }, Sphere { radius: rb }) => {
            collide_sphere_sphere(*ra, transform_a, *rb, transform_b)
        }
        (Sphere { radius }, Box { half_extent }) => {
            collide_sphere_box(*radius, transform_a, *half_extent, transform_b)
        }
        (Box { half_extent }, Sphere { radius }) => {
            collide_sphere_box(*radius, transform_b, *half_extent, transform_a)
                .map(|contact| contact.flipped())
        }
        (Sphere { radius }, Plane { normal, offset }) => {
            collide_sphere_plane(*radius, transform_a, *normal, *offset)
        }
        (Plane { normal, offset }, Sphere { radius }) => {
            collide_sphere_plane(*radius, transform_b, *normal, *offset)
                .map(|contact| contact.flipped())
        }
        (Box { half_extent }, Plane { normal, offset }) => {
            collide_box_plane(*half_extent, transform_a, *normal, *offset)
        }
        (Plane { normal, offset }, Box { half_extent }) => {
            collide_box_plane(*half_extent, transform_b, *normal, *offset)
                .map(|contact| contact.flipped())
        }
        (Box { half_extent: ha }, Box { half_extent: hb }) => {
            collide_box_box(*ha, transform_a, *hb, transform_b)
        }
        (Plane { .. }, Plane { .. }) => None,
    }
}

// ============================================================================
// SPHERE ROUTINES
// ============================================================================

/// Sphere vs sphere. Coincident centers fall back to a +Y normal.
pub fn collide_sphere_sphere(
    radius_a: f32,
    transform_a: &Transform3D,
    radius_b: f32,
    transform_b: &Transform3D,
) -> Option<ContactPoint> {
    let delta = transform_b.position - transform_a.position;
    let dist_sq = delta.length_squared();
    let radius_sum = radius_a + radius_b;

    if dist_sq >= radius_sum * radius_sum {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > DISTANCE_EPSILON {
        delta / dist
    } else {
        Vec3::Y
    };

    Some(ContactPoint::new(
        transform_a.position + normal * radius_a,
        normal,
        radius_sum - dist,
    ))
}

/// Sphere vs infinite one-sided plane.
///
/// The plane lives in world space. A sphere anywhere behind the plane is in
/// contact, however deep.
pub fn collide_sphere_plane(
    radius: f32,
    sphere_transform: &Transform3D,
    plane_normal: Vec3,
    plane_offset: f32,
) -> Option<ContactPoint> {
    let center = sphere_transform.position;
    let distance = plane_normal.dot(center) - plane_offset;

    if distance >= radius {
        return None;
    }

    Some(ContactPoint::new(
        center - plane_normal * distance,
        -plane_normal,
        radius - distance,
    ))
}

/// Sphere vs oriented box.
///
/// Works in the box's local frame: clamp the sphere center to the box to find
/// the closest point, then rotate the result back. A sphere center lying on
/// the closest point (touching the surface or inside the box) uses local +Y
/// as the outward direction.
pub fn collide_sphere_box(
    radius: f32,
    sphere_transform: &Transform3D,
    half_extent: Vec3,
    box_transform: &Transform3D,
) -> Option<ContactPoint> {
    let local_center = box_transform.inverse_transform_point(sphere_transform.position);
    let closest = local_center.clamp(-half_extent, half_extent);
    let offset = local_center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let local_outward = if dist > DISTANCE_EPSILON {
        offset / dist
    } else {
        Vec3::Y
    };

    // Outward points box -> sphere; contact normals run sphere -> box.
    let normal = -(box_transform.rotation * local_outward);

    Some(ContactPoint::new(
        box_transform.transform_point(closest),
        normal,
        radius - dist,
    ))
}

// ============================================================================
// BOX ROUTINES
// ============================================================================

/// World-space corners of an oriented box
pub fn box_corners(half_extent: Vec3, transform: &Transform3D) -> [Vec3; 8] {
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let local = Vec3::new(
            if i & 1 == 0 { -half_extent.x } else { half_extent.x },
            if i & 2 == 0 { -half_extent.y } else { half_extent.y },
            if i & 4 == 0 { -half_extent.z } else { half_extent.z },
        );
        *corner = transform.transform_point(local);
    }
    corners
}

/// Oriented box vs plane: the deepest corner below the plane is the contact.
pub fn collide_box_plane(
    half_extent: Vec3,
    box_transform: &Transform3D,
    plane_normal: Vec3,
    plane_offset: f32,
) -> Option<ContactPoint> {
    let mut deepest = Vec3::ZERO;
    let mut min_distance = f32::INFINITY;

    for corner in box_corners(half_extent, box_transform) {
        let distance = plane_normal.dot(corner) - plane_offset;
        if distance < min_distance {
            min_distance = distance;
            deepest = corner;
        }
    }

    if min_distance >= 0.0 {
        return None;
    }

    Some(ContactPoint::new(deepest, -plane_normal, -min_distance))
}

/// Box vs box as world-aligned AABBs.
///
/// Rotation is deliberately ignored; only the half-extents and the center
/// delta matter. The minimum-overlap axis wins, ties resolved x, then y, then z.
pub fn collide_box_box(
    half_a: Vec3,
    transform_a: &Transform3D,
    half_b: Vec3,
    transform_b: &Transform3D,
) -> Option<ContactPoint> {
    let delta = transform_b.position - transform_a.position;
    let overlap = half_a + half_b - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }

    let (normal, penetration) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (Vec3::new(sign_or_positive(delta.x), 0.0, 0.0), overlap.x)
    } else if overlap.y <= overlap.z {
        (Vec3::new(0.0, sign_or_positive(delta.y), 0.0), overlap.y)
    } else {
        (Vec3::new(0.0, 0.0, sign_or_positive(delta.z)), overlap.z)
    };

    Some(ContactPoint::new(
        transform_a.position + delta * 0.5,
        normal,
        penetration,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_4;

    fn at(x: f32, y: f32, z: f32) -> Transform3D {
        Transform3D::from_position(Vec3::new(x, y, z))
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn approx_vec_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_sphere_sphere_apart() {
        assert!(collide_sphere_sphere(1.0, &at(0.0, 0.0, 0.0), 1.0, &at(3.0, 0.0, 0.0)).is_none());
        // Exactly touching is not overlapping
        assert!(collide_sphere_sphere(1.0, &at(0.0, 0.0, 0.0), 1.0, &at(2.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_sphere_sphere_overlapping() {
        let contact = collide_sphere_sphere(1.0, &at(0.0, 0.0, 0.0), 1.0, &at(1.5, 0.0, 0.0))
            .expect("spheres overlap");
        assert!(approx_eq(contact.penetration, 0.5));
        assert!(approx_vec_eq(contact.normal, Vec3::X));
        assert!(approx_vec_eq(contact.point, Vec3::X));
    }

    #[test]
    fn test_sphere_sphere_coincident_defaults_up() {
        let contact = collide_sphere_sphere(0.5, &at(1.0, 1.0, 1.0), 0.5, &at(1.0, 1.0, 1.0))
            .expect("coincident spheres overlap");
        assert_eq!(contact.normal, Vec3::Y);
        assert!(approx_eq(contact.penetration, 1.0));
        assert!(contact.normal.is_finite());
    }

    #[test]
    fn test_sphere_plane() {
        let ground_normal = Vec3::Y;
        assert!(collide_sphere_plane(0.5, &at(0.0, 2.0, 0.0), ground_normal, 0.0).is_none());

        let contact = collide_sphere_plane(0.5, &at(0.0, 0.4, 0.0), ground_normal, 0.0)
            .expect("sphere dips below plane");
        assert!(approx_eq(contact.penetration, 0.1));
        assert!(approx_vec_eq(contact.normal, -Vec3::Y));
        assert!(approx_vec_eq(contact.point, Vec3::ZERO));
    }

    #[test]
    fn test_sphere_plane_with_offset_and_behind() {
        // Sphere entirely behind a raised plane is still in contact
        let contact = collide_sphere_plane(1.0, &at(0.0, -3.0, 0.0), Vec3::Y, 2.0)
            .expect("behind the plane");
        assert!(approx_eq(contact.penetration, 6.0));
    }

    #[test]
    fn test_sphere_box_face() {
        let contact =
            collide_sphere_box(1.0, &at(0.0, 1.8, 0.0), Vec3::ONE, &at(0.0, 0.0, 0.0))
                .expect("sphere touches the top face");
        assert!(approx_eq(contact.penetration, 0.2));
        assert!(approx_vec_eq(contact.normal, -Vec3::Y));
        assert!(approx_vec_eq(contact.point, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_sphere_box_rotated() {
        // Box rotated 45 degrees about Z: its corner now points straight up at y = sqrt(2)
        let box_transform = Transform3D::from_position_rotation(Vec3::ZERO, Quat::from_rotation_z(FRAC_PI_4));
        let top = 2.0_f32.sqrt();

        assert!(collide_sphere_box(0.5, &at(0.0, top + 0.6, 0.0), Vec3::ONE, &box_transform).is_none());

        let contact = collide_sphere_box(0.5, &at(0.0, top + 0.4, 0.0), Vec3::ONE, &box_transform)
            .expect("sphere rests on the rotated corner");
        assert!(approx_eq(contact.penetration, 0.1));
        assert!(approx_vec_eq(contact.normal, -Vec3::Y));
    }

    #[test]
    fn test_sphere_box_center_inside_defaults_up() {
        let contact = collide_sphere_box(0.5, &at(0.0, 0.0, 0.0), Vec3::ONE, &at(0.0, 0.0, 0.0))
            .expect("sphere inside box");
        assert!(approx_vec_eq(contact.normal, -Vec3::Y));
        assert!(approx_eq(contact.penetration, 0.5));
    }

    #[test]
    fn test_box_plane() {
        assert!(collide_box_plane(Vec3::splat(0.5), &at(0.0, 0.6, 0.0), Vec3::Y, 0.0).is_none());
        // Resting exactly on the plane is not penetrating
        assert!(collide_box_plane(Vec3::splat(0.5), &at(0.0, 0.5, 0.0), Vec3::Y, 0.0).is_none());

        let contact = collide_box_plane(Vec3::splat(0.5), &at(0.0, 0.3, 0.0), Vec3::Y, 0.0)
            .expect("box sinks into plane");
        assert!(approx_eq(contact.penetration, 0.2));
        assert!(approx_vec_eq(contact.normal, -Vec3::Y));
        assert!(approx_eq(contact.point.y, -0.2));
    }

    #[test]
    fn test_box_plane_rotated_corner() {
        let transform = Transform3D::from_position_rotation(
            Vec3::new(0.0, 1.3, 0.0),
            Quat::from_rotation_z(FRAC_PI_4),
        );
        // Lowest corner sits sqrt(2) below the center
        let contact = collide_box_plane(Vec3::ONE, &transform, Vec3::Y, 0.0)
            .expect("corner pokes through");
        assert!(approx_eq(contact.penetration, 2.0_f32.sqrt() - 1.3));
        assert!(approx_eq(contact.point.x, 0.0));
    }

    #[test]
    fn test_box_box_min_axis() {
        let contact = collide_box_box(Vec3::ONE, &at(0.0, 0.0, 0.0), Vec3::ONE, &at(1.5, 0.2, 0.0))
            .expect("boxes overlap");
        assert!(approx_vec_eq(contact.normal, Vec3::X));
        assert!(approx_eq(contact.penetration, 0.5));

        let contact = collide_box_box(Vec3::ONE, &at(0.0, 0.0, 0.0), Vec3::ONE, &at(0.0, -1.9, 0.3))
            .expect("boxes overlap");
        assert!(approx_vec_eq(contact.normal, -Vec3::Y));
        assert!(approx_eq(contact.penetration, 0.1));
    }

    #[test]
    fn test_box_box_tie_prefers_x() {
        let contact = collide_box_box(Vec3::ONE, &at(0.0, 0.0, 0.0), Vec3::ONE, &at(1.0, 1.0, 1.0))
            .expect("boxes overlap");
        assert_eq!(contact.normal, Vec3::X);

        let contact = collide_box_box(Vec3::ONE, &at(0.0, 0.0, 0.0), Vec3::ONE, &at(0.0, 1.0, 1.0))
            .expect("boxes overlap");
        assert_eq!(contact.normal, Vec3::Y);
    }

    #[test]
    fn test_box_box_ignores_rotation() {
        let rotated = Transform3D::from_position_rotation(
            Vec3::new(1.9, 0.0, 0.0),
            Quat::from_rotation_z(FRAC_PI_4),
        );
        let contact = collide_box_box(Vec3::ONE, &at(0.0, 0.0, 0.0), Vec3::ONE, &rotated)
            .expect("treated as aligned");
        assert!(approx_eq(contact.penetration, 0.1));
        assert!(collide_box_box(Vec3::ONE, &at(0.0, 0.0, 0.0), Vec3::ONE, &at(2.1, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_dispatch_plane_plane_never_collides() {
        let plane = CollisionShape::plane(Vec3::Y, 0.0);
        let t = Transform3D::default();
        assert!(check_collision3d(&plane, &t, &plane, &t).is_none());
    }

    #[test]
    fn test_dispatch_symmetry() {
        let sphere = CollisionShape::sphere(0.75);
        let cube = CollisionShape::cuboid(Vec3::new(1.0, 0.5, 1.0));
        let plane = CollisionShape::plane(Vec3::Y, 0.0);
        let other_sphere = CollisionShape::sphere(1.0);

        let cases = [
            (sphere, at(0.2, 0.0, 0.0), other_sphere, at(1.2, 0.5, 0.0)),
            (sphere, at(0.3, 1.1, 0.2), cube, at(0.0, 0.0, 0.0)),
            (sphere, at(0.0, 0.5, 0.0), plane, Transform3D::default()),
            (cube, at(0.0, 0.2, 0.0), plane, Transform3D::default()),
            (cube, at(0.0, 0.0, 0.0), cube, at(1.5, 0.3, -0.2)),
        ];

        for (shape_a, ta, shape_b, tb) in cases.iter() {
            let ab = check_collision3d(shape_a, ta, shape_b, tb).expect("pair overlaps");
            let ba = check_collision3d(shape_b, tb, shape_a, ta).expect("pair overlaps");

            assert!(approx_eq(ab.penetration, ba.penetration), "{:?} vs {:?}", shape_a, shape_b);
            assert!(approx_vec_eq(ab.normal, -ba.normal), "{:?} vs {:?}", shape_a, shape_b);
            assert!(ab.penetration > 0.0);
        }
    }

    #[test]
    fn test_sphere_near_box_corner() {
        let unit_box = CollisionShape::cuboid(Vec3::ONE);
        let sphere = CollisionShape::sphere(1.0);
        let diagonal = Vec3::ONE.normalize();
        let sphere_at = Transform3D::from_position(Vec3::ONE + diagonal * 0.95);

        let contact = check_collision3d(&unit_box, &Transform3D::default(), &sphere, &sphere_at)
            .expect("sphere overlaps corner");

        assert!(contact.penetration > 0.0);
        assert!(approx_eq(contact.penetration, 0.05));
        // Points away from the box, along the corner diagonal
        assert!(approx_vec_eq(contact.normal, diagonal));
        assert!(approx_vec_eq(contact.point, Vec3::ONE));

        let far = Transform3D::from_position(Vec3::ONE + diagonal * 1.05);
        assert!(check_collision3d(&unit_box, &Transform3D::default(), &sphere, &far).is_none());
    }
}
