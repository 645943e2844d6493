/// 2D Axis-Aligned Bounding Box helpers
///
/// Pure functions over plain bounds data. The spatial grid uses them for cell
/// coverage and the hit-test layer for box overlap and ray slabs.

use glam::Vec2;

/// Axis-aligned rectangle - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2D {
    pub min: Vec2,
    pub max: Vec2,
}

/// Create bounds from min/max corners
pub fn create_aabb(min: Vec2, max: Vec2) -> Aabb2D {
    Aabb2D { min, max }
}

/// Create bounds from a center point and half extents
pub fn aabb_from_center_half_extents(center: Vec2, half_extents: Vec2) -> Aabb2D {
    Aabb2D {
        min: center - half_extents,
        max: center + half_extents,
    }
}

pub fn aabb_center(aabb: &Aabb2D) -> Vec2 {
    (aabb.min + aabb.max) * 0.5
}

pub fn aabb_half_extents(aabb: &Aabb2D) -> Vec2 {
    (aabb.max - aabb.min) * 0.5
}

/// Overlap test, inclusive: touching edges count
pub fn aabb_intersects(a: &Aabb2D, b: &Aabb2D) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
}

pub fn aabb_contains_point(aabb: &Aabb2D, point: Vec2) -> bool {
    point.x >= aabb.min.x && point.x <= aabb.max.x && point.y >= aabb.min.y && point.y <= aabb.max.y
}

/// True when `outer` fully encloses `inner`
pub fn aabb_contains_aabb(outer: &Aabb2D, inner: &Aabb2D) -> bool {
    aabb_contains_point(outer, inner.min) && aabb_contains_point(outer, inner.max)
}

/// Smallest box holding both inputs
pub fn aabb_union(a: &Aabb2D, b: &Aabb2D) -> Aabb2D {
    Aabb2D {
        min: a.min.min(b.min),
        max: a.max.max(b.max),
    }
}

/// Bounds of the segment `origin .. origin + direction * max_distance`
pub fn aabb_from_segment(origin: Vec2, direction: Vec2, max_distance: f32) -> Aabb2D {
    let end = origin + direction * max_distance;
    Aabb2D {
        min: origin.min(end),
        max: origin.max(end),
    }
}

/// Slab test of a ray against bounds.
///
/// Returns the entry distance along `direction` (scaled by its length) and
/// the entry face normal, or `None` when the ray misses or the hit lies
/// outside `[0, max_distance]`. A ray starting inside reports distance 0
/// and a zero normal.
pub fn aabb_ray_intersection(
    aabb: &Aabb2D,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<(f32, Vec2)> {
    let mut t_min: f32 = 0.0;
    let mut t_max: f32 = max_distance;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let o = origin[axis];
        let d = direction[axis];
        let lo = aabb.min[axis];
        let hi = aabb.max[axis];

        if d.abs() < 1e-8 {
            // Parallel to this slab
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t_near = (lo - o) * inv;
        let mut t_far = (hi - o) * inv;
        let mut face = -1.0;
        if t_near > t_far {
            std::mem::swap(&mut t_near, &mut t_far);
            face = 1.0;
        }

        if t_near > t_min {
            t_min = t_near;
            normal = Vec2::ZERO;
            normal[axis] = face;
        }
        t_max = t_max.min(t_far);

        if t_min > t_max {
            return None;
        }
    }

    Some((t_min, normal))
}
