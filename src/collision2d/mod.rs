//! 2D gameplay collision
//!
//! Tagged hit volumes with boolean overlap tests, a uniform grid for range
//! queries and a system that dispatches hit callbacks for moved colliders.
//! No mass, no response.

pub mod aabb;
pub mod collider;
pub mod physics_system;
pub mod spatial_grid;

pub use aabb::Aabb2D;
pub use collider::{Collider, ColliderHandle, ColliderTag, HitCallback, HitEvent, Shape2D};
pub use hit_test::{check_hit, check_hit_shapes, raycast_aabb, raycast_circle, raycast_shape, RayHit2D};
pub use physics_system::PhysicsSystem;
pub use spatial_grid::{GridEntry, SpatialGrid2D};
