//! Physics Module - 3D rigid bodies
//!
//! Data lives in `*_data.rs`, the step pipeline in `world_operations.rs`.
//! Narrowphase routines are free functions dispatched from one table.

pub mod collision_data;
pub mod narrowphase;
pub mod rigid_body;
pub mod shapes;
pub mod world_data;
pub mod world_operations;

pub use collision_data::{ContactPoint, ContactRecord, StepStats};
pub use narrowphase::check_collision3d;
pub use rigid_body::{BodyType, RigidBody};
pub use shapes::{shape_world_bounds2d, CollisionShape};
pub use world_data::{BodyHandle, CollisionCallback, PhysicsBody, RigidBodyWorld};

// Re-export step stages
pub use world_operations::{detect_and_resolve, integrate_bodies, resolve_contact, update_sleep};
