// Hearth Physics - rigid bodies and gameplay collision
//
// Data-oriented layout:
// - physics: 3D rigid body world (data in world_data, pipeline in world_operations)
// - collision2d: tagged 2D hit volumes, spatial grid and hit dispatch
// - context: PhysicsContext, the single owner of all simulation state
//
// Nothing here is global. Create a PhysicsContext (or the pieces you need)
// and pass it around.

// Constants module
pub mod constants;

// Core modules
pub mod config;
pub mod context;
pub mod error;
pub mod math;

// Simulation
pub mod collision2d;
pub mod physics;

pub use collision2d::{
    check_hit, Collider, ColliderHandle, ColliderTag, HitEvent, PhysicsSystem, RayHit2D,
    Shape2D, SpatialGrid2D,
};
pub use config::{GridConfig, SleepSettings, SolverSettings, WorldConfig};
pub use context::{FrameReport, PhysicsContext};
pub use error::{OptionExt, PhysicsError, PhysicsResult};
pub use math::{Transform2D, Transform3D};
pub use physics::{
    check_collision3d, BodyHandle, BodyType, CollisionShape, ContactPoint, ContactRecord,
    PhysicsBody, RigidBody, RigidBodyWorld, StepStats,
};

// Re-export math library
pub use glam;
