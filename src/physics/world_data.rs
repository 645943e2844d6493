//! Rigid body world data
//!
//! Storage and lookup for the 3D world. The step pipeline lives in
//! `world_operations.rs`.

use super::collision_data::{ContactPoint, ContactRecord, StepStats};
use super::rigid_body::RigidBody;
use super::shapes::CollisionShape;
use crate::config::{SleepSettings, SolverSettings, WorldConfig};
use crate::error::{OptionExt, PhysicsError, PhysicsResult};
use crate::math::Transform3D;
use glam::{Quat, Vec3};
use std::fmt;

/// Stable identifier for a body in a `RigidBodyWorld`.
///
/// Allocated from a counter and never reused, so a stale handle simply fails
/// to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

impl BodyHandle {
    /// Placeholder carried by bodies not yet added to a world
    pub const INVALID: BodyHandle = BodyHandle(0);

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Invoked during contact resolution with the other body and the contact,
/// normal pointing away from the receiving body.
pub type CollisionCallback = Box<dyn FnMut(&PhysicsBody, &ContactPoint)>;

/// A rigid body placed in the world with its shape and transform
pub struct PhysicsBody {
    pub handle: BodyHandle,
    pub rigid_body: RigidBody,
    pub shape: CollisionShape,
    pub transform: Transform3D,
    pub on_collision: Option<CollisionCallback>,
}

impl fmt::Debug for PhysicsBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsBody")
            .field("handle", &self.handle)
            .field("rigid_body", &self.rigid_body)
            .field("shape", &self.shape)
            .field("transform", &self.transform)
            .field(
                "on_collision",
                &self.on_collision.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl PhysicsBody {
    pub fn new(shape: CollisionShape, rigid_body: RigidBody) -> Self {
        Self {
            handle: BodyHandle::INVALID,
            rigid_body,
            shape,
            transform: Transform3D::default(),
            on_collision: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_on_collision<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&PhysicsBody, &ContactPoint) + 'static,
    {
        self.on_collision = Some(Box::new(callback));
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

/// The 3D simulation: owns every body and drives the fixed-step loop.
///
/// Bodies are kept in insertion order. That order fixes the pair visiting
/// order of the sequential impulse solver.
pub struct RigidBodyWorld {
    pub(crate) bodies: Vec<PhysicsBody>,
    pub(crate) next_handle: u64,
    pub(crate) gravity: Vec3,
    pub(crate) fixed_timestep: f32,
    pub(crate) max_substeps: u32,
    pub(crate) accumulator: f32,
    pub(crate) solver: SolverSettings,
    pub(crate) sleep: SleepSettings,
    pub(crate) contacts: Vec<ContactRecord>,
    pub(crate) last_stats: StepStats,
}

impl Default for RigidBodyWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RigidBodyWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidBodyWorld")
            .field("body_count", &self.bodies.len())
            .field("gravity", &self.gravity)
            .field("fixed_timestep", &self.fixed_timestep)
            .field("max_substeps", &self.max_substeps)
            .field("accumulator", &self.accumulator)
            .finish()
    }
}

impl RigidBodyWorld {
    pub fn new() -> Self {
        Self::from_settings(&WorldConfig::default())
    }

    /// Build a world from a validated configuration
    pub fn with_config(config: &WorldConfig) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Self::from_settings(config))
    }

    fn from_settings(config: &WorldConfig) -> Self {
        Self {
            bodies: Vec::new(),
            next_handle: 1,
            gravity: config.gravity,
            fixed_timestep: config.fixed_timestep,
            max_substeps: config.max_substeps,
            accumulator: 0.0,
            solver: config.solver,
            sleep: config.sleep,
            contacts: Vec::new(),
            last_stats: StepStats::default(),
        }
    }

    // ========================================================================
    // BODY MANAGEMENT
    // ========================================================================

    /// Take ownership of `body` and return its new handle
    pub fn add_body(&mut self, mut body: PhysicsBody) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        body.handle = handle;

        log::debug!(
            "Adding {} body {} at {:?}",
            body.shape.kind_name(),
            handle,
            body.transform.position
        );

        self.bodies.push(body);
        handle
    }

    /// Remove a body, keeping the relative order of the rest
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<PhysicsBody> {
        let index = self.index_of(handle)?;
        log::debug!("Removing body {}", handle);
        Some(self.bodies.remove(index))
    }

    pub fn get_body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.iter().find(|body| body.handle == handle)
    }

    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.iter_mut().find(|body| body.handle == handle)
    }

    pub fn body_checked(&self, handle: BodyHandle) -> PhysicsResult<&PhysicsBody> {
        self.get_body(handle)
            .ok_or_physics(|| PhysicsError::BodyNotFound { handle: handle.0 })
    }

    pub fn body_checked_mut(&mut self, handle: BodyHandle) -> PhysicsResult<&mut PhysicsBody> {
        self.get_body_mut(handle)
            .ok_or_physics(|| PhysicsError::BodyNotFound { handle: handle.0 })
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.index_of(handle).is_some()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &PhysicsBody> {
        self.bodies.iter()
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut PhysicsBody> {
        self.bodies.iter_mut()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.bodies.iter().position(|body| body.handle == handle)
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Unchecked: a zero or negative timestep stalls `step`
    pub fn set_fixed_timestep(&mut self, fixed_timestep: f32) {
        self.fixed_timestep = fixed_timestep;
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    pub fn set_max_substeps(&mut self, max_substeps: u32) {
        self.max_substeps = max_substeps;
    }

    pub fn max_substeps(&self) -> u32 {
        self.max_substeps
    }

    pub fn set_solver_settings(&mut self, solver: SolverSettings) {
        self.solver = solver;
    }

    pub fn solver_settings(&self) -> SolverSettings {
        self.solver
    }

    pub fn set_sleep_settings(&mut self, sleep: SleepSettings) {
        self.sleep = sleep;
    }

    pub fn sleep_settings(&self) -> SleepSettings {
        self.sleep
    }

    // ========================================================================
    // READBACK
    // ========================================================================

    /// Unsimulated time carried into the next `step`
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Contacts resolved during the last `step`, in resolution order
    pub fn contacts(&self) -> &[ContactRecord] {
        &self.contacts
    }

    pub fn last_step_stats(&self) -> StepStats {
        self.last_stats
    }
}
