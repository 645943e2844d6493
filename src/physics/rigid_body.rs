//! Rigid body state and mutators.
//!
//! `inv_mass == 0` is what keeps static bodies immovable: every velocity
//! update in the solver is scaled by it.

use crate::constants::{
    DEFAULT_ANGULAR_DAMPING, DEFAULT_FRICTION, DEFAULT_LINEAR_DAMPING, DEFAULT_RESTITUTION,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Whether a body takes part in dynamics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Dynamic,
    Static,
}

/// Per-body physical state.
///
/// Body type, mass and sleep state are only changed through methods so that
/// `inv_mass` stays zero for every static body.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub(crate) body_type: BodyType,
    pub(crate) mass: f32,
    /// 1/mass, or 0 for static bodies and non-positive masses
    pub(crate) inv_mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    pub sleep_timer: f32,
    pub(crate) sleeping: bool,
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RigidBody {
    /// Dynamic body with the given mass
    pub fn new(mass: f32) -> Self {
        let mut body = Self {
            body_type: BodyType::Dynamic,
            mass: 0.0,
            inv_mass: 0.0,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            gravity_scale: 1.0,
            sleep_timer: 0.0,
            sleeping: false,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        };
        body.set_mass(mass);
        body
    }

    /// Immovable body
    pub fn new_static() -> Self {
        let mut body = Self::new(0.0);
        body.set_static();
        body
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear.clamp(0.0, 1.0);
        self.angular_damping = angular.clamp(0.0, 1.0);
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Dynamic and awake - the bodies the integrator moves
    pub fn is_active(&self) -> bool {
        !self.is_static() && !self.sleeping
    }

    /// Set mass; static bodies and non-positive masses get zero inverse mass
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = if self.is_static() || mass <= 0.0 {
            0.0
        } else {
            1.0 / mass
        };
    }

    /// Make the body immovable and drop any residual motion
    pub fn set_static(&mut self) {
        self.body_type = BodyType::Static;
        self.inv_mass = 0.0;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.sleep_timer = 0.0;
        self.sleeping = false;
        self.clear_forces();
    }

    /// Accumulate a force for the next integration step
    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_static() {
            return;
        }
        self.force += force;
        self.wake();
    }

    /// Accumulate a torque for the next integration step
    pub fn apply_torque(&mut self, torque: Vec3) {
        if self.is_static() {
            return;
        }
        self.torque += torque;
        self.wake();
    }

    /// Instant velocity change of `impulse * inv_mass`
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.velocity += impulse * self.inv_mass;
        self.wake();
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    pub fn wake(&mut self) {
        if self.sleeping {
            log::trace!("Waking rigid body");
        }
        self.sleep_timer = 0.0;
        self.sleeping = false;
    }

    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn kinetic_energy(&self) -> f32 {
        if self.inv_mass == 0.0 {
            return 0.0;
        }
        0.5 * self.mass * self.velocity.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_creation() {
        let body = RigidBody::new(2.0);
        assert_eq!(body.body_type, BodyType::Dynamic);
        assert_eq!(body.inv_mass, 0.5);
        assert_eq!(body.restitution, DEFAULT_RESTITUTION);
        assert!(!body.is_sleeping());
        assert!(body.is_active());
    }

    #[test]
    fn test_non_positive_mass_has_zero_inverse() {
        assert_eq!(RigidBody::new(0.0).inv_mass, 0.0);
        assert_eq!(RigidBody::new(-3.0).inv_mass, 0.0);
    }

    #[test]
    fn test_set_mass_then_static() {
        for mass in [0.5_f32, 1.0, 10.0, 1000.0] {
            let mut body = RigidBody::new(1.0);
            body.set_mass(mass);
            assert!((body.inv_mass - 1.0 / mass).abs() < 1e-6);
            body.set_static();
            assert_eq!(body.inv_mass, 0.0);
        }
    }

    #[test]
    fn test_set_mass_on_static_keeps_zero_inverse() {
        let mut body = RigidBody::new_static();
        body.set_mass(5.0);
        assert_eq!(body.inv_mass, 0.0);
        assert_eq!(body.mass, 5.0);
    }

    #[test]
    fn test_accessors_follow_set_static() {
        let mut body = RigidBody::new(4.0);
        assert_eq!(body.body_type(), BodyType::Dynamic);
        assert_eq!(body.mass(), 4.0);
        assert_eq!(body.inv_mass(), 0.25);

        body.set_static();
        assert_eq!(body.body_type(), BodyType::Static);
        assert_eq!(body.inv_mass(), 0.0);

        body.set_mass(8.0);
        assert_eq!(body.mass(), 8.0);
        assert_eq!(body.inv_mass(), 0.0);
        assert!(body.is_static());
    }

    #[test]
    fn test_set_static_zeroes_motion() {
        let mut body = RigidBody::new(1.0)
            .with_velocity(Vec3::new(1.0, 2.0, 3.0))
            .with_angular_velocity(Vec3::X);
        body.set_static();
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_static_ignores_force_torque_impulse() {
        let mut body = RigidBody::new_static();
        body.apply_force(Vec3::new(0.0, 100.0, 0.0));
        body.apply_torque(Vec3::X);
        body.apply_impulse(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
        assert_eq!(body.accumulated_torque(), Vec3::ZERO);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_apply_impulse() {
        let mut body = RigidBody::new(4.0);
        body.apply_impulse(Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(body.velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_force_accumulates_and_clears() {
        let mut body = RigidBody::new(1.0);
        body.apply_force(Vec3::X);
        body.apply_force(Vec3::Y);
        body.apply_torque(Vec3::Z);
        assert_eq!(body.accumulated_force(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(body.accumulated_torque(), Vec3::Z);

        body.clear_forces();
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
        assert_eq!(body.accumulated_torque(), Vec3::ZERO);
    }

    #[test]
    fn test_mutators_wake() {
        let mut body = RigidBody::new(1.0);

        body.sleeping = true;
        body.sleep_timer = 3.0;
        body.apply_force(Vec3::X);
        assert!(!body.sleeping);
        assert_eq!(body.sleep_timer, 0.0);

        body.sleeping = true;
        body.apply_torque(Vec3::X);
        assert!(!body.sleeping);

        body.sleeping = true;
        body.apply_impulse(Vec3::X);
        assert!(!body.sleeping);
    }

    #[test]
    fn test_builder_clamps() {
        let body = RigidBody::new(1.0)
            .with_restitution(1.5)
            .with_friction(-0.2)
            .with_damping(2.0, -1.0);
        assert_eq!(body.restitution, 1.0);
        assert_eq!(body.friction, 0.0);
        assert_eq!(body.linear_damping, 1.0);
        assert_eq!(body.angular_damping, 0.0);
    }

    #[test]
    fn test_kinetic_energy() {
        let body = RigidBody::new(2.0).with_velocity(Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(body.speed(), 5.0);
        assert_eq!(body.kinetic_energy(), 25.0);
        assert_eq!(RigidBody::new_static().kinetic_energy(), 0.0);
    }
}
