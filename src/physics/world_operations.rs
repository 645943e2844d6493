//! Rigid body world operations
//!
//! The fixed-step pipeline. Every sub-step runs, in order:
//! integrate -> detect and resolve -> update sleep.
//! Each phase is a plain function over the body slice so it can be driven
//! and tested on its own.

use super::collision_data::{ContactPoint, ContactRecord, StepStats};
use super::narrowphase::check_collision3d;
use super::world_data::{PhysicsBody, RigidBodyWorld};
use crate::config::{SleepSettings, SolverSettings};
use crate::constants::TANGENT_EPSILON_SQ;
use crate::math::integrate_rotation;
use glam::Vec3;

// ============================================================================
// STEP
// ============================================================================

impl RigidBodyWorld {
    /// Advance the simulation by `dt` seconds of real time.
    ///
    /// Runs at most `max_substeps` fixed sub-steps and returns how many ran.
    /// Leftover time carries over, unless more than two sub-steps' worth is
    /// left behind, in which case it is dropped so slow frames cannot snowball.
    pub fn step(&mut self, dt: f32) -> u32 {
        let fixed_dt = self.fixed_timestep;
        let mut stats = StepStats::default();

        self.contacts.clear();
        self.accumulator += dt;

        while self.accumulator >= fixed_dt && stats.substeps < self.max_substeps {
            integrate_bodies(&mut self.bodies, self.gravity, fixed_dt);
            detect_and_resolve(&mut self.bodies, &self.solver, &mut self.contacts, &mut stats);
            update_sleep(&mut self.bodies, &self.sleep, fixed_dt);

            self.accumulator -= fixed_dt;
            stats.substeps += 1;
        }

        if self.accumulator > 2.0 * fixed_dt {
            log::warn!(
                "Physics fell behind: dropping {:.3}s of simulation after {} substeps",
                self.accumulator,
                stats.substeps
            );
            stats.discarded_time = self.accumulator;
            self.accumulator = 0.0;
        }

        for body in &self.bodies {
            if body.rigid_body.is_static() {
                continue;
            }
            if body.rigid_body.sleeping {
                stats.sleeping_bodies += 1;
            } else {
                stats.awake_bodies += 1;
            }
        }

        log::trace!("Physics step: {:?}", stats);
        self.last_stats = stats;
        stats.substeps
    }
}

// ============================================================================
// INTEGRATION
// ============================================================================

/// Semi-implicit Euler over every awake dynamic body.
///
/// Gravity is folded into the force accumulator, velocity is updated before
/// position, and accumulators are cleared afterwards.
pub fn integrate_bodies(bodies: &mut [PhysicsBody], gravity: Vec3, dt: f32) {
    for body in bodies.iter_mut() {
        let rb = &mut body.rigid_body;

        if !rb.is_active() {
            rb.clear_forces();
            continue;
        }

        rb.force += gravity * rb.mass * rb.gravity_scale;

        rb.velocity += rb.force * rb.inv_mass * dt;
        rb.velocity *= 1.0 - rb.linear_damping;
        body.transform.position += rb.velocity * dt;

        rb.angular_velocity += rb.torque * rb.inv_mass * dt;
        rb.angular_velocity *= 1.0 - rb.angular_damping;
        body.transform.rotation =
            integrate_rotation(body.transform.rotation, rb.angular_velocity, dt);

        rb.clear_forces();
    }
}

// ============================================================================
// COLLISION
// ============================================================================

/// All-pairs narrowphase and sequential impulse resolution.
///
/// Pairs are visited as (i, j) with i < j in storage order. Resolution of one
/// pair feeds the velocities seen by the next, so this order is part of the
/// result. Static/static and sleeping/sleeping pairs are skipped; a contact
/// wakes both bodies and restarts their sleep timers.
pub fn detect_and_resolve(
    bodies: &mut [PhysicsBody],
    solver: &SolverSettings,
    contacts: &mut Vec<ContactRecord>,
    stats: &mut StepStats,
) {
    let count = bodies.len();

    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = bodies.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let (rb_a, rb_b) = (&a.rigid_body, &b.rigid_body);
            if (rb_a.is_static() && rb_b.is_static()) || (rb_a.sleeping && rb_b.sleeping) {
                continue;
            }

            stats.pairs_tested += 1;

            let contact = match check_collision3d(&a.shape, &a.transform, &b.shape, &b.transform) {
                Some(contact) => contact,
                None => continue,
            };

            a.rigid_body.wake();
            b.rigid_body.wake();

            resolve_contact(a, b, &contact, solver);

            stats.contacts += 1;
            contacts.push(ContactRecord::new(a.handle.raw(), b.handle.raw(), &contact));

            if let Some(callback) = a.on_collision.as_mut() {
                callback(b, &contact);
            }
            if let Some(callback) = b.on_collision.as_mut() {
                callback(a, &contact.flipped());
            }
        }
    }
}

/// Resolve one contact between `a` and `b` (normal points a -> b).
///
/// 1. Positional correction: push apart along the normal by the penetration
///    beyond `slop`, scaled by `correction_percent`, split by inverse mass.
/// 2. Normal impulse with restitution `min(e_a, e_b)`, skipped when the
///    bodies already separate.
/// 3. Coulomb friction along the tangential relative velocity, capped at
///    `mu * j` with `mu` the mean of both frictions.
pub fn resolve_contact(
    a: &mut PhysicsBody,
    b: &mut PhysicsBody,
    contact: &ContactPoint,
    solver: &SolverSettings,
) {
    let inv_mass_a = a.rigid_body.inv_mass;
    let inv_mass_b = b.rigid_body.inv_mass;
    let inv_mass_sum = inv_mass_a + inv_mass_b;

    if inv_mass_sum <= 0.0 {
        return;
    }

    let normal = contact.normal;

    // Positional correction
    let depth = (contact.penetration - solver.slop).max(0.0);
    let correction = normal * (depth / inv_mass_sum * solver.correction_percent);
    a.transform.position -= correction * inv_mass_a;
    b.transform.position += correction * inv_mass_b;

    // Normal impulse
    let relative_velocity = b.rigid_body.velocity - a.rigid_body.velocity;
    let velocity_along_normal = relative_velocity.dot(normal);
    if velocity_along_normal > 0.0 {
        return;
    }

    let restitution = a.rigid_body.restitution.min(b.rigid_body.restitution);
    let j = -(1.0 + restitution) * velocity_along_normal / inv_mass_sum;
    let impulse = normal * j;
    a.rigid_body.velocity -= impulse * inv_mass_a;
    b.rigid_body.velocity += impulse * inv_mass_b;

    // Friction
    let relative_velocity = b.rigid_body.velocity - a.rigid_body.velocity;
    let tangential = relative_velocity - normal * relative_velocity.dot(normal);
    if tangential.length_squared() <= TANGENT_EPSILON_SQ {
        return;
    }
    let tangent = tangential.normalize();

    let mu = (a.rigid_body.friction + b.rigid_body.friction) * 0.5;
    let max_friction = j * mu;
    let jt = (-relative_velocity.dot(tangent) / inv_mass_sum).clamp(-max_friction, max_friction);

    let friction_impulse = tangent * jt;
    a.rigid_body.velocity -= friction_impulse * inv_mass_a;
    b.rigid_body.velocity += friction_impulse * inv_mass_b;
}

// ============================================================================
// SLEEP
// ============================================================================

/// Put bodies to sleep after they stay slow long enough; wake fast ones.
pub fn update_sleep(bodies: &mut [PhysicsBody], settings: &SleepSettings, dt: f32) {
    let threshold_sq = settings.velocity_threshold * settings.velocity_threshold;

    for body in bodies.iter_mut() {
        let rb = &mut body.rigid_body;
        if rb.is_static() {
            continue;
        }

        let motion = rb.velocity.length_squared() + rb.angular_velocity.length_squared();
        if motion < threshold_sq {
            rb.sleep_timer += dt;
            if rb.sleep_timer >= settings.time_threshold {
                if !rb.sleeping {
                    log::trace!("Body {} fell asleep", body.handle);
                }
                rb.sleeping = true;
                rb.velocity = Vec3::ZERO;
                rb.angular_velocity = Vec3::ZERO;
            }
        } else {
            rb.sleep_timer = 0.0;
            rb.sleeping = false;
        }
    }
}
