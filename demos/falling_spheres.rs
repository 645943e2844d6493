//! Falling spheres
//!
//! Drops a few spheres and a tumbling box onto a ground plane and prints
//! their heights until everything settles. Pass a TOML config path as the
//! first argument to override the world settings.

use hearth_physics::{
    physics::shape_world_bounds2d, CollisionShape, PhysicsBody, RigidBody, RigidBodyWorld,
    WorldConfig,
};
use hearth_physics::glam::Vec3;

const SETTLE_SPEED: f32 = 0.1;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_toml_file(&path)?,
        None => WorldConfig::default(),
    };
    println!("Falling spheres demo");
    println!("{}", config.to_toml_string()?);

    let mut world = RigidBodyWorld::with_config(&config)?;

    world.add_body(PhysicsBody::new(
        CollisionShape::plane(Vec3::Y, 0.0),
        RigidBody::new_static(),
    ));

    let mut spheres = Vec::new();
    for i in 0..3 {
        let restitution = 0.2 + 0.3 * i as f32;
        let handle = world.add_body(
            PhysicsBody::new(
                CollisionShape::sphere(0.5),
                RigidBody::new(1.0).with_restitution(restitution),
            )
            .with_position(Vec3::new(i as f32 * 2.0, 5.0 + i as f32, 0.0))
            .with_on_collision(move |other, contact| {
                log::debug!(
                    "sphere {} touched {} (depth {:.3})",
                    i,
                    other.shape.kind_name(),
                    contact.penetration
                );
            }),
        );
        spheres.push(handle);
    }

    let crate_box = world.add_body(
        PhysicsBody::new(
            CollisionShape::cuboid(Vec3::splat(0.5)),
            RigidBody::new(2.0).with_angular_velocity(Vec3::new(0.0, 0.0, 3.0)),
        )
        .with_position(Vec3::new(-3.0, 4.0, 0.0)),
    );

    let frame_dt = 1.0 / 60.0;
    for frame in 0..600 {
        world.step(frame_dt);

        if frame % 30 == 0 {
            let heights: Vec<String> = spheres
                .iter()
                .filter_map(|&h| world.get_body(h))
                .map(|b| format!("{:.3}", b.position().y))
                .collect();
            let stats = world.last_step_stats();
            println!(
                "t={:>5.2}s  spheres y=[{}]  contacts={}  sleeping={}",
                frame as f32 * frame_dt,
                heights.join(", "),
                stats.contacts,
                stats.sleeping_bodies
            );
        }

        // Bodies touching the ground stay awake, so settle on speed instead
        let settled = frame > 60
            && world
                .bodies()
                .filter(|b| !b.rigid_body.is_static())
                .all(|b| {
                    b.rigid_body.speed() < SETTLE_SPEED
                        && b.rigid_body.angular_velocity.length() < SETTLE_SPEED
                });
        if settled {
            println!("Everything settled after {} frames", frame + 1);
            break;
        }
    }

    let body = world.body_checked(crate_box)?;
    if let Some(bounds) = shape_world_bounds2d(&body.shape, &body.transform) {
        println!("Box rests at {:?}, XY bounds {:?}..{:?}", body.position(), bounds.min, bounds.max);
    }
    println!("Last step: {}", world.last_step_stats().to_json()?);

    Ok(())
}
