//! 2D arena
//!
//! A player, a few enemies and walls registered with a PhysicsContext.
//! Bullets fly right each frame; hits remove both bullet and enemy. The grid
//! and raycast queries run against the state left after each frame.

use hearth_physics::glam::Vec2;
use hearth_physics::{Collider, ColliderTag, PhysicsContext, WorldConfig};
use std::cell::Cell;
use std::rc::Rc;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("2D arena demo");

    let mut config = WorldConfig::default();
    config.grid.cell_size = 32.0;
    let mut context = PhysicsContext::new(&config)?;

    let player = context.system.register_collider(
        Collider::aabb(Vec2::splat(8.0), ColliderTag::Player).with_position(Vec2::new(0.0, 0.0)),
    );

    let kills = Rc::new(Cell::new(0u32));
    for i in 0..4 {
        let kills = Rc::clone(&kills);
        context.system.register_collider(
            Collider::circle(6.0, ColliderTag::Enemy)
                .with_position(Vec2::new(60.0 + 40.0 * i as f32, 0.0))
                .with_on_hit(move |event| {
                    if event.other_tag == ColliderTag::Bullet {
                        kills.set(kills.get() + 1);
                    }
                    false
                }),
        );
    }

    context.system.register_collider(
        Collider::aabb(Vec2::new(4.0, 100.0), ColliderTag::Wall).with_position(Vec2::new(260.0, 0.0)),
    );

    let mut bullets = Vec::new();
    for row in [-4.0, 0.0, 4.0] {
        let bullet = context.system.register_collider(
            Collider::circle(2.0, ColliderTag::Bullet).with_position(Vec2::new(12.0, row)),
        );
        bullets.push(bullet);
    }

    for frame in 0..60 {
        for &bullet in &bullets {
            if let Some(position) = context.system.collider(bullet).map(|c| c.position()) {
                context.system.move_collider(bullet, position + Vec2::new(5.0, 0.0))?;
            }
        }

        let report = context.frame(1.0 / 60.0);

        for hit in &report.hits {
            println!(
                "frame {:>2}: {} ({:?}) hit {} ({:?}) at {:?}",
                frame, hit.this, hit.this_tag, hit.other, hit.other_tag, hit.other_position
            );
            if hit.this_tag == ColliderTag::Bullet {
                context.system.remove_collider(hit.this);
                if hit.other_tag == ColliderTag::Enemy {
                    context.system.remove_collider(hit.other);
                }
            }
        }
        bullets.retain(|&b| context.system.collider(b).is_some() && !context.system.is_pending_removal(b));

        if bullets.is_empty() {
            // Flush the last removals
            context.frame(0.0);
            break;
        }
    }

    println!("Enemy hit callbacks: {}", kills.get());
    println!(
        "Grid holds {} colliders in {} cells",
        context.grid.len(),
        context.grid.cell_count()
    );

    let near_player = context.grid.query_radius(Vec2::ZERO, 100.0);
    println!("Within 100 of the origin: {:?}", near_player);

    match context.system.raycast(Vec2::ZERO, Vec2::X, 500.0, None) {
        Some((handle, hit)) => println!("Ray from player hits {} at distance {:.1}", handle, hit.distance),
        None => println!("Ray from player hits nothing"),
    }
    if let Some((handle, _)) = context.grid.raycast(Vec2::ZERO, -Vec2::X, 500.0) {
        println!("Behind the player: {}", handle);
    }

    let player_collider = context.system.collider_checked(player)?;
    println!("Player overlaps: {:?}", context.grid.query_overlapping(player_collider));

    Ok(())
}
