//! Physics context - all simulation state in one place
//!
//! Game code owns a `PhysicsContext` and threads it through its frame loop.
//! Fields are public: systems read and write the buffers directly.

use crate::collision2d::{HitEvent, PhysicsSystem, SpatialGrid2D};
use crate::config::WorldConfig;
use crate::error::PhysicsResult;
use crate::physics::RigidBodyWorld;

/// 3D world, 2D hit system and the 2D query grid
#[derive(Debug)]
pub struct PhysicsContext {
    pub world: RigidBodyWorld,
    pub system: PhysicsSystem,
    /// Snapshot of live colliders, refreshed at the end of every frame
    pub grid: SpatialGrid2D,
}

/// What happened during one `PhysicsContext::frame`
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub substeps: u32,
    pub hits: Vec<HitEvent>,
}

impl PhysicsContext {
    pub fn new(config: &WorldConfig) -> PhysicsResult<Self> {
        let world = RigidBodyWorld::with_config(config)?;
        log::info!(
            "Physics context: gravity {:?}, fixed dt {:.4}s, {} max substeps, grid cell {}",
            config.gravity,
            config.fixed_timestep,
            config.max_substeps,
            config.grid.cell_size
        );

        Ok(Self {
            world,
            system: PhysicsSystem::new(),
            grid: SpatialGrid2D::new(config.grid.cell_size),
        })
    }

    /// Step the 3D world, run 2D hit detection, then rebuild the grid from
    /// the colliders that survived.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let substeps = self.world.step(dt);
        let hits = self.system.run();
        self.grid.rebuild(self.system.live_colliders());

        FrameReport { substeps, hits }
    }
}

impl Default for PhysicsContext {
    fn default() -> Self {
        Self {
            world: RigidBodyWorld::new(),
            system: PhysicsSystem::new(),
            grid: SpatialGrid2D::default(),
        }
    }
}
