//! Uniform 2D spatial grid
//!
//! Buckets collider snapshots by cell so range queries only look at nearby
//! colliders. A collider lands in every cell its bounding box touches. The
//! grid holds copies, not references, and is meant to be cleared and refilled
//! once per frame.

use super::aabb::{aabb_from_segment, aabb_intersects, create_aabb, Aabb2D};
use super::collider::{Collider, ColliderHandle, ColliderTag, Shape2D};
use super::hit_test::{check_hit_shapes, raycast_shape, RayHit2D};
use crate::math::safe_normalize2;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// Snapshot of a collider at insertion time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub handle: ColliderHandle,
    pub tag: ColliderTag,
    pub position: Vec2,
    pub shape: Shape2D,
}

impl GridEntry {
    pub fn from_collider(collider: &Collider) -> Self {
        Self {
            handle: collider.handle,
            tag: collider.tag,
            position: collider.position(),
            shape: collider.shape,
        }
    }

    pub fn bounds(&self) -> Aabb2D {
        self.shape.bounds_at(self.position)
    }
}

#[derive(Debug, Clone)]
pub struct SpatialGrid2D {
    cell_size: f32,
    inv_cell_size: f32,
    cells: FxHashMap<(i32, i32), Vec<GridEntry>>,
    entry_count: usize,
}

impl SpatialGrid2D {
    /// `cell_size` must be positive; `WorldConfig::validate` enforces this for
    /// grids built from configuration.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: FxHashMap::default(),
            entry_count: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell coordinates containing `position` (floor division, so negative
    /// coordinates map correctly)
    pub fn cell_key(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x * self.inv_cell_size).floor() as i32,
            (position.y * self.inv_cell_size).floor() as i32,
        )
    }

    // ========================================================================
    // INSERTION
    // ========================================================================

    pub fn insert(&mut self, collider: &Collider) {
        self.insert_entry(GridEntry::from_collider(collider));
    }

    pub fn insert_entry(&mut self, entry: GridEntry) {
        let bounds = entry.bounds();
        let (min_x, min_y) = self.cell_key(bounds.min);
        let (max_x, max_y) = self.cell_key(bounds.max);

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                self.cells.entry((x, y)).or_default().push(entry);
            }
        }
        self.entry_count += 1;
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entry_count = 0;
    }

    /// Clear, then insert every collider from `colliders`
    pub fn rebuild<'a, I>(&mut self, colliders: I)
    where
        I: IntoIterator<Item = &'a Collider>,
    {
        self.clear();
        for collider in colliders {
            self.insert(collider);
        }
        log::trace!(
            "Spatial grid rebuilt: {} colliders in {} cells",
            self.entry_count,
            self.cells.len()
        );
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Every entry in a cell overlapping `[min, max]`, each reported once
    pub fn query_entries(&self, min: Vec2, max: Vec2) -> Vec<GridEntry> {
        let (min_x, min_y) = self.cell_key(min);
        let (max_x, max_y) = self.cell_key(max);
        let mut results: Vec<GridEntry> = Vec::new();

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                let Some(entries) = self.cells.get(&(x, y)) else {
                    continue;
                };
                for entry in entries {
                    if !results.iter().any(|seen| seen.handle == entry.handle) {
                        results.push(*entry);
                    }
                }
            }
        }

        results
    }

    /// Handles of colliders whose bounds overlap `[min, max]`
    pub fn query(&self, min: Vec2, max: Vec2) -> Vec<ColliderHandle> {
        let area = create_aabb(min, max);
        self.query_entries(min, max)
            .into_iter()
            .filter(|entry| aabb_intersects(&entry.bounds(), &area))
            .map(|entry| entry.handle)
            .collect()
    }

    /// Candidates whose position lies within `radius` of `center`
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<ColliderHandle> {
        let radius_sq = radius * radius;
        let reach = Vec2::splat(radius);

        self.query_entries(center - reach, center + reach)
            .into_iter()
            .filter(|entry| entry.position.distance_squared(center) <= radius_sq)
            .map(|entry| entry.handle)
            .collect()
    }

    /// Colliders in the grid that actually hit `collider`, excluding itself
    pub fn query_overlapping(&self, collider: &Collider) -> Vec<ColliderHandle> {
        let bounds = collider.bounds();
        self.query_entries(bounds.min, bounds.max)
            .into_iter()
            .filter(|entry| entry.handle != collider.handle)
            .filter(|entry| {
                check_hit_shapes(&collider.shape, collider.position(), &entry.shape, entry.position)
            })
            .map(|entry| entry.handle)
            .collect()
    }

    /// Nearest collider hit by the ray within `max_distance`
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
    ) -> Option<(ColliderHandle, RayHit2D)> {
        let direction = safe_normalize2(direction);
        if direction == Vec2::ZERO || !max_distance.is_finite() {
            return None;
        }

        let segment = aabb_from_segment(origin, direction, max_distance);
        self.query_entries(segment.min, segment.max)
            .into_iter()
            .filter_map(|entry| {
                raycast_shape(&entry.shape, entry.position, origin, direction, max_distance)
                    .map(|hit| (entry.handle, hit))
            })
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
    }

    /// Bounds of the cell at `key`
    pub fn cell_bounds(&self, key: (i32, i32)) -> Aabb2D {
        let min = Vec2::new(key.0 as f32, key.1 as f32) * self.cell_size;
        create_aabb(min, min + Vec2::splat(self.cell_size))
    }

    /// Number of inserted colliders (not cell entries)
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl Default for SpatialGrid2D {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_GRID_CELL_SIZE)
    }
}
