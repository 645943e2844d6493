//! Tag-based 2D hit detection
//!
//! Colliders are grouped by tag. Each `run` tests only colliders flagged with
//! `mark_moved`, and only against other tags, so bullets never test bullets
//! and idle walls cost nothing.

use super::collider::{Collider, ColliderHandle, ColliderTag, HitEvent};
use super::hit_test::{check_hit_shapes, raycast_shape, RayHit2D};
use crate::error::{OptionExt, PhysicsError, PhysicsResult};
use glam::Vec2;
use rustc_hash::FxHashMap;
use std::fmt;

pub struct PhysicsSystem {
    colliders: FxHashMap<ColliderHandle, Collider>,
    /// Handles per tag in registration order, indexed by `ColliderTag::index`
    tag_lists: [Vec<ColliderHandle>; ColliderTag::COUNT],
    moved: Vec<ColliderHandle>,
    pending_removal: Vec<ColliderHandle>,
    next_handle: u64,
}

impl fmt::Debug for PhysicsSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsSystem")
            .field("collider_count", &self.colliders.len())
            .field("moved", &self.moved)
            .field("pending_removal", &self.pending_removal)
            .finish()
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSystem {
    pub fn new() -> Self {
        Self {
            colliders: FxHashMap::default(),
            tag_lists: Default::default(),
            moved: Vec::new(),
            pending_removal: Vec::new(),
            next_handle: 1,
        }
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    pub fn register_collider(&mut self, mut collider: Collider) -> ColliderHandle {
        let handle = ColliderHandle(self.next_handle);
        self.next_handle += 1;
        collider.handle = handle;

        log::debug!(
            "Registering {:?} collider {} at {:?}",
            collider.tag,
            handle,
            collider.position()
        );

        self.tag_lists[collider.tag.index()].push(handle);
        self.colliders.insert(handle, collider);
        handle
    }

    /// Schedule removal at the end of the next `run`. Returns false for
    /// unknown handles.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        if !self.colliders.contains_key(&handle) {
            return false;
        }
        if !self.pending_removal.contains(&handle) {
            self.pending_removal.push(handle);
        }
        true
    }

    /// Queue a collider for testing in the next `run`. Movement is never
    /// detected automatically.
    pub fn mark_moved(&mut self, handle: ColliderHandle) -> bool {
        if !self.colliders.contains_key(&handle) {
            return false;
        }
        if !self.moved.contains(&handle) {
            self.moved.push(handle);
        }
        true
    }

    /// Set a collider's position and mark it moved
    pub fn move_collider(&mut self, handle: ColliderHandle, position: Vec2) -> PhysicsResult<()> {
        self.collider_checked_mut(handle)?.transform.position = position;
        self.mark_moved(handle);
        Ok(())
    }

    /// Move a collider to another tag list
    pub fn set_tag(&mut self, handle: ColliderHandle, tag: ColliderTag) -> PhysicsResult<()> {
        let collider = self
            .colliders
            .get_mut(&handle)
            .ok_or_physics(|| PhysicsError::ColliderNotFound { handle: handle.0 })?;

        let old = collider.tag;
        if old == tag {
            return Ok(());
        }
        collider.tag = tag;
        self.tag_lists[old.index()].retain(|&h| h != handle);
        self.tag_lists[tag.index()].push(handle);
        Ok(())
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(&handle)
    }

    /// Shape, transform and callback are editable here; retag with `set_tag`.
    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(&handle)
    }

    pub fn collider_checked(&self, handle: ColliderHandle) -> PhysicsResult<&Collider> {
        self.collider(handle)
            .ok_or_physics(|| PhysicsError::ColliderNotFound { handle: handle.0 })
    }

    pub fn collider_checked_mut(&mut self, handle: ColliderHandle) -> PhysicsResult<&mut Collider> {
        self.collider_mut(handle)
            .ok_or_physics(|| PhysicsError::ColliderNotFound { handle: handle.0 })
    }

    /// All registered colliders, grouped by tag in registration order
    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.tag_lists
            .iter()
            .flatten()
            .filter_map(move |handle| self.colliders.get(handle))
    }

    /// Colliders not scheduled for removal
    pub fn live_colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders()
            .filter(move |collider| !self.pending_removal.contains(&collider.handle))
    }

    pub fn colliders_with_tag(&self, tag: ColliderTag) -> impl Iterator<Item = &Collider> {
        self.tag_lists[tag.index()]
            .iter()
            .filter_map(move |handle| self.colliders.get(handle))
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    pub fn is_pending_removal(&self, handle: ColliderHandle) -> bool {
        self.pending_removal.contains(&handle)
    }

    // ========================================================================
    // HIT DETECTION
    // ========================================================================

    /// Test every moved collider against the other tags, fire callbacks, then
    /// apply deferred removals.
    ///
    /// The mover's callback runs first; if it returns true the hit is consumed
    /// and the target's callback is skipped. Returns every detected hit from
    /// the mover's point of view.
    pub fn run(&mut self) -> Vec<HitEvent> {
        let moved = std::mem::take(&mut self.moved);
        let mut hits = Vec::new();

        for handle in moved {
            if self.pending_removal.contains(&handle) {
                continue;
            }
            let Some(mover) = self.colliders.get(&handle) else {
                continue;
            };
            if mover.tag == ColliderTag::Invalid {
                continue;
            }
            let (mover_tag, mover_shape, mover_position) = (mover.tag, mover.shape, mover.position());

            for tag in ColliderTag::ALL {
                if tag == mover_tag || tag == ColliderTag::Invalid {
                    continue;
                }

                for &target in &self.tag_lists[tag.index()] {
                    if self.pending_removal.contains(&target) {
                        continue;
                    }
                    let Some(other) = self.colliders.get(&target) else {
                        continue;
                    };
                    if !check_hit_shapes(&mover_shape, mover_position, &other.shape, other.position()) {
                        continue;
                    }

                    let event = HitEvent {
                        this: handle,
                        this_tag: mover_tag,
                        other: target,
                        other_tag: other.tag,
                        other_position: other.position(),
                    };
                    log::trace!("Hit: {} ({:?}) -> {} ({:?})", handle, mover_tag, target, other.tag);

                    let consumed = fire_hit(&mut self.colliders, handle, &event);
                    if !consumed {
                        fire_hit(&mut self.colliders, target, &event.reversed(mover_position));
                    }
                    hits.push(event);
                }
            }
        }

        self.flush_removals();
        hits
    }

    fn flush_removals(&mut self) {
        if self.pending_removal.is_empty() {
            return;
        }

        for handle in self.pending_removal.drain(..) {
            if let Some(collider) = self.colliders.remove(&handle) {
                self.tag_lists[collider.tag.index()].retain(|&h| h != handle);
                log::debug!("Removed collider {}", handle);
            }
        }
        let colliders = &self.colliders;
        self.moved.retain(|handle| colliders.contains_key(handle));
    }

    // ========================================================================
    // RAYCAST
    // ========================================================================

    /// Nearest live collider along the ray, optionally restricted to one tag.
    /// Invalid-tagged colliders are never hit.
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        tag_filter: Option<ColliderTag>,
    ) -> Option<(ColliderHandle, RayHit2D)> {
        let mut best: Option<(ColliderHandle, RayHit2D)> = None;

        for collider in self.live_colliders() {
            if collider.tag == ColliderTag::Invalid {
                continue;
            }
            if tag_filter.is_some_and(|tag| tag != collider.tag) {
                continue;
            }
            let Some(hit) =
                raycast_shape(&collider.shape, collider.position(), origin, direction, max_distance)
            else {
                continue;
            };
            if best.map_or(true, |(_, current)| hit.distance < current.distance) {
                best = Some((collider.handle, hit));
            }
        }

        best
    }
}

/// Invoke a collider's hit callback, if any. Returns whether it consumed the hit.
fn fire_hit(
    colliders: &mut FxHashMap<ColliderHandle, Collider>,
    handle: ColliderHandle,
    event: &HitEvent,
) -> bool {
    colliders
        .get_mut(&handle)
        .and_then(|collider| collider.on_hit.as_mut())
        .map_or(false, |callback| callback(event))
}
