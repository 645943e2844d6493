//! 2D collider data
//!
//! Colliders are gameplay hit volumes: a shape, a tag saying what kind of
//! thing it belongs to, and the owning entity's transform. They have no mass
//! or velocity - responses are up to the hit callbacks.

use super::aabb::{aabb_from_center_half_extents, Aabb2D};
use crate::math::Transform2D;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a registered collider, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(pub u64);

impl ColliderHandle {
    pub const INVALID: ColliderHandle = ColliderHandle(0);
}

impl fmt::Display for ColliderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collider#{}", self.0)
    }
}

/// 2D hit volume shape, centered on the transform position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape2D {
    Aabb { half_extent: Vec2 },
    Circle { radius: f32 },
}

impl Shape2D {
    /// Half size of the axis-aligned box enclosing the shape
    pub fn bounding_half_extent(&self) -> Vec2 {
        match self {
            Shape2D::Aabb { half_extent } => *half_extent,
            Shape2D::Circle { radius } => Vec2::splat(*radius),
        }
    }

    pub fn bounds_at(&self, position: Vec2) -> Aabb2D {
        aabb_from_center_half_extents(position, self.bounding_half_extent())
    }
}

/// What a collider belongs to. Colliders never test against their own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColliderTag {
    /// Excluded from all hit testing
    Invalid = 0,
    Player = 1,
    Enemy = 2,
    Bullet = 3,
    EnemyBullet = 4,
    Pickup = 5,
    Wall = 6,
}

impl ColliderTag {
    pub const COUNT: usize = 7;

    pub const ALL: [ColliderTag; Self::COUNT] = [
        ColliderTag::Invalid,
        ColliderTag::Player,
        ColliderTag::Enemy,
        ColliderTag::Bullet,
        ColliderTag::EnemyBullet,
        ColliderTag::Pickup,
        ColliderTag::Wall,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// What a hit callback sees: its own collider and the one it hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub this: ColliderHandle,
    pub this_tag: ColliderTag,
    pub other: ColliderHandle,
    pub other_tag: ColliderTag,
    pub other_position: Vec2,
}

impl HitEvent {
    pub fn reversed(&self, this_position: Vec2) -> HitEvent {
        HitEvent {
            this: self.other,
            this_tag: self.other_tag,
            other: self.this,
            other_tag: self.this_tag,
            other_position: this_position,
        }
    }
}

/// Returns true to consume the hit, which suppresses the other side's callback
pub type HitCallback = Box<dyn FnMut(&HitEvent) -> bool>;

/// A registered 2D hit volume
///
/// The tag is read-only here: `PhysicsSystem::set_tag` keeps the per-tag
/// lists in step with it.
pub struct Collider {
    pub handle: ColliderHandle,
    pub shape: Shape2D,
    pub(crate) tag: ColliderTag,
    pub transform: Transform2D,
    pub on_hit: Option<HitCallback>,
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("handle", &self.handle)
            .field("shape", &self.shape)
            .field("tag", &self.tag)
            .field("transform", &self.transform)
            .field("on_hit", &self.on_hit.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Collider {
    pub fn new(shape: Shape2D, tag: ColliderTag) -> Self {
        Self {
            handle: ColliderHandle::INVALID,
            shape,
            tag,
            transform: Transform2D::default(),
            on_hit: None,
        }
    }

    pub fn circle(radius: f32, tag: ColliderTag) -> Self {
        Self::new(Shape2D::Circle { radius }, tag)
    }

    pub fn aabb(half_extent: Vec2, tag: ColliderTag) -> Self {
        Self::new(Shape2D::Aabb { half_extent }, tag)
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_on_hit<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&HitEvent) -> bool + 'static,
    {
        self.on_hit = Some(Box::new(callback));
        self
    }

    pub fn tag(&self) -> ColliderTag {
        self.tag
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn bounds(&self) -> Aabb2D {
        self.shape.bounds_at(self.transform.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let circle = Collider::circle(2.0, ColliderTag::Enemy).with_position(Vec2::new(10.0, 0.0));
        let bounds = circle.bounds();
        assert_eq!(bounds.min, Vec2::new(8.0, -2.0));
        assert_eq!(bounds.max, Vec2::new(12.0, 2.0));

        let block = Collider::aabb(Vec2::new(3.0, 1.0), ColliderTag::Wall);
        assert_eq!(block.bounds().max, Vec2::new(3.0, 1.0));
    }

    #[test]
    fn test_tag_indices_match_all() {
        for (i, tag) in ColliderTag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
    }

    #[test]
    fn test_hit_event_reversed() {
        let event = HitEvent {
            this: ColliderHandle(1),
            this_tag: ColliderTag::Bullet,
            other: ColliderHandle(2),
            other_tag: ColliderTag::Enemy,
            other_position: Vec2::new(5.0, 5.0),
        };
        let back = event.reversed(Vec2::ZERO);
        assert_eq!(back.this, ColliderHandle(2));
        assert_eq!(back.other_tag, ColliderTag::Bullet);
        assert_eq!(back.other_position, Vec2::ZERO);
    }
}
