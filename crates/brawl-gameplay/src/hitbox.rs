//! Attack hitboxes and their pool.
//!
//! A hitbox lives for exactly one Attack activation. Characters acquire one
//! from their own pool on entering Attack and release it on exit, so the
//! record is reused across swings instead of reallocated.

use brawl_common::{PlayerId, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Damage volume of an active attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Whether the hitbox is live
    pub active: bool,
    /// Geometry in world space
    pub rect: Rect,
    /// Character that created the hitbox
    pub owner: PlayerId,
    /// Base damage carried by the hitbox
    pub damage: f32,
}

impl Hitbox {
    fn blank() -> Self {
        Self {
            active: false,
            rect: Rect::default(),
            owner: PlayerId::ONE,
            damage: 0.0,
        }
    }

    /// Populates the hitbox and marks it active.
    pub fn init(&mut self, owner: PlayerId, rect: Rect, damage: f32) {
        self.active = true;
        self.rect = rect;
        self.owner = owner;
        self.damage = damage;
    }

    /// Moves the hitbox so its top-left corner sits at `position`.
    pub fn move_to(&mut self, position: Vec2) {
        self.rect.x = position.x;
        self.rect.y = position.y;
    }

    /// Marks the hitbox inactive.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Checks whether the hitbox is live and overlaps `target`.
    #[must_use]
    pub fn overlaps(&self, target: &Rect) -> bool {
        self.active && self.rect.intersects(target)
    }
}

/// Recycler for hitbox records.
#[derive(Debug, Default, Clone)]
pub struct HitboxPool {
    free: Vec<Hitbox>,
    allocated: usize,
}

impl HitboxPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a record from the pool, allocating one if the pool is empty.
    ///
    /// The returned record is inactive until `init` is called.
    pub fn acquire(&mut self) -> Hitbox {
        match self.free.pop() {
            Some(hitbox) => hitbox,
            None => {
                self.allocated += 1;
                Hitbox::blank()
            },
        }
    }

    /// Returns a record to the pool, deactivating it.
    pub fn release(&mut self, mut hitbox: Hitbox) {
        hitbox.deactivate();
        self.free.push(hitbox);
    }

    /// Number of records waiting for reuse.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Total number of records this pool has ever allocated.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}
