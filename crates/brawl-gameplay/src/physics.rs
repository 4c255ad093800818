//! Body physics: gravity, integration and arena collision.
//!
//! The arena is a single ground plane with two side walls. There is no
//! friction model beyond the knockback decay applied by the Hit state.

use brawl_common::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::CombatConfig;

/// Direction a character is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward smaller X
    Left,
    /// Facing toward larger X
    Right,
}

impl Facing {
    /// `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing that matches the sign of a horizontal velocity, if it has one.
    #[must_use]
    pub fn from_velocity(vx: f32) -> Option<Self> {
        if vx > 0.0 {
            Some(Self::Right)
        } else if vx < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Position, velocity and extents of a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner of the hurtbox
    pub position: Vec2,
    /// Velocity in units per second
    pub velocity: Vec2,
    /// Hurtbox width
    pub width: f32,
    /// Hurtbox height
    pub height: f32,
    /// Whether the body rested on the ground after the last collision pass
    pub grounded: bool,
}

impl Body {
    /// Creates a body at rest.
    #[must_use]
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            width,
            height,
            grounded: false,
        }
    }

    /// The body's vulnerable volume.
    #[must_use]
    pub fn hurtbox(&self) -> Rect {
        Rect::from_position(self.position, self.width, self.height)
    }

    /// Accelerates the body downward.
    pub fn apply_gravity(&mut self, config: &CombatConfig, dt_ms: f32) {
        self.velocity.y += config.gravity * seconds(dt_ms);
    }

    /// Advances position by velocity.
    pub fn integrate(&mut self, dt_ms: f32) {
        self.position += self.velocity * seconds(dt_ms);
    }

    /// Snaps the body onto the ground plane if it sank below it.
    pub fn resolve_ground(&mut self, config: &CombatConfig) {
        let floor = config.ground_y - self.height;
        if self.position.y >= floor {
            self.position.y = floor;
            if self.velocity.y > 0.0 {
                self.velocity.y = 0.0;
            }
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Keeps the body between the arena walls.
    pub fn resolve_bounds(&mut self, config: &CombatConfig) {
        let max_x = config.arena_width - self.width;
        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = self.velocity.x.max(0.0);
        } else if self.position.x > max_x {
            self.position.x = max_x;
            self.velocity.x = self.velocity.x.min(0.0);
        }
    }

    /// Gravity, integration, then ground and wall collision.
    pub fn simulate(&mut self, config: &CombatConfig, dt_ms: f32) {
        self.apply_gravity(config, dt_ms);
        self.integrate(dt_ms);
        self.resolve_ground(config);
        self.resolve_bounds(config);
    }
}

fn seconds(dt_ms: f32) -> f32 {
    dt_ms / 1000.0
}
