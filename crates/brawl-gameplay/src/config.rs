//! Combat tuning.
//!
//! All timers are in milliseconds, distances in world units and speeds in
//! world units per second.

use brawl_common::{ConfigError, Vec2};
use serde::{Deserialize, Serialize};

/// Tunable constants shared by both combatants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === Arena ===
    /// Arena width; lateral bounds are `0..arena_width`
    pub arena_width: f32,
    /// Y coordinate of the ground plane
    pub ground_y: f32,
    /// Distance from each wall at which the combatants spawn
    pub spawn_margin: f32,

    // === Movement ===
    /// Gravity acceleration (positive = down)
    pub gravity: f32,
    /// Horizontal move speed
    pub move_speed: f32,
    /// Jump initial velocity (applied upward)
    pub jump_velocity: f32,
    /// Per-frame multiplier applied to horizontal velocity while stunned
    pub knockback_decay: f32,

    // === Body ===
    /// Hurtbox width
    pub character_width: f32,
    /// Hurtbox height
    pub character_height: f32,
    /// Starting and maximum health
    pub max_health: f32,

    // === Attack ===
    /// Damage of an attack before mode multipliers
    pub base_attack_damage: f32,
    /// Knockback of an attack before mode multipliers; X points away from the attacker
    pub base_knockback: Vec2,
    /// Cooldown before mode speed scaling
    pub base_attack_cooldown_ms: f32,
    /// How long the Attack state lasts
    pub attack_duration_ms: f32,
    /// Attack hitbox width
    pub hitbox_width: f32,
    /// Attack hitbox height
    pub hitbox_height: f32,
    /// Attack hitbox offset from the top of the hurtbox
    pub hitbox_offset_y: f32,
    /// Stun used when entering Hit without a recorded hit
    pub default_hit_stun_ms: f32,

    // === Timing ===
    /// Largest frame delta the session will simulate in one step
    pub max_frame_ms: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            // Arena
            arena_width: 1000.0,
            ground_y: 500.0,
            spawn_margin: 200.0,

            // Movement
            gravity: 1800.0,
            move_speed: 300.0,
            jump_velocity: 700.0,
            knockback_decay: 0.9,

            // Body
            character_width: 50.0,
            character_height: 100.0,
            max_health: 100.0,

            // Attack
            base_attack_damage: 10.0,
            base_knockback: Vec2::new(300.0, -150.0),
            base_attack_cooldown_ms: 500.0,
            attack_duration_ms: 300.0,
            hitbox_width: 60.0,
            hitbox_height: 30.0,
            hitbox_offset_y: 20.0,
            default_hit_stun_ms: 300.0,

            // Timing
            max_frame_ms: 50.0,
        }
    }
}

impl CombatConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that every tunable is usable by the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("arena_width", self.arena_width),
            ("ground_y", self.ground_y),
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_velocity", self.jump_velocity),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("max_health", self.max_health),
            ("base_attack_damage", self.base_attack_damage),
            ("base_attack_cooldown_ms", self.base_attack_cooldown_ms),
            ("attack_duration_ms", self.attack_duration_ms),
            ("hitbox_width", self.hitbox_width),
            ("hitbox_height", self.hitbox_height),
            ("default_hit_stun_ms", self.default_hit_stun_ms),
            ("max_frame_ms", self.max_frame_ms),
        ];
        for (field, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(self.knockback_decay > 0.0 && self.knockback_decay <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "knockback_decay",
                value: self.knockback_decay,
                min: 0.0,
                max: 1.0,
            });
        }

        if !(self.hitbox_offset_y >= 0.0 && self.hitbox_offset_y <= self.character_height) {
            return Err(ConfigError::OutOfRange {
                field: "hitbox_offset_y",
                value: self.hitbox_offset_y,
                min: 0.0,
                max: self.character_height,
            });
        }

        let needed = 2.0 * (self.spawn_margin + self.character_width);
        if !(self.spawn_margin >= 0.0 && self.arena_width >= needed) {
            return Err(ConfigError::ArenaTooNarrow {
                arena_width: self.arena_width,
                character_width: self.character_width,
                spawn_margin: self.spawn_margin,
            });
        }

        Ok(())
    }

    /// Y coordinate of a character's top edge when standing on the ground.
    #[must_use]
    pub fn standing_y(&self) -> f32 {
        self.ground_y - self.character_height
    }
}
