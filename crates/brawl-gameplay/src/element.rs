//! Elemental combat modes.
//!
//! Each mode is a fixed set of combat-math constants plus the presentation
//! metadata a renderer needs. Exactly two modes exist and a character toggles
//! between them.

use brawl_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::CombatConfig;
use crate::physics::Facing;

/// Outcome of a landed attack, before the defender's mitigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    /// Raw damage dealt by the attacker
    pub damage: f32,
    /// Velocity imparted on the defender
    pub knockback: Vec2,
    /// Stun duration in milliseconds
    pub hit_stun: f32,
}

/// Particle effect kind associated with a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Rising sparks.
    Ember,
    /// Falling drops.
    Droplet,
}

/// RGB color.
pub type Rgb = [u8; 3];

/// Elemental combat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElementalMode {
    /// High damage, fast attacks, weak defense.
    #[default]
    Fire,
    /// Low damage, slow attacks, strong defense.
    Water,
}

impl ElementalMode {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Water => "Water",
        }
    }

    /// Multiplier on outgoing damage.
    #[must_use]
    pub const fn damage_multiplier(self) -> f32 {
        match self {
            Self::Fire => 1.2,
            Self::Water => 0.9,
        }
    }

    /// Multiplier on attack rate; the cooldown is divided by it.
    #[must_use]
    pub const fn attack_speed_multiplier(self) -> f32 {
        match self {
            Self::Fire => 1.25,
            Self::Water => 0.8,
        }
    }

    /// Fraction of incoming damage actually taken.
    #[must_use]
    pub const fn defense_factor(self) -> f32 {
        match self {
            Self::Fire => 0.9,
            Self::Water => 0.7,
        }
    }

    /// Multiplier on outgoing knockback.
    #[must_use]
    pub const fn knockback_multiplier(self) -> f32 {
        match self {
            Self::Fire => 1.0,
            Self::Water => 0.8,
        }
    }

    /// Stun inflicted on the defender, in milliseconds.
    #[must_use]
    pub const fn hit_stun_ms(self) -> f32 {
        match self {
            Self::Fire => 250.0,
            Self::Water => 350.0,
        }
    }

    /// Primary body color.
    #[must_use]
    pub const fn primary_color(self) -> Rgb {
        match self {
            Self::Fire => [0xff, 0x45, 0x00],
            Self::Water => [0x1e, 0x90, 0xff],
        }
    }

    /// Accent color for trails and hit flashes.
    #[must_use]
    pub const fn secondary_color(self) -> Rgb {
        match self {
            Self::Fire => [0xff, 0xd7, 0x00],
            Self::Water => [0xe0, 0xff, 0xff],
        }
    }

    /// Particle kind spawned on hits.
    #[must_use]
    pub const fn particle(self) -> ParticleKind {
        match self {
            Self::Fire => ParticleKind::Ember,
            Self::Water => ParticleKind::Droplet,
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Fire => Self::Water,
            Self::Water => Self::Fire,
        }
    }

    /// Cooldown started by an attack in this mode.
    #[must_use]
    pub fn attack_cooldown_ms(self, config: &CombatConfig) -> f32 {
        config.base_attack_cooldown_ms / self.attack_speed_multiplier()
    }

    /// Raw damage of an attack in this mode, before the target's defense.
    #[must_use]
    pub fn attack_damage(self, config: &CombatConfig) -> f32 {
        config.base_attack_damage * self.damage_multiplier()
    }

    /// Knockback of an attack thrown toward `facing`.
    #[must_use]
    pub fn knockback(self, facing: Facing, config: &CombatConfig) -> Vec2 {
        let kb = self.knockback_multiplier();
        Vec2::new(
            facing.sign() * config.base_knockback.x * kb,
            config.base_knockback.y * kb,
        )
    }

    /// Result of a hit carrying `damage`, thrown toward `facing`.
    #[must_use]
    pub fn strike(self, damage: f32, facing: Facing, config: &CombatConfig) -> AttackResult {
        AttackResult {
            damage,
            knockback: self.knockback(facing, config),
            hit_stun: self.hit_stun_ms(),
        }
    }

    /// Computes the result of an attack thrown toward `facing`.
    #[must_use]
    pub fn attack(self, facing: Facing, config: &CombatConfig) -> AttackResult {
        self.strike(self.attack_damage(config), facing, config)
    }

    /// Reduces incoming damage by this mode's defense.
    ///
    /// The result is rounded to a whole number and never negative.
    #[must_use]
    pub fn defend(self, incoming: f32) -> f32 {
        (incoming * self.defense_factor()).round().max(0.0)
    }
}
