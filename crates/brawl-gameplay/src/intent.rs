//! Per-frame intent flags.
//!
//! An input adapter (keyboard, gamepad, script) translates device state into
//! an [`Intent`] for each combatant once per frame. The simulation never sees
//! devices.

use serde::{Deserialize, Serialize};

/// Desired actions for one combatant during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    /// Move left
    pub left: bool,
    /// Move right
    pub right: bool,
    /// Jump
    pub up: bool,
    /// Down (keeps the character in Move; no physical effect)
    pub down: bool,
    /// Attack
    pub attack: bool,
    /// Explicit movement flag set by adapters that track it themselves
    pub moving: bool,
    /// Toggle elemental mode
    pub switch_mode: bool,
}

impl Intent {
    /// No intent at all.
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
        attack: false,
        moving: false,
        switch_mode: false,
    };

    /// Intent to hold left.
    #[must_use]
    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::NONE
        }
    }

    /// Intent to hold right.
    #[must_use]
    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::NONE
        }
    }

    /// Intent to jump.
    #[must_use]
    pub fn jump() -> Self {
        Self {
            up: true,
            ..Self::NONE
        }
    }

    /// Intent to attack.
    #[must_use]
    pub fn attack() -> Self {
        Self {
            attack: true,
            ..Self::NONE
        }
    }

    /// Intent to toggle elemental mode.
    #[must_use]
    pub fn switch_mode() -> Self {
        Self {
            switch_mode: true,
            ..Self::NONE
        }
    }

    /// Adds the attack flag.
    #[must_use]
    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    /// Whether any movement intent is set.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving || self.left || self.right || self.up || self.down
    }

    /// Horizontal direction: `-1.0`, `0.0` or `1.0`. Left and right together cancel.
    #[must_use]
    pub fn horizontal_axis(&self) -> f32 {
        f32::from(u8::from(self.right)) - f32::from(u8::from(self.left))
    }
}
