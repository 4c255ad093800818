//! # Brawl Gameplay
//!
//! Combat simulation for a two-player elemental duel.
//!
//! This crate holds everything that runs once per frame:
//! - Elemental modes (Fire, Water) and their combat modifiers
//! - Character aggregate with health, cooldown and knockback
//! - Behavior state machine (Idle, Move, Attack, Hit)
//! - Pooled attack hitboxes and AABB collision
//! - Synchronous character event notifications
//! - Duel session that owns both fighters and steps them

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod character;
pub mod collision;
pub mod config;
pub mod element;
pub mod events;
pub mod hitbox;
pub mod intent;
pub mod physics;
pub mod session;
pub mod state;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::character::*;
    pub use crate::collision::*;
    pub use crate::config::*;
    pub use crate::element::*;
    pub use crate::events::*;
    pub use crate::hitbox::*;
    pub use crate::intent::*;
    pub use crate::physics::*;
    pub use crate::session::*;
    pub use crate::state::*;
}

pub use prelude::*;
