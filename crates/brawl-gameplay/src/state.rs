//! Character behavior state machine.
//!
//! Four mutually exclusive states drive a character's per-frame motion:
//!
//! | state  | motion                              | leaves to              |
//! |--------|-------------------------------------|------------------------|
//! | Idle   | gravity only                        | Attack, Move           |
//! | Move   | walk, jump, gravity                 | Attack, Idle           |
//! | Attack | gravity, hitbox tracking, one hit   | Move, Idle (on timer)  |
//! | Hit    | knockback decay, gravity            | Idle (on timer)        |
//!
//! `take_damage` forces Hit from any state, including Hit itself.

use brawl_common::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::character::{Character, HitReport};
use crate::collision;
use crate::intent::Intent;
use crate::physics::Facing;

/// Payload-free tag of a behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Standing still
    Idle,
    /// Walking or jumping
    Move,
    /// Swinging an attack
    Attack,
    /// Stunned by a hit
    Hit,
}

impl StateKind {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Move => "Move",
            Self::Attack => "Attack",
            Self::Hit => "Hit",
        }
    }
}

/// Scratch data for one Attack activation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttackProgress {
    /// Time spent in the state
    pub elapsed_ms: f32,
    /// Whether this swing already damaged the opponent
    pub has_hit: bool,
}

/// Scratch data for one Hit activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitStun {
    /// Time spent in the state
    pub elapsed_ms: f32,
    /// Time until recovery
    pub duration_ms: f32,
}

impl HitStun {
    /// Remaining stun time.
    #[must_use]
    pub fn remaining_ms(&self) -> f32 {
        (self.duration_ms - self.elapsed_ms).max(0.0)
    }
}

/// Active behavior state with its per-activation data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Standing still
    #[default]
    Idle,
    /// Walking or jumping
    Move,
    /// Swinging an attack
    Attack(AttackProgress),
    /// Stunned by a hit
    Hit(HitStun),
}

impl BehaviorState {
    /// Tag of this state.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::Idle => StateKind::Idle,
            Self::Move => StateKind::Move,
            Self::Attack(_) => StateKind::Attack,
            Self::Hit(_) => StateKind::Hit,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// What one state update produced.
#[derive(Debug, Default)]
pub(crate) struct StateStep {
    pub next: Option<StateKind>,
    pub hit: Option<HitReport>,
}

impl StateStep {
    fn stay() -> Self {
        Self::default()
    }

    fn go(next: StateKind) -> Self {
        Self {
            next: Some(next),
            hit: None,
        }
    }
}

impl Character {
    /// Runs the current state's update and picks the next state.
    pub(crate) fn run_state(
        &mut self,
        dt_ms: f32,
        intent: &Intent,
        opponent: &mut Character,
    ) -> StateStep {
        match self.state {
            BehaviorState::Idle => self.update_idle(dt_ms, intent),
            BehaviorState::Move => self.update_move(dt_ms, intent),
            BehaviorState::Attack(progress) => self.update_attack(progress, dt_ms, intent, opponent),
            BehaviorState::Hit(stun) => self.update_hit(stun, dt_ms),
        }
    }

    /// Leaves the current state and enters `next`.
    pub(crate) fn transition_to(&mut self, next: StateKind) {
        let previous = self.state.kind();
        self.exit_state();
        self.enter_state(next);
        debug!(
            player = %self.player_id,
            from = previous.name(),
            to = next.name(),
            "state transition"
        );
    }

    fn enter_state(&mut self, next: StateKind) {
        self.state = match next {
            StateKind::Idle => BehaviorState::Idle,
            StateKind::Move => BehaviorState::Move,
            StateKind::Attack => {
                self.is_attacking = true;
                self.attack_cooldown_ms = self.mode.attack_cooldown_ms(&self.config);

                let damage = self.mode.attack_damage(&self.config);
                let mut hitbox = self.hitbox_pool.acquire();
                hitbox.init(self.player_id, self.attack_hitbox_rect(), damage);
                self.hitbox = Some(hitbox);

                BehaviorState::Attack(AttackProgress::default())
            },
            StateKind::Hit => {
                self.is_hit_stunned = true;
                let duration_ms = self
                    .last_hit_stun_ms
                    .unwrap_or(self.config.default_hit_stun_ms);
                BehaviorState::Hit(HitStun {
                    elapsed_ms: 0.0,
                    duration_ms,
                })
            },
        };
    }

    fn exit_state(&mut self) {
        match self.state {
            BehaviorState::Idle | BehaviorState::Move => {},
            BehaviorState::Attack(_) => {
                if let Some(hitbox) = self.hitbox.take() {
                    self.hitbox_pool.release(hitbox);
                }
                self.is_attacking = false;
            },
            BehaviorState::Hit(_) => {
                self.is_hit_stunned = false;
            },
        }
    }

    fn update_idle(&mut self, dt_ms: f32, intent: &Intent) -> StateStep {
        self.body.velocity.x = 0.0;
        self.body.simulate(&self.config, dt_ms);

        if intent.attack && self.can_attack() {
            StateStep::go(StateKind::Attack)
        } else if intent.is_moving() {
            StateStep::go(StateKind::Move)
        } else {
            StateStep::stay()
        }
    }

    fn update_move(&mut self, dt_ms: f32, intent: &Intent) -> StateStep {
        self.body.velocity.x = intent.horizontal_axis() * self.config.move_speed;
        if let Some(facing) = Facing::from_velocity(self.body.velocity.x) {
            self.facing = facing;
        }
        if intent.up && self.body.grounded {
            self.body.velocity.y = -self.config.jump_velocity;
            self.body.grounded = false;
        }
        self.body.simulate(&self.config, dt_ms);

        if intent.attack && self.can_attack() {
            StateStep::go(StateKind::Attack)
        } else if !intent.is_moving() {
            StateStep::go(StateKind::Idle)
        } else {
            StateStep::stay()
        }
    }

    fn update_attack(
        &mut self,
        mut progress: AttackProgress,
        dt_ms: f32,
        intent: &Intent,
        opponent: &mut Character,
    ) -> StateStep {
        progress.elapsed_ms += dt_ms;
        self.body.simulate(&self.config, dt_ms);

        let rect = self.attack_hitbox_rect();
        if let Some(hitbox) = self.hitbox.as_mut() {
            hitbox.move_to(Vec2::new(rect.x, rect.y));
        }

        let mut hit = None;
        if !progress.has_hit {
            hit = self.try_hit(opponent);
            progress.has_hit = hit.is_some();
        }
        self.state = BehaviorState::Attack(progress);

        let next = if progress.elapsed_ms >= self.config.attack_duration_ms {
            Some(if intent.is_moving() {
                StateKind::Move
            } else {
                StateKind::Idle
            })
        } else {
            None
        };
        StateStep { next, hit }
    }

    fn update_hit(&mut self, mut stun: HitStun, dt_ms: f32) -> StateStep {
        stun.elapsed_ms += dt_ms;
        self.body.velocity.x *= self.config.knockback_decay;
        self.body.simulate(&self.config, dt_ms);
        self.state = BehaviorState::Hit(stun);

        if stun.elapsed_ms >= stun.duration_ms {
            StateStep::go(StateKind::Idle)
        } else {
            StateStep::stay()
        }
    }

    /// Checks the attack hitbox against the opponent and applies its damage on overlap.
    fn try_hit(&mut self, opponent: &mut Character) -> Option<HitReport> {
        let hitbox = self.hitbox.as_ref()?;
        let target = opponent.hurtbox();
        if !hitbox.overlaps(&target) {
            return None;
        }
        let point = collision::hit_point(&hitbox.rect, &target)?;

        let result = self.mode.strike(hitbox.damage, self.facing, &self.config);
        let damage_taken = opponent.take_damage(&result);
        debug!(
            attacker = %self.player_id,
            target = %opponent.player_id(),
            raw = result.damage,
            taken = damage_taken,
            "attack landed"
        );

        Some(HitReport {
            attacker: self.player_id,
            target: opponent.player_id(),
            result,
            damage_taken,
            point,
            attacker_mode: self.mode,
        })
    }
}
