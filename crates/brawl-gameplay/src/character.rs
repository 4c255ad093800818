//! The combatant aggregate.
//!
//! A [`Character`] owns its body, health, cooldown, elemental mode, behavior
//! state and attack hitbox. Its only link to the other combatant is an id;
//! the session resolves that id and lends the opponent to [`Character::update`]
//! for the duration of one frame.

use brawl_common::{PlayerId, Rect, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CombatConfig;
use crate::element::{AttackResult, ElementalMode};
use crate::events::{CharacterEvent, CharacterListener, EventEmitter, HealthChange, ModeChange};
use crate::hitbox::{Hitbox, HitboxPool};
use crate::intent::Intent;
use crate::physics::{Body, Facing};
use crate::state::{BehaviorState, StateKind};

/// A landed attack, as seen by the attacker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitReport {
    /// Character whose hitbox connected
    pub attacker: PlayerId,
    /// Character that was hit
    pub target: PlayerId,
    /// Attack result before the target's defense
    pub result: AttackResult,
    /// Damage actually removed from the target's health
    pub damage_taken: f32,
    /// Center of the hitbox/hurtbox overlap, for effect placement
    pub point: Vec2,
    /// Attacker's mode when the hit landed
    pub attacker_mode: ElementalMode,
}

/// One of the two combatants.
#[derive(Debug)]
pub struct Character {
    pub(crate) player_id: PlayerId,
    pub(crate) config: CombatConfig,
    pub(crate) body: Body,
    pub(crate) facing: Facing,
    spawn_facing: Facing,
    health: f32,
    max_health: f32,
    pub(crate) attack_cooldown_ms: f32,
    pub(crate) is_attacking: bool,
    pub(crate) is_hit_stunned: bool,
    pub(crate) last_hit_stun_ms: Option<f32>,
    pub(crate) mode: ElementalMode,
    pub(crate) state: BehaviorState,
    pub(crate) hitbox: Option<Hitbox>,
    pub(crate) hitbox_pool: HitboxPool,
    opponent: Option<PlayerId>,
    emitter: EventEmitter,
}

impl Character {
    /// Creates a character standing idle at `position`.
    #[must_use]
    pub fn new(
        player_id: PlayerId,
        position: Vec2,
        facing: Facing,
        mode: ElementalMode,
        config: &CombatConfig,
    ) -> Self {
        let mut body = Body::new(position, config.character_width, config.character_height);
        body.resolve_ground(config);

        Self {
            player_id,
            config: config.clone(),
            body,
            facing,
            spawn_facing: facing,
            health: config.max_health,
            max_health: config.max_health,
            attack_cooldown_ms: 0.0,
            is_attacking: false,
            is_hit_stunned: false,
            last_hit_stun_ms: None,
            mode,
            state: BehaviorState::Idle,
            hitbox: None,
            hitbox_pool: HitboxPool::new(),
            opponent: None,
            emitter: EventEmitter::new(),
        }
    }

    /// Links this character to its opponent. Called once per pairing.
    pub fn set_opponent(&mut self, opponent: PlayerId) {
        assert_ne!(
            opponent, self.player_id,
            "{} cannot be its own opponent",
            self.player_id
        );
        self.opponent = Some(opponent);
    }

    /// Registers a listener for this character's events.
    pub fn subscribe(&mut self, listener: Box<dyn CharacterListener>) {
        self.emitter.subscribe(listener);
    }

    /// Advances the character by one frame.
    ///
    /// `dt_ms` must already be clamped and non-negative. `opponent` must be
    /// the character registered with [`set_opponent`](Self::set_opponent);
    /// anything else is a wiring bug and panics.
    ///
    /// Returns the hit this character landed during the frame, if any.
    pub fn update(
        &mut self,
        dt_ms: f32,
        intent: &Intent,
        opponent: &mut Character,
    ) -> Option<HitReport> {
        match self.opponent {
            Some(id) if id == opponent.player_id => {},
            Some(id) => panic!(
                "{} is paired with {id} but was updated against {}",
                self.player_id, opponent.player_id
            ),
            None => panic!(
                "{} has no opponent; call set_opponent before update",
                self.player_id
            ),
        }

        if intent.switch_mode {
            self.switch_elemental_mode();
        }

        self.attack_cooldown_ms = (self.attack_cooldown_ms - dt_ms).max(0.0);

        let step = self.run_state(dt_ms, intent, opponent);
        if let Some(next) = step.next {
            self.transition_to(next);
        }
        step.hit
    }

    /// Toggles the elemental mode.
    ///
    /// Does nothing while attacking or stunned. Returns whether the mode changed.
    pub fn switch_elemental_mode(&mut self) -> bool {
        if self.is_attacking || self.is_hit_stunned {
            return false;
        }

        self.mode = self.mode.toggled();
        debug!(player = %self.player_id, mode = self.mode.name(), "switched mode");
        self.emitter.emit(&CharacterEvent::ModeChanged(ModeChange {
            player_id: self.player_id,
            new_mode: self.mode,
        }));
        true
    }

    /// Applies a landed attack: defense, health, knockback and stun.
    ///
    /// Knockback replaces the current velocity. Returns the damage taken.
    pub fn take_damage(&mut self, result: &AttackResult) -> f32 {
        let damage = self.mode.defend(result.damage);
        self.health = (self.health - damage).clamp(0.0, self.max_health);
        self.body.velocity = result.knockback;
        self.last_hit_stun_ms = Some(result.hit_stun);
        self.transition_to(StateKind::Hit);

        self.emit_health(damage);
        damage
    }

    /// Whether health is depleted.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Restores the character to a fresh Idle state at `position`.
    ///
    /// The elemental mode is kept. Observers receive a zero-damage health
    /// change so they can resynchronize.
    pub fn reset(&mut self, position: Vec2) {
        self.transition_to(StateKind::Idle);

        self.body = Body::new(position, self.config.character_width, self.config.character_height);
        self.body.resolve_ground(&self.config);
        self.facing = self.spawn_facing;
        self.health = self.max_health;
        self.attack_cooldown_ms = 0.0;
        self.last_hit_stun_ms = None;

        self.emit_health(0.0);
    }

    /// Whether a new attack may start now.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.attack_cooldown_ms <= 0.0 && !self.is_hit_stunned && !self.is_attacking
    }

    /// Where the attack hitbox sits for the current position and facing.
    pub(crate) fn attack_hitbox_rect(&self) -> Rect {
        let hurtbox = self.body.hurtbox();
        let x = match self.facing {
            Facing::Right => hurtbox.right(),
            Facing::Left => hurtbox.left() - self.config.hitbox_width,
        };
        Rect::new(
            x,
            hurtbox.top() + self.config.hitbox_offset_y,
            self.config.hitbox_width,
            self.config.hitbox_height,
        )
    }

    fn emit_health(&mut self, damage: f32) {
        self.emitter.emit(&CharacterEvent::HealthChanged(HealthChange {
            player_id: self.player_id,
            current_health: self.health,
            max_health: self.max_health,
            damage,
        }));
    }

    /// Character id.
    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Opponent id, once paired.
    #[must_use]
    pub fn opponent(&self) -> Option<PlayerId> {
        self.opponent
    }

    /// Current behavior state.
    #[must_use]
    pub fn state(&self) -> &BehaviorState {
        &self.state
    }

    /// Current behavior state tag.
    #[must_use]
    pub fn state_kind(&self) -> StateKind {
        self.state.kind()
    }

    /// Current behavior state name.
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Current elemental mode.
    #[must_use]
    pub fn mode(&self) -> ElementalMode {
        self.mode
    }

    /// Current elemental mode name.
    #[must_use]
    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Vulnerable body volume.
    #[must_use]
    pub fn hurtbox(&self) -> Rect {
        self.body.hurtbox()
    }

    /// Active attack hitbox; present only in the Attack state.
    #[must_use]
    pub fn attack_hitbox(&self) -> Option<&Hitbox> {
        self.hitbox.as_ref()
    }

    /// Top-left corner of the hurtbox.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    /// Facing direction.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the character is standing on the ground.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    /// Time until another attack may start.
    #[must_use]
    pub fn attack_cooldown_ms(&self) -> f32 {
        self.attack_cooldown_ms
    }

    /// Whether the character is in the Attack state.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Whether the character is in the Hit state.
    #[must_use]
    pub fn is_hit_stunned(&self) -> bool {
        self.is_hit_stunned
    }

    /// Stun duration of the last hit taken.
    #[must_use]
    pub fn last_hit_stun_ms(&self) -> Option<f32> {
        self.last_hit_stun_ms
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use proptest::prelude::*;

    const FRAME: f32 = 1000.0 / 60.0;

    fn fighters(gap: f32) -> (Character, Character) {
        let config = CombatConfig::default();
        let y = config.standing_y();
        let mut a = Character::new(
            PlayerId::ONE,
            Vec2::new(300.0, y),
            Facing::Right,
            ElementalMode::Fire,
            &config,
        );
        let mut b = Character::new(
            PlayerId::TWO,
            Vec2::new(300.0 + config.character_width + gap, y),
            Facing::Left,
            ElementalMode::Water,
            &config,
        );
        a.set_opponent(PlayerId::TWO);
        b.set_opponent(PlayerId::ONE);
        (a, b)
    }

    fn attack_result(damage: f32) -> AttackResult {
        AttackResult {
            damage,
            knockback: Vec2::new(120.0, -40.0),
            hit_stun: 200.0,
        }
    }

    #[test]
    fn test_new_character_defaults() {
        let (a, _) = fighters(20.0);
        assert_eq!(a.health(), 100.0);
        assert_eq!(a.max_health(), 100.0);
        assert_eq!(a.mode_name(), "Fire");
        assert_eq!(a.state_name(), "Idle");
        assert_eq!(a.opponent(), Some(PlayerId::TWO));
        assert!(a.is_grounded());
        assert!(a.can_attack());
        assert!(a.attack_hitbox().is_none());
    }

    #[test]
    fn test_fire_hits_water_scenario() {
        let (mut a, mut b) = fighters(20.0);
        let log = EventLog::new();
        b.subscribe(Box::new(log.clone()));

        a.update(FRAME, &Intent::attack(), &mut b);
        let hit = a.update(FRAME, &Intent::NONE, &mut b).expect("hit lands");

        let expected =
            ElementalMode::Water.defend(10.0 * ElementalMode::Fire.damage_multiplier());
        assert_eq!(expected, 8.0);
        assert_eq!(b.health(), 100.0 - expected);
        assert_eq!(hit.damage_taken, expected);
        assert_eq!(hit.attacker, PlayerId::ONE);
        assert_eq!(hit.target, PlayerId::TWO);
        assert_eq!(hit.attacker_mode, ElementalMode::Fire);

        assert_eq!(b.state_kind(), StateKind::Hit);
        match b.state() {
            BehaviorState::Hit(stun) => assert_eq!(stun.duration_ms, hit.result.hit_stun),
            other => panic!("expected Hit, got {other:?}"),
        }
        assert_eq!(b.last_hit_stun_ms(), Some(ElementalMode::Fire.hit_stun_ms()));

        let changes = log.health_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].damage, expected);
        assert_eq!(changes[0].current_health, 92.0);
        assert_eq!(changes[0].max_health, 100.0);
    }

    #[test]
    fn test_at_most_one_hit_per_swing() {
        let (mut a, mut b) = fighters(20.0);
        a.update(FRAME, &Intent::attack(), &mut b);

        let mut hits = 0;
        for _ in 0..10 {
            if a.update(FRAME, &Intent::NONE, &mut b).is_some() {
                hits += 1;
            }
            // Keep the target inside the hitbox
            b.body_mut().position.x = 370.0;
            b.body_mut().velocity = Vec2::ZERO;
        }
        assert_eq!(hits, 1);
        assert_eq!(b.health(), 92.0);
    }

    #[test]
    fn test_new_swing_can_hit_again() {
        let (mut a, mut b) = fighters(20.0);
        a.update(FRAME, &Intent::attack(), &mut b);
        a.update(FRAME, &Intent::NONE, &mut b);
        assert_eq!(b.health(), 92.0);

        for _ in 0..60 {
            a.update(FRAME, &Intent::NONE, &mut b);
            b.body_mut().position.x = 370.0;
        }
        assert!(a.can_attack());

        a.update(FRAME, &Intent::attack(), &mut b);
        a.update(FRAME, &Intent::NONE, &mut b);
        assert_eq!(b.health(), 84.0);
    }

    #[test]
    fn test_lethal_hit_defeats_on_same_update() {
        let (mut a, mut b) = fighters(20.0);
        b.take_damage(&attack_result(132.0));
        assert!(!b.is_defeated());
        assert_eq!(b.health(), 8.0);

        a.update(FRAME, &Intent::attack(), &mut b);
        assert!(!b.is_defeated());
        a.update(FRAME, &Intent::NONE, &mut b);
        assert_eq!(b.health(), 0.0);
        assert!(b.is_defeated());
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let (mut a, _) = fighters(20.0);
        a.take_damage(&attack_result(1_000.0));
        assert_eq!(a.health(), 0.0);
        assert!(a.is_defeated());
    }

    #[test]
    fn test_knockback_overwrites_velocity() {
        let (mut a, _) = fighters(20.0);
        a.body_mut().velocity = Vec2::new(-500.0, 300.0);
        a.take_damage(&attack_result(10.0));
        assert_eq!(a.velocity(), Vec2::new(120.0, -40.0));
    }

    #[test]
    fn test_hit_during_attack_cancels_it() {
        let (mut a, mut b) = fighters(20.0);
        b.update(FRAME, &Intent::attack(), &mut a);
        assert!(b.is_attacking());
        assert!(b.attack_hitbox().is_some());

        b.take_damage(&attack_result(10.0));
        assert_eq!(b.state_kind(), StateKind::Hit);
        assert!(!b.is_attacking());
        assert!(b.attack_hitbox().is_none());
    }

    #[test]
    fn test_second_hit_restarts_stun_with_new_duration() {
        let (mut a, _) = fighters(20.0);
        a.take_damage(&attack_result(10.0));
        a.body_mut().velocity = Vec2::ZERO;

        let mut b = Character::new(
            PlayerId::TWO,
            Vec2::new(600.0, 400.0),
            Facing::Left,
            ElementalMode::Water,
            &CombatConfig::default(),
        );
        b.set_opponent(PlayerId::ONE);
        for _ in 0..5 {
            a.update(FRAME, &Intent::NONE, &mut b);
        }

        let mut longer = attack_result(10.0);
        longer.hit_stun = 500.0;
        a.take_damage(&longer);
        match a.state() {
            BehaviorState::Hit(stun) => {
                assert_eq!(stun.elapsed_ms, 0.0);
                assert_eq!(stun.duration_ms, 500.0);
            },
            other => panic!("expected Hit, got {other:?}"),
        }
    }

    #[test]
    fn test_switch_mode_twice_returns_to_original() {
        let (mut a, _) = fighters(20.0);
        let log = EventLog::new();
        a.subscribe(Box::new(log.clone()));

        assert!(a.switch_elemental_mode());
        assert_eq!(a.mode(), ElementalMode::Water);
        assert!(a.switch_elemental_mode());
        assert_eq!(a.mode(), ElementalMode::Fire);

        let changes = log.mode_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].new_mode, ElementalMode::Water);
        assert_eq!(changes[1].new_mode, ElementalMode::Fire);
    }

    #[test]
    fn test_switch_mode_while_attacking_is_ignored() {
        let (mut a, mut b) = fighters(300.0);
        let log = EventLog::new();
        a.subscribe(Box::new(log.clone()));

        a.update(FRAME, &Intent::attack(), &mut b);
        assert!(a.is_attacking());

        assert!(!a.switch_elemental_mode());
        assert_eq!(a.mode(), ElementalMode::Fire);
        assert!(log.mode_changes().is_empty());
    }

    #[test]
    fn test_switch_mode_while_stunned_is_ignored() {
        let (mut a, _) = fighters(20.0);
        a.take_damage(&attack_result(5.0));
        assert!(!a.switch_elemental_mode());
        assert_eq!(a.mode(), ElementalMode::Fire);
    }

    #[test]
    fn test_switch_keeps_cooldown_and_position() {
        let (mut a, mut b) = fighters(300.0);
        a.update(FRAME, &Intent::attack(), &mut b);
        for _ in 0..20 {
            a.update(FRAME, &Intent::NONE, &mut b);
        }
        let cooldown = a.attack_cooldown_ms();
        let position = a.position();
        assert!(cooldown > 0.0);

        assert!(a.switch_elemental_mode());
        assert_eq!(a.attack_cooldown_ms(), cooldown);
        assert_eq!(a.position(), position);
    }

    #[test]
    fn test_switch_intent_applies_before_state_update() {
        let (mut a, mut b) = fighters(300.0);
        a.update(FRAME, &Intent::switch_mode().with_attack(), &mut b);
        assert_eq!(a.mode(), ElementalMode::Water);
        assert_eq!(
            a.attack_cooldown_ms(),
            ElementalMode::Water.attack_cooldown_ms(&CombatConfig::default())
        );
    }

    #[test]
    fn test_fire_cooldown_shorter_than_water() {
        let (mut a, mut b) = fighters(300.0);
        a.update(FRAME, &Intent::attack(), &mut b);
        b.update(FRAME, &Intent::attack(), &mut a);
        assert!(a.attack_cooldown_ms() < b.attack_cooldown_ms());
    }

    #[test]
    fn test_reset_restores_everything_but_mode() {
        let (mut a, mut b) = fighters(20.0);
        a.switch_elemental_mode();
        a.update(FRAME, &Intent::attack(), &mut b);
        a.take_damage(&attack_result(30.0));

        let log = EventLog::new();
        a.subscribe(Box::new(log.clone()));
        a.reset(Vec2::new(100.0, 400.0));

        assert_eq!(a.health(), a.max_health());
        assert_eq!(a.state_kind(), StateKind::Idle);
        assert_eq!(a.position(), Vec2::new(100.0, 400.0));
        assert_eq!(a.velocity(), Vec2::ZERO);
        assert_eq!(a.facing(), Facing::Right);
        assert_eq!(a.attack_cooldown_ms(), 0.0);
        assert_eq!(a.last_hit_stun_ms(), None);
        assert!(!a.is_hit_stunned());
        assert!(!a.is_attacking());
        assert!(a.attack_hitbox().is_none());
        assert_eq!(a.mode(), ElementalMode::Water);

        let changes = log.health_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].damage, 0.0);
        assert_eq!(changes[0].current_health, 100.0);
    }

    #[test]
    fn test_hitbox_is_recycled_between_swings() {
        let (mut a, mut b) = fighters(300.0);
        for _ in 0..3 {
            a.update(FRAME, &Intent::attack(), &mut b);
            for _ in 0..60 {
                a.update(FRAME, &Intent::NONE, &mut b);
            }
        }
        assert_eq!(a.hitbox_pool.allocated(), 1);
        assert_eq!(a.hitbox_pool.available(), 1);
    }

    #[test]
    #[should_panic(expected = "has no opponent")]
    fn test_update_without_opponent_panics() {
        let config = CombatConfig::default();
        let mut a = Character::new(
            PlayerId::ONE,
            Vec2::new(100.0, 400.0),
            Facing::Right,
            ElementalMode::Fire,
            &config,
        );
        let mut b = Character::new(
            PlayerId::TWO,
            Vec2::new(600.0, 400.0),
            Facing::Left,
            ElementalMode::Water,
            &config,
        );
        a.update(FRAME, &Intent::NONE, &mut b);
    }

    #[test]
    #[should_panic(expected = "cannot be its own opponent")]
    fn test_self_pairing_panics() {
        let (mut a, _) = fighters(20.0);
        a.set_opponent(PlayerId::ONE);
    }

    proptest! {
        #[test]
        fn health_stays_in_bounds(damages in proptest::collection::vec(-50.0f32..200.0, 1..20)) {
            let (mut a, mut b) = fighters(20.0);
            for damage in damages {
                a.take_damage(&attack_result(damage));
                prop_assert!(a.health() >= 0.0 && a.health() <= a.max_health());
                a.update(FRAME, &Intent::NONE, &mut b);
                prop_assert!(a.health() >= 0.0 && a.health() <= a.max_health());
            }
        }

        #[test]
        fn health_never_increases_without_reset(damages in proptest::collection::vec(0.0f32..40.0, 1..20)) {
            let (mut a, _) = fighters(20.0);
            let mut previous = a.health();
            for damage in damages {
                a.take_damage(&attack_result(damage));
                prop_assert!(a.health() <= previous);
                previous = a.health();
            }
        }
    }
}
