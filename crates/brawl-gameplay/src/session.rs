//! Duel session.
//!
//! A [`DuelSession`] owns both combatants for one match. It is constructed
//! explicitly and handed to whatever drives the frame loop; there is no
//! global instance. Each fighter refers to the other by [`PlayerId`], and the
//! session resolves that id to lend the opponent out for one update.

use brawl_common::{ConfigError, PlayerId, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::character::{Character, HitReport};
use crate::collision;
use crate::config::CombatConfig;
use crate::element::ElementalMode;
use crate::events::CharacterListener;
use crate::intent::Intent;
use crate::physics::Facing;

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// One fighter is still standing.
    Winner(PlayerId),
    /// Both fighters fell on the same frame.
    Draw,
}

/// Everything that happened during one [`DuelSession::step`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameReport {
    /// Frame number after the step
    pub frame: u64,
    /// Delta actually simulated, after clamping
    pub dt_ms: f32,
    /// Hits landed this frame, in update order
    pub hits: Vec<HitReport>,
    /// Horizontal overlap resolved between the two bodies
    pub separation: Option<f32>,
    /// Set on the frame the match ends
    pub outcome: Option<MatchOutcome>,
}

/// The live simulation for one match between two fighters.
#[derive(Debug)]
pub struct DuelSession {
    config: CombatConfig,
    fighters: [Character; 2],
    frame: u64,
    outcome: Option<MatchOutcome>,
}

impl DuelSession {
    /// Creates a session with player one in Fire and player two in Water.
    pub fn new(config: CombatConfig) -> Result<Self, ConfigError> {
        Self::with_modes(config, ElementalMode::Fire, ElementalMode::Water)
    }

    /// Creates a session with the given starting modes.
    pub fn with_modes(
        config: CombatConfig,
        one: ElementalMode,
        two: ElementalMode,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut first = Character::new(
            PlayerId::ONE,
            spawn_position(&config, PlayerId::ONE),
            spawn_facing(PlayerId::ONE),
            one,
            &config,
        );
        let mut second = Character::new(
            PlayerId::TWO,
            spawn_position(&config, PlayerId::TWO),
            spawn_facing(PlayerId::TWO),
            two,
            &config,
        );
        first.set_opponent(PlayerId::TWO);
        second.set_opponent(PlayerId::ONE);

        info!(
            one = one.name(),
            two = two.name(),
            arena = config.arena_width,
            "duel session created"
        );

        Ok(Self {
            config,
            fighters: [first, second],
            frame: 0,
            outcome: None,
        })
    }

    /// Advances both fighters by one frame.
    ///
    /// The delta is clamped to `0..=max_frame_ms`. Fighter one updates
    /// before fighter two, then bodies are separated, then defeat is
    /// checked. Once the match has an outcome, steps do nothing until
    /// [`reset_round`](Self::reset_round).
    pub fn step(&mut self, dt_ms: f32, intents: [Intent; 2]) -> FrameReport {
        if self.outcome.is_some() {
            return FrameReport {
                frame: self.frame,
                ..FrameReport::default()
            };
        }

        let dt_ms = self.clamp_dt(dt_ms);
        self.frame += 1;

        let mut hits = Vec::new();
        for id in PlayerId::BOTH {
            let (fighter, opponent) = self.pair_mut(id);
            if let Some(hit) = fighter.update(dt_ms, &intents[id.index()], opponent) {
                hits.push(hit);
            }
        }

        let [one, two] = &mut self.fighters;
        let separation = collision::resolve_body_collision(one, two, &self.config);

        let outcome = self.evaluate_outcome();
        if let Some(outcome) = outcome {
            info!(frame = self.frame, ?outcome, "match over");
            self.outcome = Some(outcome);
        }

        FrameReport {
            frame: self.frame,
            dt_ms,
            hits,
            separation,
            outcome,
        }
    }

    /// Puts both fighters back on their spawns and clears the outcome.
    pub fn reset_round(&mut self) {
        for id in PlayerId::BOTH {
            let position = spawn_position(&self.config, id);
            self.fighters[id.index()].reset(position);
        }
        self.outcome = None;
        info!(frame = self.frame, "round reset");
    }

    /// Registers a listener on one fighter.
    pub fn subscribe(&mut self, id: PlayerId, listener: Box<dyn CharacterListener>) {
        self.fighters[id.index()].subscribe(listener);
    }

    /// A fighter by id.
    #[must_use]
    pub fn fighter(&self, id: PlayerId) -> &Character {
        &self.fighters[id.index()]
    }

    /// Mutable access to a fighter, for drivers that apply out-of-band actions.
    pub fn fighter_mut(&mut self, id: PlayerId) -> &mut Character {
        &mut self.fighters[id.index()]
    }

    /// How the match ended, if it has.
    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Number of frames simulated.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    fn clamp_dt(&self, dt_ms: f32) -> f32 {
        if !dt_ms.is_finite() || dt_ms < 0.0 {
            debug!(dt_ms, "discarding invalid frame delta");
            return 0.0;
        }
        if dt_ms > self.config.max_frame_ms {
            debug!(dt_ms, max = self.config.max_frame_ms, "clamping frame delta");
            return self.config.max_frame_ms;
        }
        dt_ms
    }

    /// Splits the registry into the fighter `id` and the opponent it is paired with.
    fn pair_mut(&mut self, id: PlayerId) -> (&mut Character, &mut Character) {
        let paired = self.fighters[id.index()].opponent();
        assert_eq!(
            paired,
            Some(id.other()),
            "{id} is not paired with its session opponent"
        );

        let [one, two] = &mut self.fighters;
        if id == PlayerId::ONE {
            (one, two)
        } else {
            (two, one)
        }
    }

    fn evaluate_outcome(&self) -> Option<MatchOutcome> {
        let [one, two] = &self.fighters;
        match (one.is_defeated(), two.is_defeated()) {
            (true, true) => Some(MatchOutcome::Draw),
            (false, true) => Some(MatchOutcome::Winner(PlayerId::ONE)),
            (true, false) => Some(MatchOutcome::Winner(PlayerId::TWO)),
            (false, false) => None,
        }
    }
}

/// Where a fighter starts: `spawn_margin` in from its own wall, on the ground.
#[must_use]
pub fn spawn_position(config: &CombatConfig, id: PlayerId) -> Vec2 {
    let x = if id == PlayerId::ONE {
        config.spawn_margin
    } else {
        config.arena_width - config.spawn_margin - config.character_width
    };
    Vec2::new(x, config.standing_y())
}

/// Fighters start facing each other.
fn spawn_facing(id: PlayerId) -> Facing {
    if id == PlayerId::ONE {
        Facing::Right
    } else {
        Facing::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::state::StateKind;

    const FRAME: f32 = 1000.0 / 60.0;
    const IDLE: [Intent; 2] = [Intent::NONE, Intent::NONE];

    fn close_session() -> DuelSession {
        let mut session = DuelSession::new(CombatConfig::default()).expect("valid config");
        session.fighter_mut(PlayerId::ONE).body_mut().position.x = 400.0;
        session.fighter_mut(PlayerId::TWO).body_mut().position.x = 470.0;
        session
    }

    fn assert_state_invariants(session: &DuelSession) {
        for id in PlayerId::BOTH {
            let fighter = session.fighter(id);
            let attacking = fighter.state_kind() == StateKind::Attack;
            assert_eq!(fighter.attack_hitbox().is_some(), attacking);
            assert_eq!(fighter.is_attacking(), attacking);
            assert_eq!(
                fighter.is_hit_stunned(),
                fighter.state_kind() == StateKind::Hit
            );
            assert!(fighter.health() >= 0.0 && fighter.health() <= fighter.max_health());
        }
    }

    #[test]
    fn test_session_spawns_facing_each_other() {
        let session = DuelSession::new(CombatConfig::default()).expect("valid config");
        let one = session.fighter(PlayerId::ONE);
        let two = session.fighter(PlayerId::TWO);

        assert_eq!(one.position(), Vec2::new(200.0, 400.0));
        assert_eq!(two.position(), Vec2::new(750.0, 400.0));
        assert_eq!(one.facing(), Facing::Right);
        assert_eq!(two.facing(), Facing::Left);
        assert_eq!(one.opponent(), Some(PlayerId::TWO));
        assert_eq!(two.opponent(), Some(PlayerId::ONE));
        assert_eq!(one.mode(), ElementalMode::Fire);
        assert_eq!(two.mode(), ElementalMode::Water);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CombatConfig {
            max_health: 0.0,
            ..Default::default()
        };
        assert!(DuelSession::new(config).is_err());
    }

    #[test]
    fn test_step_clamps_delta() {
        let mut session = DuelSession::new(CombatConfig::default()).expect("valid config");
        assert_eq!(session.step(500.0, IDLE).dt_ms, 50.0);
        assert_eq!(session.step(-3.0, IDLE).dt_ms, 0.0);
        assert_eq!(session.step(f32::NAN, IDLE).dt_ms, 0.0);
        assert_eq!(session.step(FRAME, IDLE).dt_ms, FRAME);
        assert_eq!(session.frame(), 4);
    }

    #[test]
    fn test_step_reports_hits() {
        let mut session = close_session();
        session.step(FRAME, [Intent::attack(), Intent::NONE]);
        let report = session.step(FRAME, IDLE);

        assert_eq!(report.hits.len(), 1);
        let hit = report.hits[0];
        assert_eq!(hit.attacker, PlayerId::ONE);
        assert_eq!(hit.target, PlayerId::TWO);
        assert_eq!(hit.damage_taken, 8.0);
        assert_eq!(session.fighter(PlayerId::TWO).state_kind(), StateKind::Hit);
    }

    #[test]
    fn test_simultaneous_swings_trade_hits() {
        let mut session = close_session();
        session.step(FRAME, [Intent::attack(), Intent::attack()]);
        let report = session.step(FRAME, IDLE);

        // Fighter one lands first, which cancels fighter two's swing.
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].attacker, PlayerId::ONE);
        assert!(session.fighter(PlayerId::TWO).attack_hitbox().is_none());
    }

    #[test]
    fn test_bodies_are_separated_each_frame() {
        let mut session = DuelSession::new(CombatConfig::default()).expect("valid config");
        session.fighter_mut(PlayerId::ONE).body_mut().position.x = 500.0;
        session.fighter_mut(PlayerId::TWO).body_mut().position.x = 500.0;

        let report = session.step(FRAME, IDLE);
        assert_eq!(report.separation, Some(50.0));
        let one = session.fighter(PlayerId::ONE).position().x;
        let two = session.fighter(PlayerId::TWO).position().x;
        assert_eq!(one - 500.0, 500.0 - two);

        let report = session.step(FRAME, IDLE);
        assert_eq!(report.separation, None);
        assert_eq!(session.fighter(PlayerId::ONE).position().x, one);
        assert_eq!(session.fighter(PlayerId::TWO).position().x, two);
    }

    #[test]
    fn test_lethal_hit_ends_match_on_same_step() {
        let mut session = close_session();
        let finisher = crate::element::AttackResult {
            damage: 132.0,
            knockback: Vec2::ZERO,
            hit_stun: 1.0,
        };
        session.fighter_mut(PlayerId::TWO).take_damage(&finisher);
        session.step(FRAME, IDLE);
        session.step(FRAME, IDLE);
        session.fighter_mut(PlayerId::TWO).body_mut().position.x = 470.0;
        assert_eq!(session.fighter(PlayerId::TWO).health(), 8.0);

        session.step(FRAME, [Intent::attack(), Intent::NONE]);
        let report = session.step(FRAME, IDLE);
        assert_eq!(report.outcome, Some(MatchOutcome::Winner(PlayerId::ONE)));
        assert!(session.fighter(PlayerId::TWO).is_defeated());
        assert_eq!(session.outcome(), Some(MatchOutcome::Winner(PlayerId::ONE)));

        let frame = session.frame();
        let after = session.step(FRAME, [Intent::right(), Intent::NONE]);
        assert_eq!(after.frame, frame);
        assert!(after.hits.is_empty());
    }

    #[test]
    fn test_double_defeat_is_a_draw() {
        let mut session = DuelSession::new(CombatConfig::default()).expect("valid config");
        let lethal = crate::element::AttackResult {
            damage: 1_000.0,
            knockback: Vec2::ZERO,
            hit_stun: 100.0,
        };
        session.fighter_mut(PlayerId::ONE).take_damage(&lethal);
        session.fighter_mut(PlayerId::TWO).take_damage(&lethal);
        assert_eq!(session.step(FRAME, IDLE).outcome, Some(MatchOutcome::Draw));
    }

    #[test]
    fn test_reset_round_restores_fighters() {
        let mut session = close_session();
        let log = EventLog::new();
        session.subscribe(PlayerId::TWO, Box::new(log.clone()));

        session.step(FRAME, [Intent::attack(), Intent::NONE]);
        session.step(FRAME, IDLE);
        session.reset_round();

        let two = session.fighter(PlayerId::TWO);
        assert_eq!(two.health(), two.max_health());
        assert_eq!(two.state_kind(), StateKind::Idle);
        assert_eq!(two.position(), spawn_position(session.config(), PlayerId::TWO));
        assert!(session.outcome().is_none());

        let changes = log.health_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].damage, 0.0);
    }

    #[test]
    fn test_invariants_hold_through_a_brawl() {
        let mut session = close_session();
        let script = [
            [Intent::attack(), Intent::NONE],
            [Intent::right(), Intent::left().with_attack()],
            [Intent::jump().with_attack(), Intent::switch_mode()],
            [Intent::switch_mode(), Intent::attack()],
            [Intent::left(), Intent::right()],
            [Intent::NONE, Intent::jump()],
        ];

        for frame in 0..600 {
            let intents = script[(frame / 7) % script.len()];
            session.step(FRAME, intents);
            assert_state_invariants(&session);
            if session.outcome().is_some() {
                break;
            }
        }
    }
}
