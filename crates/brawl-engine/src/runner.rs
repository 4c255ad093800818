//! Match runner.
//!
//! Drives a [`DuelSession`] with scripted intents until one side wins or the
//! frame limit is reached.

use brawl_common::{ConfigError, PlayerId};
use brawl_gameplay::{DuelSession, FrameReport, MatchOutcome, TracingListener};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::script::IntentScript;
use crate::timing::FrameTiming;

/// Result of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Frames simulated
    pub frames: u64,
    /// How the match ended; None if the frame limit ran out first
    pub outcome: Option<MatchOutcome>,
    /// Final health of player one and player two
    pub health: [f32; 2],
    /// Hits landed by either player
    pub hits: usize,
}

/// Runs one scripted match.
#[derive(Debug)]
pub struct MatchRunner {
    session: DuelSession,
    script: IntentScript,
    max_frames: u64,
    fixed_dt_ms: f32,
    hits: usize,
}

impl MatchRunner {
    /// Creates a runner with a fresh session.
    pub fn new(config: &EngineConfig, script: IntentScript) -> Result<Self, ConfigError> {
        let mut session = DuelSession::new(config.combat.clone())?;
        for id in PlayerId::BOTH {
            session.subscribe(id, Box::new(TracingListener));
        }

        Ok(Self {
            session,
            script,
            max_frames: config.max_frames,
            fixed_dt_ms: config.fixed_dt_ms(),
            hits: 0,
        })
    }

    /// Simulates one frame of `dt_ms`.
    pub fn tick(&mut self, dt_ms: f32) -> FrameReport {
        let intents = self.script.intents_at(self.session.frame());
        let report = self.session.step(dt_ms, intents);

        for hit in &report.hits {
            info!(
                frame = report.frame,
                attacker = %hit.attacker,
                target = %hit.target,
                mode = hit.attacker_mode.name(),
                damage = hit.damage_taken,
                "hit"
            );
        }
        self.hits += report.hits.len();
        report
    }

    /// Whether the match has an outcome or ran out of frames.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.outcome().is_some() || self.session.frame() >= self.max_frames
    }

    /// Runs fixed steps back to back until finished.
    pub fn run(&mut self) -> MatchSummary {
        info!(max_frames = self.max_frames, "match started");
        while !self.is_finished() {
            self.tick(self.fixed_dt_ms);
        }
        self.finish()
    }

    /// Runs against the wall clock, sleeping between frames.
    pub fn run_realtime(&mut self, timing: &mut FrameTiming) -> MatchSummary {
        info!(
            max_frames = self.max_frames,
            fps = timing.target_fps(),
            "realtime match started"
        );
        timing.reset();
        while !self.is_finished() {
            let dt_ms = timing.delta_time_ms();
            for _ in 0..timing.accumulate(dt_ms) {
                self.tick(timing.fixed_dt_ms());
                if self.is_finished() {
                    break;
                }
            }
            timing.sleep_remainder();
        }
        if timing.dropped_ms() > 0.0 {
            debug!(dropped_ms = timing.dropped_ms(), "fell behind the wall clock");
        }
        self.finish()
    }

    /// Snapshot of the match so far.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            frames: self.session.frame(),
            outcome: self.session.outcome(),
            health: PlayerId::BOTH.map(|id| self.session.fighter(id).health()),
            hits: self.hits,
        }
    }

    /// The session being driven.
    #[must_use]
    pub fn session(&self) -> &DuelSession {
        &self.session
    }

    fn finish(&self) -> MatchSummary {
        let summary = self.summary();
        match summary.outcome {
            Some(outcome) => info!(frames = summary.frames, ?outcome, "match finished"),
            None => info!(frames = summary.frames, "frame limit reached without a winner"),
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptSegment;
    use brawl_gameplay::Intent;

    /// Walk in, then P1 swings every 30 frames while P2 stands still.
    fn beatdown() -> IntentScript {
        IntentScript {
            repeat: false,
            segments: [
                vec![ScriptSegment::new(40, Intent::right(), Intent::left())],
                (0..20)
                    .flat_map(|_| {
                        [
                            ScriptSegment::new(1, Intent::attack(), Intent::NONE),
                            ScriptSegment::new(29, Intent::right(), Intent::NONE),
                        ]
                    })
                    .collect(),
            ]
            .concat(),
        }
    }

    #[test]
    fn test_frame_limit_stops_idle_match() {
        let config = EngineConfig {
            max_frames: 30,
            ..Default::default()
        };
        let script = IntentScript {
            repeat: true,
            segments: vec![ScriptSegment::new(1, Intent::NONE, Intent::NONE)],
        };
        let mut runner = MatchRunner::new(&config, script).expect("valid config");

        let summary = runner.run();
        assert_eq!(summary.frames, 30);
        assert_eq!(summary.outcome, None);
        assert_eq!(summary.health, [100.0, 100.0]);
        assert_eq!(summary.hits, 0);
    }

    #[test]
    fn test_scripted_beatdown_produces_winner() {
        let config = EngineConfig::default();
        let mut runner = MatchRunner::new(&config, beatdown()).expect("valid config");

        let summary = runner.run();
        assert_eq!(summary.outcome, Some(MatchOutcome::Winner(PlayerId::ONE)));
        assert_eq!(summary.health[0], 100.0);
        assert_eq!(summary.health[1], 0.0);
        assert!(summary.hits >= 13);
        assert!(runner.is_finished());
    }

    #[test]
    fn test_tick_counts_hits() {
        let config = EngineConfig::default();
        let mut runner = MatchRunner::new(&config, beatdown()).expect("valid config");

        let mut landed = 0;
        for _ in 0..45 {
            landed += runner.tick(config.fixed_dt_ms()).hits.len();
        }
        assert_eq!(runner.summary().hits, landed);
        assert_eq!(runner.session().frame(), 45);
    }

    #[test]
    fn test_invalid_combat_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.combat.arena_width = 10.0;
        assert!(MatchRunner::new(&config, IntentScript::demo()).is_err());
    }

    #[test]
    fn test_realtime_run_respects_frame_limit() {
        let config = EngineConfig {
            max_frames: 3,
            target_fps: 240,
            ..Default::default()
        };
        let mut runner = MatchRunner::new(&config, IntentScript::demo()).expect("valid config");
        let mut timing = FrameTiming::new(config.target_fps);

        let summary = runner.run_realtime(&mut timing);
        assert_eq!(summary.frames, 3);
    }

    #[test]
    fn test_summary_serializes() {
        let config = EngineConfig {
            max_frames: 5,
            ..Default::default()
        };
        let mut runner = MatchRunner::new(&config, IntentScript::demo()).expect("valid config");
        let summary = runner.run();

        let json = serde_json::to_string(&summary).expect("serialize");
        let back: MatchSummary = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, summary);
    }
}
