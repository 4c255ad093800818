//! # Brawl Engine
//!
//! Headless driver for Brawl duels.
//!
//! This crate ties the combat simulation to the outside world:
//! - Config: TOML engine settings wrapping the combat tunables
//! - Timing: fixed-step accumulator and frame pacing
//! - Script: frame-indexed intents for both players, stored as JSON
//! - Runner: steps a duel session to an outcome and summarizes it

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod runner;
pub mod script;
pub mod timing;

use brawl_common::{BrawlError, BrawlResult};

pub use config::{config_path_from_args, EngineConfig, CONFIG_FILE};
pub use runner::{MatchRunner, MatchSummary};
pub use script::{IntentScript, ScriptError, ScriptSegment};
pub use timing::FrameTiming;

impl From<ScriptError> for BrawlError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::Io { source, .. } => Self::Io(source),
            other => Self::Serialization(other.to_string()),
        }
    }
}

/// Script named by the config, or the built-in demo when none is set.
pub fn load_script(config: &EngineConfig) -> BrawlResult<IntentScript> {
    match &config.script {
        Some(path) => Ok(IntentScript::load(path)?),
        None => Ok(IntentScript::demo()),
    }
}

/// Builds a runner from a validated config and its script.
pub fn build_runner(config: &EngineConfig) -> BrawlResult<MatchRunner> {
    let script = load_script(config)?;
    Ok(MatchRunner::new(config, script)?)
}
