//! # Brawl
//!
//! Runs one scripted duel headlessly and logs the result.
//!
//! Usage: `brawl [config.toml]` (defaults to `brawl.toml`). Set
//! `BRAWL_LOG_JSON=1` for JSON log lines.

use anyhow::Result;
use brawl_engine::{build_runner, config_path_from_args, EngineConfig, FrameTiming};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::from_default_env().add_directive("brawl=info".parse()?);
    if std::env::var_os("BRAWL_LOG_JSON").is_some() {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    info!("Brawl starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = EngineConfig::load_from(config_path_from_args(std::env::args()));
    config.validate();

    let mut runner = build_runner(&config)?;
    let summary = if config.realtime {
        runner.run_realtime(&mut FrameTiming::new(config.target_fps))
    } else {
        runner.run()
    };

    info!("Summary: {}", serde_json::to_string(&summary)?);
    info!("Brawl shutdown complete");
    Ok(())
}
