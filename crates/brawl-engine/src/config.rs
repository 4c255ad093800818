//! Engine configuration.
//!
//! Holds the combat tunables plus driver settings (frame rate, frame limit,
//! intent script). Configuration can be loaded from and saved to a TOML file.

use brawl_gameplay::CombatConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "brawl.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Driver Settings ===
    /// Simulation rate; one fixed step is `1000 / target_fps` ms
    pub target_fps: u32,
    /// Frame limit for a match that never produces a winner
    pub max_frames: u64,
    /// Pace frames against the wall clock instead of running flat out
    pub realtime: bool,
    /// JSON intent script (None = built-in demo)
    pub script: Option<PathBuf>,

    // === Combat Settings ===
    /// Combat tunables
    pub combat: CombatConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frames: 3_600, // one minute at 60 fps
            realtime: false,
            script: None,
            combat: CombatConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `brawl.toml` in the working directory.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp driver settings and fall back to default combat tunables if
    /// the loaded ones are unusable.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(10, 240);
        self.max_frames = self.max_frames.max(1);

        if let Err(e) = self.combat.validate() {
            warn!("Invalid combat settings ({e}), using defaults");
            self.combat = CombatConfig::default();
        }
    }

    /// Length of one fixed simulation step.
    #[must_use]
    pub fn fixed_dt_ms(&self) -> f32 {
        1000.0 / self.target_fps.max(1) as f32
    }
}

/// Config path from the command line: the first argument, or `brawl.toml`.
pub fn config_path_from_args<I>(args: I) -> PathBuf
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
}
