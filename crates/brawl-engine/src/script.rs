//! Scripted player input.
//!
//! An [`IntentScript`] is an ordered list of segments, each holding one
//! intent per player for a number of frames. Scripts are stored as JSON:
//!
//! ```json
//! {
//!   "repeat": false,
//!   "segments": [
//!     { "frames": 40, "one": { "right": true }, "two": { "left": true } },
//!     { "frames": 1, "one": { "attack": true } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use brawl_gameplay::Intent;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors loading an intent script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// File could not be read
    #[error("Failed to read script {path}: {source}")]
    Io {
        /// Script location
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Contents are not a valid script
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    /// Script covers no frames
    #[error("Script has no frames")]
    Empty,
    /// Segment lengths add up to more frames than can be counted
    #[error("Script is too long: segment frame counts overflow")]
    TooLong,
}

/// Intents for both players held over a run of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSegment {
    /// Number of frames this segment lasts
    pub frames: u64,
    /// Player one's intent
    #[serde(default)]
    pub one: Intent,
    /// Player two's intent
    #[serde(default)]
    pub two: Intent,
}

impl ScriptSegment {
    /// Creates a segment.
    #[must_use]
    pub fn new(frames: u64, one: Intent, two: Intent) -> Self {
        Self { frames, one, two }
    }
}

/// Frame-indexed input for a whole match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntentScript {
    /// Loop back to the first segment after the last one
    #[serde(default)]
    pub repeat: bool,
    /// Segments in playback order
    pub segments: Vec<ScriptSegment>,
}

impl IntentScript {
    /// Parses a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(json)?;
        match script.checked_total_frames() {
            None => Err(ScriptError::TooLong),
            Some(0) => Err(ScriptError::Empty),
            Some(_) => Ok(script),
        }
    }

    /// Loads a script file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json(&json)?;
        info!(
            "Loaded script from {} ({} frames)",
            path.display(),
            script.total_frames()
        );
        Ok(script)
    }

    /// Serializes the script as pretty JSON.
    pub fn to_json(&self) -> Result<String, ScriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A looping exchange: close the gap, trade swings, switch modes, back off.
    #[must_use]
    pub fn demo() -> Self {
        let none = Intent::NONE;
        Self {
            repeat: true,
            segments: vec![
                ScriptSegment::new(40, Intent::right(), Intent::left()),
                ScriptSegment::new(1, Intent::attack(), none),
                ScriptSegment::new(30, none, none),
                ScriptSegment::new(1, none, Intent::switch_mode()),
                ScriptSegment::new(1, Intent::attack(), Intent::attack()),
                ScriptSegment::new(30, none, none),
                ScriptSegment::new(1, Intent::switch_mode(), Intent::jump()),
                ScriptSegment::new(20, Intent::left(), Intent::right()),
            ],
        }
    }

    /// Frames covered by one pass through the segments, saturating at `u64::MAX`.
    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.checked_total_frames().unwrap_or(u64::MAX)
    }

    /// Frames covered by one pass, or None if the count overflows.
    #[must_use]
    pub fn checked_total_frames(&self) -> Option<u64> {
        self.segments
            .iter()
            .try_fold(0u64, |total, segment| total.checked_add(segment.frames))
    }

    /// Intents for both players on `frame` (zero-based).
    ///
    /// Past the end of a non-repeating script both players do nothing.
    #[must_use]
    pub fn intents_at(&self, frame: u64) -> [Intent; 2] {
        let total = self.total_frames();
        if total == 0 {
            return [Intent::NONE; 2];
        }

        let mut remaining = if self.repeat { frame % total } else { frame };
        for segment in &self.segments {
            if remaining < segment.frames {
                return [segment.one, segment.two];
            }
            remaining -= segment.frames;
        }
        [Intent::NONE; 2]
    }
}
