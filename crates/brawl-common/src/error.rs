//! Error types for Brawl.
//!
//! The simulation core has no recoverable failures of its own: illegal player
//! actions are silent no-ops. Errors only exist at the edges, where tunables
//! and scripts enter from outside.

use thiserror::Error;

/// Top-level error type for Brawl operations.
#[derive(Debug, Error)]
pub enum BrawlError {
    /// Invalid combat configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Combat configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive was not
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive {
        /// Name of the offending field
        field: &'static str,
        /// Value found
        value: f32,
    },

    /// A value fell outside its allowed range
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// Value found
        value: f32,
        /// Inclusive lower bound
        min: f32,
        /// Inclusive upper bound
        max: f32,
    },

    /// The arena is too narrow for both combatants to spawn
    #[error("arena width {arena_width} cannot fit two combatants of width {character_width} with margin {spawn_margin}")]
    ArenaTooNarrow {
        /// Configured arena width
        arena_width: f32,
        /// Configured character width
        character_width: f32,
        /// Configured spawn margin
        spawn_margin: f32,
    },
}

/// Result type alias for Brawl operations.
pub type BrawlResult<T> = Result<T, BrawlError>;
