//! Bug Arena - A tile-based arcade dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map generation, enemies, collisions, game state)
//! - `render`: Renderer boundary and a plain-text board renderer
//! - `persistence`: JSON load/save for settings and high scores
//! - `settings`: Run configuration
//! - `highscores`: Leaderboard of levels reached

pub mod highscores;
pub mod persistence;
pub mod render;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (60 Hz, one display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield bounds (world units)
    pub const X_LEFT: f32 = 0.0;
    pub const X_RIGHT: f32 = 707.0;
    pub const Y_TOP: f32 = 0.0;
    pub const Y_BOTTOM: f32 = 498.0;

    /// Grid step sizes (world units per cell)
    pub const X_STEP: f32 = 101.0;
    pub const Y_STEP: f32 = 83.0;

    /// Logical grid
    pub const COLUMNS: i32 = 7;
    pub const ROWS: i32 = 6;

    /// Past this level the map turns dark and the game starts speeding up
    pub const DARK_LEVELS: u32 = 14;
    /// Upper bound for the global speed multiplier
    pub const MAX_SPEED_MULTIPLIER: f32 = 1.5;
    /// Multiplier gain per dark level
    pub const SPEED_MULTIPLIER_STEP: f32 = 0.05;

    /// Player defaults
    pub const PLAYER_START_LIVES: u8 = 3;
    pub const PLAYER_MAX_LIVES: u8 = 5;
}

/// Uniform integer in `[min, max]` (inclusive), returned as `f32`.
///
/// Speeds are tuned as whole numbers, so draws stay integral even though the
/// simulation runs in floats.
#[inline]
pub fn rand_int<R: Rng>(rng: &mut R, min: i32, max: i32) -> f32 {
    rng.random_range(min..=max) as f32
}

/// Random interval in seconds from a millisecond range
#[inline]
pub fn rand_interval<R: Rng>(rng: &mut R, min_ms: u32, max_ms: u32) -> f32 {
    rng.random_range(min_ms..=max_ms) as f32 / 1000.0
}
