//! Run configuration
//!
//! Read from a JSON file next to the binary. Every field has a default, so a
//! partial file (or none at all) is fine.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Default settings file name
pub const SETTINGS_FILE: &str = "bug-arena.json";

/// Headless runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; the clock is used when absent
    pub seed: Option<u64>,
    /// Simulated seconds to run before stopping
    pub demo_seconds: f32,
    /// Let the autopilot drive the player
    pub autopilot: bool,
    /// Print the board every N ticks (0 = never)
    pub board_every_ticks: u64,
    /// Ticks a dialog stays up before the runner dismisses it
    pub dialog_ticks: u64,
    /// Pace the run against the wall clock instead of running flat out
    pub realtime: bool,
    /// Where the leaderboard lives
    pub highscores_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            demo_seconds: 120.0,
            autopilot: true,
            board_every_ticks: 600,
            dialog_ticks: 90,
            realtime: false,
            highscores_path: PathBuf::from("bug-arena-scores.json"),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// The configured seed, or one taken from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Total ticks to simulate at the fixed step
    pub fn demo_ticks(&self) -> u64 {
        (self.demo_seconds.max(0.0) / crate::consts::SIM_DT).round() as u64
    }
}
