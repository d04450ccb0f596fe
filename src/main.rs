//! Bug Arena entry point
//!
//! Headless runner: loads settings, plays a seeded run (optionally with the
//! autopilot at the controls), prints the board now and then and records
//! finished runs on the leaderboard.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use bug_arena::consts::*;
use bug_arena::render::{Renderer, TextRenderer};
use bug_arena::settings::SETTINGS_FILE;
use bug_arena::sim::{GameEvent, TickInput, World, tick};
use bug_arena::{HighScores, Settings};

/// Wall-clock pacing for real-time runs
struct FrameClock {
    accumulator: f32,
    last: Instant,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            accumulator: 0.0,
            last: Instant::now(),
        }
    }

    /// Fixed steps owed since the last call
    fn steps(&mut self) -> u32 {
        let now = Instant::now();
        self.accumulator += now.duration_since(self.last).as_secs_f32();
        self.last = now;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop what we couldn't catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::DialogOpened(dialog) => log::debug!("Dialog: {:?}", dialog),
        GameEvent::LifeLost { lives_left } => log::info!("Caught! {} lives left", lives_left),
        GameEvent::GameOver { level } => log::info!("Run over on level {}", level),
        GameEvent::LevelStarted { level } => log::info!("Reached level {}", level),
        GameEvent::ItemCollected { kind } => log::debug!("Collected {:?}", kind),
        _ => log::trace!("{:?}", event),
    }
}

fn main() {
    env_logger::init();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings = Settings::load(&settings_path);
    if !settings_path.exists() {
        if let Err(e) = settings.save(&settings_path) {
            log::warn!("Could not write default settings: {}", e);
        }
    }

    let seed = settings.resolve_seed();
    log::info!("Bug Arena (headless) starting, seed {}", seed);

    let mut world = World::new(seed);
    let mut scores = HighScores::load(&settings.highscores_path);
    let mut renderer = TextRenderer::new(io::stdout().lock());
    let mut clock = FrameClock::new();

    let total_ticks = settings.demo_ticks();
    let mut input = TickInput {
        autopilot: settings.autopilot,
        ..Default::default()
    };
    let mut dialog_age = 0;
    let mut runs_recorded = 0;

    while world.time_ticks < total_ticks {
        let steps = if settings.realtime { clock.steps() } else { 1 };

        for _ in 0..steps {
            input.dismiss_dialog = false;
            if world.dialog.is_some() {
                dialog_age += 1;
                if dialog_age >= settings.dialog_ticks {
                    input.dismiss_dialog = true;
                    dialog_age = 0;
                }
            } else {
                dialog_age = 0;
            }

            for event in tick(&mut world, &input, SIM_DT) {
                log_event(&event);
                if let GameEvent::GameOver { level } = event {
                    if let Some(rank) = scores.add_run(level, seed, unix_now()) {
                        log::info!("New high score: level {} (rank {})", level, rank);
                    }
                    runs_recorded += 1;
                }
            }

            let every = settings.board_every_ticks;
            if every > 0 && world.time_ticks % every == 0 {
                if let Err(e) = renderer.render(&world) {
                    log::warn!("Render failed: {}", e);
                }
            }
        }

        if settings.realtime {
            std::thread::sleep(Duration::from_millis(4));
        }
    }

    if let Err(e) = renderer.render(&world) {
        log::warn!("Render failed: {}", e);
    }
    log::info!(
        "Stopped after {} ticks on level {} ({} finished runs)",
        world.time_ticks,
        world.state.level,
        runs_recorded
    );

    if runs_recorded > 0 {
        if let Err(e) = scores.save(&settings.highscores_path) {
            log::error!("Failed to save high scores: {}", e);
        }
    }
    if let Some(best) = scores.best_level() {
        log::info!("Best level on record: {}", best);
    }
}
