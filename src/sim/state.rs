//! Game state and core simulation types
//!
//! Run-wide counters, phases, dialogs and the events a tick reports back to
//! the host.

use serde::{Deserialize, Serialize};

use super::items::ItemKind;
use super::player::Aim;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Opening story and controls dialogs
    Intro,
    /// Active gameplay
    Playing,
    /// Pause dialog is up
    Paused,
    /// Building the next level (never observed between ticks)
    LevelTransition,
    /// Caught with lives to spare, waiting on the death dialog
    Dying,
    /// Out of lives, waiting on the game over dialog
    GameOver,
}

/// Run-wide counters shared by every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Mirrors whether a dialog is blocking play
    pub paused: bool,
    /// Current level (1-based)
    pub level: u32,
    /// Global speed multiplier applied to every moving entity
    pub speed: f32,
    /// Ammo for the player's gun
    pub bullets: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            paused: false,
            level: 1,
            speed: 1.0,
            bullets: 0,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the map uses the dark skins
    pub fn is_dark(&self) -> bool {
        self.level > DARK_LEVELS
    }

    /// Move to the next level, speeding the game up once it gets dark
    pub fn level_up(&mut self) {
        self.level += 1;
        if self.is_dark() && self.speed < MAX_SPEED_MULTIPLIER {
            self.speed = (self.speed + SPEED_MULTIPLIER_STEP).min(MAX_SPEED_MULTIPLIER);
        }
    }
}

/// Hands out entity IDs, unique for the life of a world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A blocking message the host must show and then dismiss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialog {
    Opening,
    Instructions,
    Paused,
    Caught,
    GameOver { level: u32 },
}

impl Dialog {
    pub fn message(&self) -> String {
        match self {
            Dialog::Opening => concat!(
                "Welcome, Gladiator, to Bug Arena!\n",
                "Two years ago, oxygen began spewing from the Arctic. ",
                "At first, all we noticed was better fuel efficiency and better growing plants. ",
                "Then... we got bigger bugs.\n",
                "Rules are simple: 1. Grab the key. 2. Don't get caught. 3. Escape!\n",
                "To keep things interesting, you get a gun but no bullets. ",
                "You might find some in the chests."
            )
            .to_string(),
            Dialog::Instructions => concat!(
                "Controls\n",
                "Move with the arrow keys. Shoot with A and D.\n",
                "Press P to pause the game and Enter to resume.\n",
                "Don't get caught by the bugs or fall in the water."
            )
            .to_string(),
            Dialog::Paused => "Game Paused\nPress Enter to resume.".to_string(),
            Dialog::Caught => "You got caught!".to_string(),
            Dialog::GameOver { level } => format!("You died\nYour Stats\nLevel: {level}"),
        }
    }
}

/// Sprite references handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Bug,
    Charger,
    ChargerCharging,
    Sidestepper,
    Backtracker,
    BacktrackerReverse,
    Slowpoke,
    Centipede,
    Player,
    Bullet,
    Key,
    Heart,
    Chest,
    Grass,
    DeadGrass,
    Stone,
    DarkStone,
    Water,
    Lava,
    Wall,
    StartPoint,
    Door,
    Rock,
}

impl Sprite {
    /// Asset path relative to the game's asset root
    pub fn path(&self) -> &'static str {
        match self {
            Sprite::Bug => "images/enemy-bug.png",
            Sprite::Charger => "images/charger.png",
            Sprite::ChargerCharging => "images/charger-charging.png",
            Sprite::Sidestepper => "images/sidestepper.png",
            Sprite::Backtracker => "images/backtracker.png",
            Sprite::BacktrackerReverse => "images/backtracker-reverse.png",
            Sprite::Slowpoke => "images/slowpoke.png",
            Sprite::Centipede => "images/centipede.png",
            Sprite::Player => "images/char-boy.png",
            Sprite::Bullet => "images/circle.png",
            Sprite::Key => "images/Key.png",
            Sprite::Heart => "images/Heart.png",
            Sprite::Chest => "images/chest.png",
            Sprite::Grass => "images/grass-block.png",
            Sprite::DeadGrass => "images/dead-grass-block.png",
            Sprite::Stone => "images/stone-block.png",
            Sprite::DarkStone => "images/dark-stone-block.png",
            Sprite::Water => "images/water-block.png",
            Sprite::Lava => "images/lava-block.png",
            Sprite::Wall => "images/Wall.png",
            Sprite::StartPoint => "images/nothing.png",
            Sprite::Door => "images/Door.png",
            Sprite::Rock => "images/Rock.png",
        }
    }
}

/// Events emitted during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DialogOpened(Dialog),
    DialogClosed(Dialog),
    AttackFired { aim: Aim },
    EnemyDestroyed { id: u32 },
    ItemCollected { kind: ItemKind },
    LifeLost { lives_left: u8 },
    GameOver { level: u32 },
    LevelStarted { level: u32 },
}
