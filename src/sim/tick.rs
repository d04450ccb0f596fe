//! Fixed timestep simulation tick
//!
//! One call advances the world by `dt` seconds in this order:
//! 1. Dismiss the current dialog if the host asked to
//! 2. Behavior timers and item lifetimes (everything but the intro)
//! 3. Enemy and bullet movement (only while playing)
//! 4. Purge expired items and spent bullets
//! 5. Player commands (and the autopilot, in demo mode)
//! 6. Collisions, then pickups, then the doorway check (only while playing)

use std::collections::{HashMap, VecDeque};

use super::collision::{Bounds, Hitbox, overlaps};
use super::items::ItemKind;
use super::map::{Cell, TileKind};
use super::player::{Command, Direction};
use super::state::{GameEvent, GamePhase};
use super::world::World;
use crate::consts::*;

/// Ticks between autopilot decisions
const AUTOPILOT_PERIOD: u64 = 10;
/// How far ahead, in seconds, the autopilot projects each bug
const AUTOPILOT_LOOKAHEAD: f32 = 0.6;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands in arrival order
    pub commands: Vec<Command>,
    /// Acknowledge the dialog on screen
    pub dismiss_dialog: bool,
    /// Demo mode - the autopilot plays the game
    pub autopilot: bool,
}

impl TickInput {
    pub fn command(command: Command) -> Self {
        Self {
            commands: vec![command],
            ..Default::default()
        }
    }

    pub fn dismiss() -> Self {
        Self {
            dismiss_dialog: true,
            ..Default::default()
        }
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if input.dismiss_dialog {
        world.dismiss_dialog();
    }

    if world.phase != GamePhase::Intro {
        world.update_timers(dt);
    }
    if world.is_playing() {
        world.update_movement(dt);
    }
    world.purge();

    for &command in &input.commands {
        world.handle_input(command);
    }
    if input.autopilot && world.is_playing() {
        if let Some(command) = autopilot_command(world) {
            world.handle_input(command);
        }
    }

    // A lost life ends the pass; the level has already been reset
    if world.is_playing() && !world.resolve_collisions() {
        world.collect_pickups();
        world.check_level_complete();
    }

    world.time_ticks += 1;
    world.take_events()
}

/// Pick the autopilot's move for this tick
///
/// Shoots a bug closing in along the player's lane when it has ammo,
/// otherwise walks the shortest dry path to the key (then the door), waiting
/// in place while the next cell is about to be swept by a bug.
fn autopilot_command(world: &World) -> Option<Command> {
    if world.time_ticks % AUTOPILOT_PERIOD != 0 {
        return None;
    }

    if world.state.bullets > 0 {
        if let Some(command) = lane_threat(world) {
            return Some(command);
        }
    }

    let here = world.player.cell;
    let next = autopilot_goal(world).and_then(|goal| first_step(world, goal));
    if let Some(direction) = next {
        let (dcol, drow) = direction.delta();
        if is_safe(world, here.offset(dcol, drow)) {
            return Some(Command::Move(direction));
        }
    }
    if is_safe(world, here) {
        return None;
    }

    // Standing in a bug's path: dodge anywhere dry
    Direction::ALL
        .into_iter()
        .find(|&direction| {
            let mut probe = world.player.clone();
            probe.step(direction, &world.map) && !is_water(world, probe.cell) && is_safe(world, probe.cell)
        })
        .map(Command::Move)
}

fn autopilot_goal(world: &World) -> Option<Cell> {
    if world.player.has_key {
        return Some(world.map.end.cell);
    }
    world
        .items
        .iter()
        .find(|item| item.kind == ItemKind::Key)
        .map(|item| item.cell)
}

fn is_water(world: &World, cell: Cell) -> bool {
    world
        .map
        .tile_at(cell)
        .is_some_and(|tile| tile.kind == TileKind::Water)
}

/// First move along the shortest walkable, dry path to `goal`
fn first_step(world: &World, goal: Cell) -> Option<Direction> {
    let start = world.player.cell;
    if start == goal {
        return None;
    }

    let mut first: HashMap<Cell, Direction> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for direction in Direction::ALL {
            let mut probe = world.player.clone();
            probe.cell = cell;
            if !probe.step(direction, &world.map) {
                continue;
            }
            let next = probe.cell;
            if next == start || first.contains_key(&next) || is_water(world, next) {
                continue;
            }
            let via = first.get(&cell).copied().unwrap_or(direction);
            if next == goal {
                return Some(via);
            }
            first.insert(next, via);
            queue.push_back(next);
        }
    }
    None
}

/// No bug will sweep through `cell` within the lookahead window
fn is_safe(world: &World, cell: Cell) -> bool {
    let mut probe = world.player.clone();
    probe.cell = cell;
    let me = probe.bounds();

    world.enemies.iter().all(|enemy| {
        let b = enemy.bounds();
        let reach = enemy.speed * world.state.speed * AUTOPILOT_LOOKAHEAD;
        let swept = Bounds {
            left: b.left.min(b.left + reach),
            right: b.right.max(b.right + reach),
            top: b.top,
            bottom: b.bottom,
        };
        !overlaps(&swept, &me)
    })
}

/// A bug in the player's lane, closing in from less than two cells away
fn lane_threat(world: &World) -> Option<Command> {
    let me = world.player.bounds();
    world
        .enemies
        .iter()
        .map(|enemy| (enemy, enemy.bounds()))
        .filter(|(_, b)| b.top < me.bottom && b.bottom > me.top)
        .find_map(|(enemy, b)| {
            if b.right <= me.left && enemy.speed > 0.0 && me.left - b.right < 2.0 * X_STEP {
                Some(Command::FireLeft)
            } else if b.left >= me.right && enemy.speed < 0.0 && b.left - me.right < 2.0 * X_STEP {
                Some(Command::FireRight)
            } else {
                None
            }
        })
}
