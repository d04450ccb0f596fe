//! Presentation boundary
//!
//! The simulation never draws. A [`Renderer`] gets read-only access to the
//! world after each frame; [`TextRenderer`] is the plain-text one the
//! headless runner uses.

use std::io::{self, Write};

use crate::consts::*;
use crate::sim::{GamePhase, Hitbox, Sprite, World};

/// Anything that can present a world snapshot
pub trait Renderer {
    fn render(&mut self, world: &World) -> io::Result<()>;
}

/// Character for a sprite on the text board
pub fn glyph(sprite: Sprite) -> char {
    match sprite {
        Sprite::Bug => 'b',
        Sprite::Charger => 'c',
        Sprite::ChargerCharging => 'C',
        Sprite::Sidestepper => 's',
        Sprite::Backtracker => '>',
        Sprite::BacktrackerReverse => '<',
        Sprite::Slowpoke => 'w',
        Sprite::Centipede => 'x',
        Sprite::Player => '@',
        Sprite::Bullet => '*',
        Sprite::Key => 'K',
        Sprite::Heart => 'H',
        Sprite::Chest => 'G',
        Sprite::Grass => '.',
        Sprite::DeadGrass => ',',
        Sprite::Stone => ':',
        Sprite::DarkStone => ';',
        Sprite::Water => '~',
        Sprite::Lava => '^',
        Sprite::Wall => '#',
        Sprite::StartPoint => '_',
        Sprite::Door => 'D',
        Sprite::Rock => 'R',
    }
}

/// Row-major character grid, one char per cell
struct Board {
    cells: Vec<char>,
}

impl Board {
    fn new() -> Self {
        Self {
            cells: vec![' '; (COLUMNS * ROWS) as usize],
        }
    }

    /// Off-board positions are dropped (bugs spawn and wrap off screen)
    fn put(&mut self, col: i32, row: i32, ch: char) {
        if (0..COLUMNS).contains(&col) && (0..ROWS).contains(&row) {
            self.cells[(row * COLUMNS + col) as usize] = ch;
        }
    }

    fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(COLUMNS as usize)
            .map(|row| row.iter().collect())
    }
}

/// Status line shown above the board
pub fn compose_hud(world: &World) -> String {
    let phase = match world.phase {
        GamePhase::Intro => "intro",
        GamePhase::Playing => "playing",
        GamePhase::Paused => "paused",
        GamePhase::LevelTransition => "next level",
        GamePhase::Dying => "caught",
        GamePhase::GameOver => "game over",
    };
    format!(
        "Level {}  Lives {}/{}  Bullets {}  Key {}  Speed x{:.2}  [{}]",
        world.state.level,
        world.player.lives,
        world.player.max_lives,
        world.state.bullets,
        if world.player.has_key { "yes" } else { "no" },
        world.state.speed,
        phase
    )
}

/// Draw the world as text
///
/// Layers, bottom to top: tiles, map objects, items, bullets, bugs, player.
/// A bug covers as many cells as its width rounds to.
pub fn compose_board(world: &World) -> String {
    let mut board = Board::new();
    let dark = world.map.dark;

    for tile in &world.map.tiles {
        board.put(tile.cell.col, tile.cell.row, glyph(tile.sprite(dark)));
    }
    let door = world.map.end;
    board.put(door.cell.col, door.cell.row, glyph(door.sprite()));
    for rock in &world.map.rocks {
        board.put(rock.cell.col, rock.cell.row, glyph(rock.sprite()));
    }

    for item in &world.items {
        let mut ch = glyph(item.sprite());
        if item.fading {
            ch = ch.to_ascii_lowercase();
        }
        board.put(item.cell.col, item.cell.row, ch);
    }

    for attack in &world.attacks {
        let center = attack.pos.x + attack.width / 2.0;
        let col = (center / X_STEP).floor() as i32;
        let row = (attack.pos.y / Y_STEP).round() as i32;
        board.put(col, row, glyph(attack.sprite));
    }

    for enemy in &world.enemies {
        let bounds = enemy.bounds();
        let first = (bounds.left / X_STEP).round() as i32;
        let span = (enemy.width / X_STEP).round().max(1.0) as i32;
        let row = (enemy.pos.y / Y_STEP).round() as i32;
        for col in first..first + span {
            board.put(col, row, glyph(enemy.sprite));
        }
    }

    let player = world.player.cell;
    board.put(player.col, player.row, glyph(world.player.sprite()));

    let mut out = String::new();
    for line in board.lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Writes HUD, board and any open dialog to a text sink
pub struct TextRenderer<W: Write> {
    writer: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, world: &World) -> io::Result<()> {
        writeln!(self.writer, "{}", compose_hud(world))?;
        write!(self.writer, "{}", compose_board(world))?;
        if let Some(dialog) = world.dialog {
            writeln!(self.writer, "-- {} --", dialog.message().replace('\n', " / "))?;
        }
        self.writer.flush()
    }
}
