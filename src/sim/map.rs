//! Procedural map generation
//!
//! Every level is the same 7×6 grid: a wall-lined top row with a single gap
//! under the door, two grass rows around two stone rows, and a water row at
//! the bottom broken only by the start tile. Only the start/door columns and
//! the rocks change between levels.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Sprite;
use crate::consts::*;

/// Rocks start showing up above this level
pub const ROCK_LEVEL: u32 = 9;

/// A grid cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Top-left corner of the cell in world units
    pub fn to_world(self) -> Vec2 {
        Vec2::new(self.col as f32 * X_STEP, self.row as f32 * Y_STEP)
    }

    pub fn offset(self, dcol: i32, drow: i32) -> Self {
        Self::new(self.col + dcol, self.row + drow)
    }

    /// Within one step on both axes (includes the cell itself)
    pub fn is_adjacent(self, other: Cell) -> bool {
        (self.col - other.col).abs() <= 1 && (self.row - other.row).abs() <= 1
    }
}

/// Tile behavior class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Stone,
    /// Lethal to the player
    Water,
    /// Blocks movement
    Wall,
}

/// One background cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub cell: Cell,
}

impl Tile {
    pub fn new(kind: TileKind, cell: Cell) -> Self {
        Self { kind, cell }
    }

    /// Water and walls never hold items, rocks or a standing player
    pub fn is_open(&self) -> bool {
        !matches!(self.kind, TileKind::Water | TileKind::Wall)
    }

    pub fn sprite(&self, dark: bool) -> Sprite {
        match (self.kind, dark) {
            (TileKind::Grass, false) => Sprite::Grass,
            (TileKind::Grass, true) => Sprite::DeadGrass,
            (TileKind::Stone, false) => Sprite::Stone,
            (TileKind::Stone, true) => Sprite::DarkStone,
            (TileKind::Water, false) => Sprite::Water,
            (TileKind::Water, true) => Sprite::Lava,
            (TileKind::Wall, _) => Sprite::Wall,
        }
    }
}

/// Placed map features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapObjectKind {
    StartPoint,
    /// Needs the key to be crossed
    Door,
    /// Blocks movement
    Rock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    pub kind: MapObjectKind,
    pub cell: Cell,
}

impl MapObject {
    pub fn new(kind: MapObjectKind, cell: Cell) -> Self {
        Self { kind, cell }
    }

    pub fn sprite(&self) -> Sprite {
        match self.kind {
            MapObjectKind::StartPoint => Sprite::StartPoint,
            MapObjectKind::Door => Sprite::Door,
            MapObjectKind::Rock => Sprite::Rock,
        }
    }
}

/// A generated level layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    /// Row-major, top row first
    pub tiles: Vec<Tile>,
    pub start: MapObject,
    pub end: MapObject,
    pub rocks: Vec<MapObject>,
    /// Dark skins (past the dark levels threshold)
    pub dark: bool,
}

impl Map {
    pub fn tile_at(&self, cell: Cell) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.cell == cell)
    }

    pub fn has_rock(&self, cell: Cell) -> bool {
        self.rocks.iter().any(|r| r.cell == cell)
    }

    pub fn is_door(&self, cell: Cell) -> bool {
        self.end.cell == cell
    }
}

/// Build the tile grid for the given start/door columns
fn build_tiles(start_col: i32, end_col: i32) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity((COLUMNS * ROWS) as usize);
    for row in 0..ROWS {
        for col in 0..COLUMNS {
            let kind = match row {
                0 if col == end_col => TileKind::Stone,
                0 => TileKind::Wall,
                1 | 4 => TileKind::Grass,
                2 | 3 => TileKind::Stone,
                _ if col == start_col => TileKind::Stone,
                _ => TileKind::Water,
            };
            tiles.push(Tile::new(kind, Cell::new(col, row)));
        }
    }
    tiles
}

/// Generate the map for a level
///
/// Start and door columns are drawn from the four inner columns. Above
/// [`ROCK_LEVEL`], one to three rocks are dropped onto distinct open tiles
/// outside the start and door columns.
pub fn generate_map<R: Rng>(level: u32, rng: &mut R) -> Map {
    let start_col = rng.random_range(1..=4);
    let end_col = rng.random_range(1..=4);

    let tiles = build_tiles(start_col, end_col);
    let start = MapObject::new(MapObjectKind::StartPoint, Cell::new(start_col, ROWS - 1));
    let end = MapObject::new(MapObjectKind::Door, Cell::new(end_col, 0));

    let mut rocks = Vec::new();
    if level > ROCK_LEVEL {
        let rock_count = rng.random_range(1..=3);
        let mut pool: Vec<Cell> = tiles
            .iter()
            .filter(|t| t.is_open() && t.cell.col != start_col && t.cell.col != end_col)
            .map(|t| t.cell)
            .collect();

        for _ in 0..rock_count {
            if pool.is_empty() {
                break;
            }
            let idx = rng.random_range(0..pool.len());
            let cell = pool.remove(idx);
            rocks.push(MapObject::new(MapObjectKind::Rock, cell));
        }
        log::debug!("Level {} rocks: {:?}", level, rocks.iter().map(|r| r.cell).collect::<Vec<_>>());
    }

    Map {
        tiles,
        start,
        end,
        rocks,
        dark: level > DARK_LEVELS,
    }
}
