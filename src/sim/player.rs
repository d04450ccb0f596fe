//! Player controller and projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Hitbox};
use super::map::{Cell, Map, TileKind};
use super::state::Sprite;
use crate::consts::*;

pub const PLAYER_WIDTH: f32 = 60.0;
pub const PLAYER_HEIGHT: f32 = 80.0;
/// Transparent margin on the left of the player sprite
pub const PLAYER_INSET: f32 = 20.0;

pub const ATTACK_WIDTH: f32 = 20.0;
pub const ATTACK_HEIGHT: f32 = 80.0;
pub const ATTACK_SPEED: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Grid offset (columns, rows)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Which way a shot flies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aim {
    Left,
    Right,
}

/// Discrete commands from the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Pause,
    FireLeft,
    FireRight,
}

impl Command {
    /// Parse an input token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "left" => Some(Command::Move(Direction::Left)),
            "right" => Some(Command::Move(Direction::Right)),
            "up" => Some(Command::Move(Direction::Up)),
            "down" => Some(Command::Move(Direction::Down)),
            "pause" => Some(Command::Pause),
            "fire-left" => Some(Command::FireLeft),
            "fire-right" => Some(Command::FireRight),
            _ => None,
        }
    }
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub cell: Cell,
    pub width: f32,
    pub height: f32,
    pub lives: u8,
    pub max_lives: u8,
    pub has_key: bool,
}

impl Hitbox for Player {
    fn bounds(&self) -> Bounds {
        let pos = self.pos();
        Bounds {
            left: pos.x + PLAYER_INSET,
            right: pos.x + self.width,
            top: pos.y,
            bottom: pos.y + self.height,
        }
    }
}

impl Player {
    /// Fresh player standing on the map's start point
    pub fn new(map: &Map) -> Self {
        Self {
            cell: map.start.cell,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            lives: PLAYER_START_LIVES,
            max_lives: PLAYER_MAX_LIVES,
            has_key: false,
        }
    }

    /// Top-left corner in world units
    pub fn pos(&self) -> Vec2 {
        self.cell.to_world()
    }

    pub fn sprite(&self) -> Sprite {
        Sprite::Player
    }

    /// Back to the start point (lives and key untouched)
    pub fn reset_position(&mut self, map: &Map) {
        self.cell = map.start.cell;
    }

    /// Try to take one step
    ///
    /// The target must be a tile on the map, must not be a wall, must not
    /// hold a rock, and must not be the door unless the key is in hand.
    /// Returns whether the player moved; a rejected move changes nothing.
    pub fn step(&mut self, direction: Direction, map: &Map) -> bool {
        let (dcol, drow) = direction.delta();
        let target = self.cell.offset(dcol, drow);

        let Some(tile) = map.tile_at(target) else {
            return false;
        };
        let locked_door = map.is_door(target) && !self.has_key;
        let rock = map.has_rock(target);
        let wall = tile.kind == TileKind::Wall;

        if locked_door || rock || wall {
            return false;
        }
        self.cell = target;
        true
    }

    /// Gain a life, up to the cap
    pub fn add_life(&mut self) {
        if self.lives < self.max_lives {
            self.lives += 1;
        }
    }

    /// Spawn a bullet from the player's position
    pub fn fire(&self, id: u32, aim: Aim) -> Attack {
        let speed = match aim {
            Aim::Left => -ATTACK_SPEED,
            Aim::Right => ATTACK_SPEED,
        };
        Attack::new(id, self.pos(), speed)
    }
}

/// A bullet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Signed horizontal speed; zero once the bullet has left the field
    pub speed: f32,
    pub sprite: Sprite,
}

impl Hitbox for Attack {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

impl Attack {
    pub fn new(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            width: ATTACK_WIDTH,
            height: ATTACK_HEIGHT,
            speed,
            sprite: Sprite::Bullet,
        }
    }

    /// Fly; stop dead once past either edge
    pub fn update(&mut self, dt: f32, speed_mult: f32) {
        self.pos.x += dt * self.speed * speed_mult;
        if self.pos.x > X_RIGHT || self.pos.x < X_LEFT - X_STEP {
            self.speed = 0.0;
        }
    }

    /// Left the field and is waiting to be purged
    pub fn is_spent(&self) -> bool {
        self.speed == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::{MapObject, MapObjectKind, generate_map};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Player, Map) {
        let mut rng = Pcg32::seed_from_u64(2024);
        let map = generate_map(1, &mut rng);
        let player = Player::new(&map);
        (player, map)
    }

    #[test]
    fn test_starts_on_start_point() {
        let (player, map) = setup();
        assert_eq!(player.cell, map.start.cell);
        assert_eq!(player.lives, 3);
        assert!(!player.has_key);
    }

    #[test]
    fn test_step_up_from_start() {
        let (mut player, map) = setup();
        let start = player.cell;
        assert!(player.step(Direction::Up, &map));
        assert_eq!(player.cell, start.offset(0, -1));
    }

    #[test]
    fn test_no_step_off_map() {
        let (mut player, map) = setup();
        // Bottom row: nothing below
        assert!(!player.step(Direction::Down, &map));
        assert_eq!(player.cell, map.start.cell);

        player.cell = Cell::new(0, 2);
        assert!(!player.step(Direction::Left, &map));
        assert_eq!(player.cell, Cell::new(0, 2));

        player.cell = Cell::new(COLUMNS - 1, 2);
        assert!(!player.step(Direction::Right, &map));
    }

    #[test]
    fn test_isolated_position_never_moves() {
        let (mut player, map) = setup();
        let nowhere = Cell::new(40, 40);
        for direction in Direction::ALL {
            player.cell = nowhere;
            assert!(!player.step(direction, &map));
            assert_eq!(player.cell, nowhere);
        }
    }

    #[test]
    fn test_walls_block() {
        let (mut player, map) = setup();
        let col = if map.end.cell.col == 1 { 2 } else { 1 };
        player.cell = Cell::new(col, 1);
        assert!(!player.step(Direction::Up, &map));
        assert_eq!(player.cell, Cell::new(col, 1));
    }

    #[test]
    fn test_rocks_block() {
        let (mut player, mut map) = setup();
        map.rocks.push(MapObject::new(MapObjectKind::Rock, Cell::new(0, 2)));
        player.cell = Cell::new(1, 2);
        assert!(!player.step(Direction::Left, &map));
        assert!(player.step(Direction::Up, &map));
    }

    #[test]
    fn test_door_needs_key() {
        let (mut player, map) = setup();
        let below_door = map.end.cell.offset(0, 1);
        player.cell = below_door;
        assert!(!player.step(Direction::Up, &map));
        assert_eq!(player.cell, below_door);

        player.has_key = true;
        assert!(player.step(Direction::Up, &map));
        assert_eq!(player.cell, map.end.cell);
    }

    #[test]
    fn test_water_is_walkable() {
        // Stepping into water is allowed; the tick loop handles drowning
        let (mut player, map) = setup();
        let dir = if map.start.cell.col > 0 { Direction::Left } else { Direction::Right };
        assert!(player.step(dir, &map));
        assert_eq!(map.tile_at(player.cell).unwrap().kind, TileKind::Water);
    }

    #[test]
    fn test_life_cap() {
        let (mut player, _) = setup();
        for _ in 0..10 {
            player.add_life();
        }
        assert_eq!(player.lives, PLAYER_MAX_LIVES);
    }

    #[test]
    fn test_player_hitbox_inset() {
        let (mut player, _) = setup();
        player.cell = Cell::new(1, 2);
        let b = player.bounds();
        assert_eq!(b.left, 121.0);
        assert_eq!(b.right, 161.0);
        assert_eq!(b.top, 166.0);
        assert_eq!(b.bottom, 246.0);
    }

    #[test]
    fn test_fire_direction() {
        let (player, _) = setup();
        assert_eq!(player.fire(1, Aim::Left).speed, -ATTACK_SPEED);
        assert_eq!(player.fire(2, Aim::Right).speed, ATTACK_SPEED);
        assert_eq!(player.fire(3, Aim::Right).pos, player.pos());
    }

    #[test]
    fn test_attack_spent_off_field() {
        let mut attack = Attack::new(1, Vec2::new(X_RIGHT - 10.0, 83.0), ATTACK_SPEED);
        attack.update(0.01, 1.0);
        assert!(!attack.is_spent());
        attack.update(0.1, 1.0);
        assert!(attack.is_spent());

        let mut attack = Attack::new(2, Vec2::new(X_LEFT - X_STEP + 1.0, 83.0), -ATTACK_SPEED);
        attack.update(0.1, 1.0);
        assert!(attack.is_spent());
    }

    #[test]
    fn test_command_tokens() {
        assert_eq!(Command::from_token("up"), Some(Command::Move(Direction::Up)));
        assert_eq!(Command::from_token("fire-left"), Some(Command::FireLeft));
        assert_eq!(Command::from_token("pause"), Some(Command::Pause));
        assert_eq!(Command::from_token("jump"), None);
    }
}
