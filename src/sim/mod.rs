//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod items;
pub mod map;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Bounds, Hitbox, overlaps};
pub use enemy::{Behavior, Enemy, EnemyKind};
pub use items::{GEM_DESTROY_SECS, GEM_FADE_SECS, Item, ItemKind, item_pool, place_items};
pub use map::{Cell, Map, MapObject, MapObjectKind, Tile, TileKind, generate_map};
pub use player::{Aim, Attack, Command, Direction, Player};
pub use spawner::{WeightTable, enemy_count, spawn_enemies};
pub use state::{Dialog, EntityIds, GameEvent, GamePhase, GameState, Sprite};
pub use tick::{TickInput, tick};
pub use world::World;
