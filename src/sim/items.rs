//! Collectible items and their placement

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::map::{Cell, Map};
use super::state::{EntityIds, Sprite};

/// Seconds until a chest starts fading
pub const GEM_FADE_SECS: f32 = 2.5;
/// Seconds until a chest disappears
pub const GEM_DESTROY_SECS: f32 = GEM_FADE_SECS + 1.5;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Unlocks the door
    Key,
    /// Extra life, up to the cap
    Heart,
    /// Chest holding one bullet; expires on its own
    Gem,
}

/// An item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub cell: Cell,
    /// Marked for removal at the next purge
    pub destroyed: bool,
    /// Gem only: drawn half transparent once set
    pub fading: bool,
    /// Seconds since creation
    pub age: f32,
}

impl Item {
    pub fn new(id: u32, kind: ItemKind, cell: Cell) -> Self {
        Self {
            id,
            kind,
            cell,
            destroyed: false,
            fading: false,
            age: 0.0,
        }
    }

    /// Advance the item's lifetime clock
    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        if self.kind == ItemKind::Gem {
            if self.age >= GEM_FADE_SECS {
                self.fading = true;
            }
            if self.age >= GEM_DESTROY_SECS {
                self.destroyed = true;
            }
        }
    }

    pub fn sprite(&self) -> Sprite {
        match self.kind {
            ItemKind::Key => Sprite::Key,
            ItemKind::Heart => Sprite::Heart,
            ItemKind::Gem => Sprite::Chest,
        }
    }
}

/// Cells an item may be dropped on
///
/// Open tiles only, never the start or door cell, and nothing next to a rock.
pub fn item_pool(map: &Map) -> Vec<Cell> {
    map.tiles
        .iter()
        .filter(|t| t.is_open())
        .map(|t| t.cell)
        .filter(|&cell| cell != map.start.cell && cell != map.end.cell)
        .filter(|&cell| !map.rocks.iter().any(|rock| rock.cell.is_adjacent(cell)))
        .collect()
}

/// Draw one cell out of the pool so later items can't land on it
fn take_cell<R: Rng>(pool: &mut Vec<Cell>, rng: &mut R) -> Option<Cell> {
    if pool.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..pool.len());
    Some(pool.remove(idx))
}

/// Scatter the level's items
///
/// Always a key and a chest; every fifth level there is a coin-flip chance of
/// a heart.
pub fn place_items<R: Rng>(map: &Map, level: u32, rng: &mut R, ids: &mut EntityIds) -> Vec<Item> {
    let mut pool = item_pool(map);
    let mut items = Vec::with_capacity(3);

    for kind in [ItemKind::Key, ItemKind::Gem] {
        if let Some(cell) = take_cell(&mut pool, rng) {
            items.push(Item::new(ids.allocate(), kind, cell));
        }
    }

    if level % 5 == 0 && rng.random::<f64>() > 0.5 {
        if let Some(cell) = take_cell(&mut pool, rng) {
            items.push(Item::new(ids.allocate(), ItemKind::Heart, cell));
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::{MapObject, MapObjectKind, generate_map};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_gem_lifetime() {
        let mut gem = Item::new(1, ItemKind::Gem, Cell::new(1, 1));
        let dt = 0.25;
        // 2.25s
        for _ in 0..9 {
            gem.update(dt);
        }
        assert!(!gem.fading);

        // 2.5s
        gem.update(dt);
        assert!(gem.fading);
        assert!(!gem.destroyed);

        // 3.75s
        for _ in 0..5 {
            gem.update(dt);
        }
        assert!(!gem.destroyed);

        // 4.0s
        gem.update(dt);
        assert!(gem.destroyed);
    }

    #[test]
    fn test_key_never_expires() {
        let mut key = Item::new(1, ItemKind::Key, Cell::new(1, 1));
        key.update(60.0);
        assert!(!key.destroyed);
        assert!(!key.fading);
    }

    #[test]
    fn test_pool_excludes_rock_neighbors() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut map = generate_map(1, &mut rng);
        map.rocks.push(MapObject::new(MapObjectKind::Rock, Cell::new(3, 2)));

        let pool = item_pool(&map);
        for col in 2..=4 {
            for row in 1..=3 {
                assert!(!pool.contains(&Cell::new(col, row)));
            }
        }
        assert!(pool.contains(&Cell::new(0, 2)));
        assert!(pool.contains(&Cell::new(3, 4)));
    }

    #[test]
    fn test_key_and_gem_always_placed() {
        for seed in 0..100 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let map = generate_map(12, &mut rng);
            let items = place_items(&map, 12, &mut rng, &mut EntityIds::default());
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].kind, ItemKind::Key);
            assert_eq!(items[1].kind, ItemKind::Gem);
            assert_ne!(items[0].cell, items[1].cell);
        }
    }

    #[test]
    fn test_hearts_only_every_fifth_level() {
        let mut hearts = 0;
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let map = generate_map(5, &mut rng);
            let items = place_items(&map, 5, &mut rng, &mut EntityIds::default());
            hearts += items.iter().filter(|i| i.kind == ItemKind::Heart).count();

            let map = generate_map(6, &mut rng);
            let items = place_items(&map, 6, &mut rng, &mut EntityIds::default());
            assert!(items.iter().all(|i| i.kind != ItemKind::Heart));
        }
        // Coin flip: should land well inside (0, 200)
        assert!(hearts > 50 && hearts < 150, "hearts = {hearts}");
    }

    proptest! {
        #[test]
        fn pool_never_holds_start_end_or_rock_neighbors(seed in any::<u64>(), level in 1u32..40) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let map = generate_map(level, &mut rng);
            let pool = item_pool(&map);

            prop_assert!(!pool.contains(&map.start.cell));
            prop_assert!(!pool.contains(&map.end.cell));
            for cell in &pool {
                prop_assert!(map.tile_at(*cell).unwrap().is_open());
                for rock in &map.rocks {
                    prop_assert!(!rock.cell.is_adjacent(*cell));
                }
            }

            let items = place_items(&map, level, &mut rng, &mut EntityIds::default());
            for (i, a) in items.iter().enumerate() {
                prop_assert!(pool.contains(&a.cell));
                for b in &items[i + 1..] {
                    prop_assert_ne!(a.cell, b.cell);
                }
            }
        }
    }
}
