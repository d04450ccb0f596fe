//! Enemy roster generation
//!
//! Early levels are all basic bugs. From level 6 on, each level past the
//! second shifts five points of weight away from the basic bug, one point to
//! each special variant, until the basic bug runs out of weight.

use rand::Rng;

use super::enemy::{Enemy, EnemyKind};
use super::state::EntityIds;

/// Levels at or below this only spawn basic bugs
pub const BASIC_ONLY_LEVELS: u32 = 5;
/// Past this level the roster size stops growing
pub const MAX_ENEMY_LEVEL: u32 = 25;
pub const MAX_ENEMIES: usize = 8;

/// Weight shifted off the basic bug per level step (hundredths)
const BASIC_STEP: u32 = 5;
/// Weight gained by each special variant per level step (hundredths)
const SPECIAL_STEP: u32 = 1;

/// Per-variant spawn weights, in hundredths so every step stays exact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightTable {
    percents: [u32; EnemyKind::COUNT],
}

impl WeightTable {
    /// Weights for a level
    pub fn for_level(level: u32) -> Self {
        let mut percents = [0u32; EnemyKind::COUNT];
        percents[EnemyKind::Basic as usize] = 100;

        if level > BASIC_ONLY_LEVELS {
            for _ in 0..level.saturating_sub(2) {
                if percents[EnemyKind::Basic as usize] == 0 {
                    break;
                }
                for kind in EnemyKind::ALL {
                    let slot = &mut percents[kind as usize];
                    if kind == EnemyKind::Basic {
                        *slot = slot.saturating_sub(BASIC_STEP);
                    } else {
                        *slot += SPECIAL_STEP;
                    }
                }
            }
        }

        Self { percents }
    }

    pub fn from_percents(percents: [u32; EnemyKind::COUNT]) -> Self {
        Self { percents }
    }

    /// Weight in hundredths
    pub fn percent(&self, kind: EnemyKind) -> u32 {
        self.percents[kind as usize]
    }

    /// Weight as a fraction of one
    pub fn weight(&self, kind: EnemyKind) -> f64 {
        self.percent(kind) as f64 / 100.0
    }

    pub fn total_percent(&self) -> u32 {
        self.percents.iter().sum()
    }

    /// Expand into a draw list: one copy of each variant per hundredth of weight
    pub fn pool(&self) -> Vec<EnemyKind> {
        EnemyKind::ALL
            .iter()
            .flat_map(|&kind| std::iter::repeat_n(kind, self.percent(kind) as usize))
            .collect()
    }

    /// Draw one variant; an all-zero table always yields the basic bug
    pub fn choose<R: Rng>(&self, pool: &[EnemyKind], rng: &mut R) -> EnemyKind {
        if pool.is_empty() {
            return EnemyKind::Basic;
        }
        pool[rng.random_range(0..pool.len())]
    }
}

/// How many enemies a level gets
pub fn enemy_count(level: u32) -> usize {
    if level > MAX_ENEMY_LEVEL {
        MAX_ENEMIES
    } else {
        2 + (level / 5) as usize
    }
}

/// Build the enemy roster for a level
pub fn spawn_enemies<R: Rng>(level: u32, rng: &mut R, ids: &mut EntityIds) -> Vec<Enemy> {
    let table = WeightTable::for_level(level);
    let pool = table.pool();
    let count = enemy_count(level);

    let enemies: Vec<Enemy> = (0..count)
        .map(|_| {
            let kind = table.choose(&pool, rng);
            Enemy::new(ids.allocate(), kind, rng)
        })
        .collect();

    log::debug!(
        "Level {} roster: {:?}",
        level,
        enemies.iter().map(Enemy::kind).collect::<Vec<_>>()
    );
    enemies
}
