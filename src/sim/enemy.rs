//! Enemy variants and their per-tick behavior
//!
//! Every bug drifts right across the arena and wraps back to the offscreen
//! spawn column. Some variants also roll for a special move on their own
//! recurring timer:
//! - Charger: short speed spike
//! - Sidestepper: hop one row up or down
//! - Backtracker: turn around (and bounce off the far edges instead of wrapping)
//!
//! Timers count down in [`Enemy::update_timers`], which keeps running while
//! the game is paused. Movement in [`Enemy::update`] does not.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Hitbox};
use super::state::Sprite;
use crate::consts::*;
use crate::{rand_int, rand_interval};

pub const ENEMY_WIDTH: f32 = 90.0;
pub const ENEMY_HEIGHT: f32 = 80.0;
pub const CENTIPEDE_WIDTH: f32 = ENEMY_WIDTH * 3.0;

pub const MIN_SPEED: i32 = 50;
pub const MAX_SPEED: i32 = 200;
pub const SLOWPOKE_MIN_SPEED: i32 = 15;
pub const SLOWPOKE_MAX_SPEED: i32 = 25;

/// Spawn columns, from three cells offscreen to the second-to-last column
pub const SPAWN_COLUMNS: std::ops::RangeInclusive<i32> = -3..=4;
/// Enemy lanes (the rows between the wall and the water)
pub const SPAWN_ROWS: std::ops::RangeInclusive<i32> = 1..=4;

pub const CHARGE_SPEED: f32 = 700.0;
pub const CHARGE_SECS: f32 = 0.5;
const CHARGE_INTERVAL_MS: (u32, u32) = (2000, 5000);
const CHARGE_CHANCE: f64 = 0.5;

pub const SIDESTEP_SPEED: f32 = 100.0;
const SIDESTEP_INTERVAL_MS: (u32, u32) = (1000, 3000);
const SIDESTEP_CHANCE: f64 = 0.3;

const BACKTRACK_INTERVAL_MS: (u32, u32) = (5000, 10000);
const BACKTRACK_CHANCE: f64 = 0.2;

/// Enemy variant tags, in weight-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Charger,
    Backtracker,
    Sidestepper,
    Slowpoke,
    Centipede,
}

impl EnemyKind {
    pub const COUNT: usize = 6;

    pub const ALL: [EnemyKind; Self::COUNT] = [
        EnemyKind::Basic,
        EnemyKind::Charger,
        EnemyKind::Backtracker,
        EnemyKind::Sidestepper,
        EnemyKind::Slowpoke,
        EnemyKind::Centipede,
    ];
}

/// Variant-specific behavior state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Basic,
    Charger {
        /// Speed to return to after a charge
        base_speed: f32,
        /// Seconds of charge left (0 when not charging)
        charge_left: f32,
    },
    Sidestepper {
        /// Row (world y) the current hop ends on
        target_y: f32,
        /// Vertical speed of the hop in progress (0 when idle)
        step_speed: f32,
    },
    Backtracker,
    Slowpoke,
    Centipede,
}

/// A bug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub behavior: Behavior,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal speed; negative means moving left
    pub speed: f32,
    pub min_speed: i32,
    pub max_speed: i32,
    pub sprite: Sprite,
    /// Seconds until the next behavior roll, for variants that have one
    pub event_timer: Option<f32>,
}

impl Hitbox for Enemy {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

impl Enemy {
    /// Build an enemy of the given variant at a random spawn point
    pub fn new<R: Rng>(id: u32, kind: EnemyKind, rng: &mut R) -> Self {
        let (min_speed, max_speed) = match kind {
            EnemyKind::Slowpoke => (SLOWPOKE_MIN_SPEED, SLOWPOKE_MAX_SPEED),
            _ => (MIN_SPEED, MAX_SPEED),
        };
        let width = match kind {
            EnemyKind::Centipede => CENTIPEDE_WIDTH,
            _ => ENEMY_WIDTH,
        };

        let mut enemy = Self {
            id,
            behavior: Behavior::Basic,
            pos: Vec2::ZERO,
            width,
            height: ENEMY_HEIGHT,
            speed: 0.0,
            min_speed,
            max_speed,
            sprite: Sprite::Bug,
            event_timer: None,
        };
        enemy.start_x(rng);
        enemy.start_y(rng);
        enemy.set_speed(rng);

        enemy.behavior = match kind {
            EnemyKind::Basic => Behavior::Basic,
            EnemyKind::Charger => Behavior::Charger {
                base_speed: enemy.speed,
                charge_left: 0.0,
            },
            EnemyKind::Sidestepper => Behavior::Sidestepper {
                target_y: enemy.pos.y,
                step_speed: 0.0,
            },
            EnemyKind::Backtracker => Behavior::Backtracker,
            EnemyKind::Slowpoke => Behavior::Slowpoke,
            EnemyKind::Centipede => Behavior::Centipede,
        };
        enemy.sprite = enemy.resting_sprite();
        enemy.event_timer = enemy.roll_interval(rng);
        enemy
    }

    pub fn kind(&self) -> EnemyKind {
        match self.behavior {
            Behavior::Basic => EnemyKind::Basic,
            Behavior::Charger { .. } => EnemyKind::Charger,
            Behavior::Sidestepper { .. } => EnemyKind::Sidestepper,
            Behavior::Backtracker => EnemyKind::Backtracker,
            Behavior::Slowpoke => EnemyKind::Slowpoke,
            Behavior::Centipede => EnemyKind::Centipede,
        }
    }

    /// Sprite when not charging and facing right
    fn resting_sprite(&self) -> Sprite {
        match self.behavior {
            Behavior::Basic => Sprite::Bug,
            Behavior::Charger { .. } => Sprite::Charger,
            Behavior::Sidestepper { .. } => Sprite::Sidestepper,
            Behavior::Backtracker => Sprite::Backtracker,
            Behavior::Slowpoke => Sprite::Slowpoke,
            Behavior::Centipede => Sprite::Centipede,
        }
    }

    fn roll_interval<R: Rng>(&self, rng: &mut R) -> Option<f32> {
        let (min, max) = match self.behavior {
            Behavior::Charger { .. } => CHARGE_INTERVAL_MS,
            Behavior::Sidestepper { .. } => SIDESTEP_INTERVAL_MS,
            Behavior::Backtracker => BACKTRACK_INTERVAL_MS,
            _ => return None,
        };
        Some(rand_interval(rng, min, max))
    }

    /// Random spawn column
    pub fn start_x<R: Rng>(&mut self, rng: &mut R) {
        self.pos.x = rng.random_range(SPAWN_COLUMNS) as f32 * X_STEP;
    }

    /// Random lane
    pub fn start_y<R: Rng>(&mut self, rng: &mut R) {
        self.pos.y = rng.random_range(SPAWN_ROWS) as f32 * Y_STEP;
    }

    /// Random speed within this enemy's range
    pub fn set_speed<R: Rng>(&mut self, rng: &mut R) {
        self.speed = rand_int(rng, self.min_speed, self.max_speed);
    }

    /// Send the enemy back to a fresh spawn point with a fresh speed
    ///
    /// Used when the player is caught. Behavior state returns to rest; the
    /// behavior timer keeps its schedule. A Charger keeps the base speed it
    /// was built with, so its next charge still reverts to that.
    pub fn respawn<R: Rng>(&mut self, rng: &mut R) {
        self.start_x(rng);
        self.start_y(rng);
        self.set_speed(rng);
        let y = self.pos.y;
        match &mut self.behavior {
            Behavior::Charger { charge_left, .. } => {
                *charge_left = 0.0;
            }
            Behavior::Sidestepper {
                target_y,
                step_speed,
            } => {
                *target_y = y;
                *step_speed = 0.0;
            }
            _ => {}
        }
        self.sprite = self.resting_sprite();
    }

    /// Advance position by one step (skipped while paused)
    pub fn update<R: Rng>(&mut self, dt: f32, speed_mult: f32, rng: &mut R) {
        self.pos.x += dt * self.speed * speed_mult;

        if let Behavior::Backtracker = self.behavior {
            // Bounce off two cells past either edge instead of wrapping
            let bounds = self.bounds();
            if bounds.left > X_RIGHT + 2.0 * X_STEP && self.speed > 0.0 {
                self.speed = -self.speed;
                self.sprite = Sprite::BacktrackerReverse;
            }
            if bounds.right < X_LEFT - 2.0 * X_STEP && self.speed < 0.0 {
                self.speed = -self.speed;
                self.sprite = Sprite::Backtracker;
            }
            return;
        }

        if self.pos.x > X_RIGHT {
            self.pos.x = *SPAWN_COLUMNS.start() as f32 * X_STEP;
            self.start_y(rng);
            if let Behavior::Sidestepper {
                target_y,
                step_speed,
            } = &mut self.behavior
            {
                // New lane, so any hop in progress is void
                *target_y = self.pos.y;
                *step_speed = 0.0;
            }
        }

        if let Behavior::Sidestepper {
            target_y,
            step_speed,
        } = &mut self.behavior
        {
            self.pos.y += dt * *step_speed * speed_mult;
            let passed = (*step_speed > 0.0 && self.pos.y > *target_y)
                || (*step_speed < 0.0 && self.pos.y < *target_y);
            if passed {
                self.pos.y = *target_y;
                *step_speed = 0.0;
            }
        }
    }

    /// Run the behavior clocks (keeps running while paused)
    pub fn update_timers<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if let Behavior::Charger {
            base_speed,
            charge_left,
        } = &mut self.behavior
        {
            if *charge_left > 0.0 {
                *charge_left -= dt;
                if *charge_left <= 0.0 {
                    *charge_left = 0.0;
                    self.speed = *base_speed;
                    self.sprite = Sprite::Charger;
                }
            }
        }

        let Some(mut timer) = self.event_timer else {
            return;
        };
        timer -= dt;
        while timer <= 0.0 {
            self.on_timer(rng);
            match self.roll_interval(rng) {
                Some(interval) => timer += interval,
                None => break,
            }
        }
        self.event_timer = Some(timer);
    }

    /// A behavior timer fired: roll for the variant's special move
    fn on_timer<R: Rng>(&mut self, rng: &mut R) {
        match self.behavior {
            Behavior::Charger { .. } => {
                if rng.random::<f64>() > CHARGE_CHANCE {
                    self.start_charge();
                }
            }
            Behavior::Sidestepper { step_speed, .. } => {
                if rng.random::<f64>() > SIDESTEP_CHANCE && step_speed == 0.0 {
                    let down = rng.random::<f64>() >= 0.5;
                    self.start_sidestep(down);
                }
            }
            Behavior::Backtracker => {
                if rng.random::<f64>() > BACKTRACK_CHANCE {
                    self.turn_around();
                }
            }
            _ => {}
        }
    }

    /// Charger: spike to charge speed for [`CHARGE_SECS`]
    pub fn start_charge(&mut self) {
        if let Behavior::Charger { charge_left, .. } = &mut self.behavior {
            *charge_left = CHARGE_SECS;
            self.speed = CHARGE_SPEED;
            self.sprite = Sprite::ChargerCharging;
            log::debug!("Enemy {} charging", self.id);
        }
    }

    /// Sidestepper: begin a one-row hop
    ///
    /// Never hops into the door row or the start row. Returns whether a hop
    /// started.
    pub fn start_sidestep(&mut self, down: bool) -> bool {
        let y = self.pos.y;
        let Behavior::Sidestepper {
            target_y,
            step_speed,
        } = &mut self.behavior
        else {
            return false;
        };
        if *step_speed != 0.0 {
            return false;
        }
        if down && y < Y_BOTTOM - 2.0 * Y_STEP {
            *target_y = y + Y_STEP;
            *step_speed = SIDESTEP_SPEED;
        } else if !down && y > Y_TOP + Y_STEP {
            *target_y = y - Y_STEP;
            *step_speed = -SIDESTEP_SPEED;
        } else {
            return false;
        }
        true
    }

    /// Backtracker: reverse direction and face the new way
    pub fn turn_around(&mut self) {
        if let Behavior::Backtracker = self.behavior {
            self.speed = -self.speed;
            self.sprite = if self.speed > 0.0 {
                Sprite::Backtracker
            } else {
                Sprite::BacktrackerReverse
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy(kind: EnemyKind) -> (Enemy, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut enemy = Enemy::new(1, kind, &mut rng);
        enemy.pos = Vec2::new(0.0, 2.0 * Y_STEP);
        (enemy, rng)
    }

    #[test]
    fn test_construction_ranges() {
        let mut rng = Pcg32::seed_from_u64(5);
        for kind in EnemyKind::ALL {
            for _ in 0..50 {
                let e = Enemy::new(1, kind, &mut rng);
                assert_eq!(e.kind(), kind);
                let col = (e.pos.x / X_STEP).round() as i32;
                let row = (e.pos.y / Y_STEP).round() as i32;
                assert!(SPAWN_COLUMNS.contains(&col));
                assert!(SPAWN_ROWS.contains(&row));
                assert!(e.speed >= e.min_speed as f32 && e.speed <= e.max_speed as f32);
            }
        }
    }

    #[test]
    fn test_variant_shapes() {
        let (slow, _) = enemy(EnemyKind::Slowpoke);
        assert!(slow.speed >= 15.0 && slow.speed <= 25.0);

        let (centipede, _) = enemy(EnemyKind::Centipede);
        assert_eq!(centipede.width, 270.0);
        assert_eq!(centipede.bounds().right - centipede.bounds().left, 270.0);

        let (basic, _) = enemy(EnemyKind::Basic);
        assert!(basic.event_timer.is_none());
    }

    #[test]
    fn test_drift_scales_with_multiplier() {
        let (mut e, mut rng) = enemy(EnemyKind::Basic);
        e.speed = 100.0;
        e.update(0.5, 1.5, &mut rng);
        assert_eq!(e.pos.x, 75.0);
    }

    #[test]
    fn test_wrap_to_spawn_column() {
        let (mut e, mut rng) = enemy(EnemyKind::Basic);
        e.pos.x = X_RIGHT - 1.0;
        e.speed = 100.0;
        e.update(0.1, 1.0, &mut rng);
        assert_eq!(e.pos.x, -3.0 * X_STEP);
        let row = (e.pos.y / Y_STEP).round() as i32;
        assert!(SPAWN_ROWS.contains(&row));
    }

    #[test]
    fn test_charge_spike_and_revert() {
        let (mut e, mut rng) = enemy(EnemyKind::Charger);
        e.event_timer = Some(100.0);
        let base = e.speed;

        e.start_charge();
        assert_eq!(e.speed, CHARGE_SPEED);
        assert_eq!(e.sprite, Sprite::ChargerCharging);

        e.update_timers(0.25, &mut rng);
        assert_eq!(e.speed, CHARGE_SPEED);

        e.update_timers(0.25, &mut rng);
        assert_eq!(e.speed, base);
        assert_eq!(e.sprite, Sprite::Charger);
    }

    #[test]
    fn test_charge_after_respawn_reverts_to_built_speed() {
        let (mut e, mut rng) = enemy(EnemyKind::Charger);
        e.event_timer = Some(100.0);
        let built = e.speed;

        e.respawn(&mut rng);
        e.start_charge();
        e.update_timers(CHARGE_SECS + 0.01, &mut rng);
        assert_eq!(e.speed, built);
        assert_eq!(e.sprite, Sprite::Charger);
    }

    #[test]
    fn test_charger_eventually_charges() {
        let (mut e, mut rng) = enemy(EnemyKind::Charger);
        let mut charged = false;
        for _ in 0..(60 * 60) {
            e.update_timers(1.0 / 60.0, &mut rng);
            charged |= e.speed == CHARGE_SPEED;
        }
        assert!(charged);
    }

    #[test]
    fn test_sidestep_snaps_to_row() {
        let (mut e, mut rng) = enemy(EnemyKind::Sidestepper);
        e.pos = Vec2::new(-3.0 * X_STEP, 2.0 * Y_STEP);
        e.speed = 50.0;
        assert!(e.start_sidestep(true));
        // Already hopping
        assert!(!e.start_sidestep(false));

        let target = 3.0 * Y_STEP;
        for _ in 0..20 {
            e.update(0.1, 1.0, &mut rng);
            assert!(e.pos.y <= target);
        }
        assert_eq!(e.pos.y, target);
        assert!(matches!(e.behavior, Behavior::Sidestepper { step_speed, .. } if step_speed == 0.0));
    }

    #[test]
    fn test_sidestep_stays_off_edge_rows() {
        let (mut e, _) = enemy(EnemyKind::Sidestepper);
        e.pos.y = 4.0 * Y_STEP;
        assert!(!e.start_sidestep(true));

        e.pos.y = Y_STEP;
        assert!(!e.start_sidestep(false));

        assert!(e.start_sidestep(true));
    }

    #[test]
    fn test_backtracker_bounces_at_edges() {
        let (mut e, mut rng) = enemy(EnemyKind::Backtracker);
        e.pos.x = X_RIGHT + 2.0 * X_STEP;
        e.speed = 100.0;
        e.update(0.1, 1.0, &mut rng);
        assert!(e.speed < 0.0);
        assert_eq!(e.sprite, Sprite::BacktrackerReverse);

        e.pos.x = X_LEFT - 2.0 * X_STEP - ENEMY_WIDTH - 1.0;
        e.update(0.1, 1.0, &mut rng);
        assert!(e.speed > 0.0);
        assert_eq!(e.sprite, Sprite::Backtracker);
    }

    #[test]
    fn test_backtracker_never_wraps() {
        let (mut e, mut rng) = enemy(EnemyKind::Backtracker);
        e.pos.x = X_RIGHT - 1.0;
        e.speed = 100.0;
        e.update(0.1, 1.0, &mut rng);
        assert!(e.pos.x > X_RIGHT);
    }

    #[test]
    fn test_turn_around_faces_direction() {
        let (mut e, _) = enemy(EnemyKind::Backtracker);
        e.speed = 80.0;
        e.turn_around();
        assert_eq!(e.speed, -80.0);
        assert_eq!(e.sprite, Sprite::BacktrackerReverse);

        // Only backtrackers turn around
        let (mut basic, _) = enemy(EnemyKind::Basic);
        basic.speed = 80.0;
        basic.turn_around();
        assert_eq!(basic.speed, 80.0);
    }

    #[test]
    fn test_respawn_resets_behavior() {
        let (mut e, mut rng) = enemy(EnemyKind::Charger);
        let built = e.speed;
        e.start_charge();
        e.respawn(&mut rng);
        assert_ne!(e.speed, CHARGE_SPEED);
        assert_eq!(e.sprite, Sprite::Charger);
        assert!(matches!(
            e.behavior,
            Behavior::Charger { base_speed, charge_left } if base_speed == built && charge_left == 0.0
        ));

        let (mut b, mut rng) = enemy(EnemyKind::Backtracker);
        b.turn_around();
        b.respawn(&mut rng);
        assert!(b.speed > 0.0);
        assert_eq!(b.sprite, Sprite::Backtracker);
    }
}
