//! The world: every live entity plus the phase machine driving them
//!
//! A `World` owns the run's RNG and ID allocator. It is built once per run,
//! mutated by [`tick`](super::tick::tick), and rebuilt in place when the
//! player runs out of lives. [`World::reset`] does the same rebuild in one go
//! for hosts that skip the game over screen.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::overlaps;
use super::enemy::Enemy;
use super::items::{Item, ItemKind, place_items};
use super::map::{Map, TileKind, generate_map};
use super::player::{Aim, Attack, Command, Player};
use super::spawner::spawn_enemies;
use super::state::{Dialog, EntityIds, GameEvent, GamePhase, GameState};

#[derive(Debug, Clone)]
pub struct World {
    pub state: GameState,
    pub phase: GamePhase,
    /// Blocking dialog currently on screen
    pub dialog: Option<Dialog>,
    pub map: Map,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub attacks: Vec<Attack>,
    /// Seed the RNG was built from
    pub seed: u64,
    /// Ticks since the world was created
    pub time_ticks: u64,
    rng: Pcg32,
    ids: EntityIds,
    events: Vec<GameEvent>,
}

impl World {
    /// Build a fresh run, parked on the opening dialog
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = EntityIds::default();
        let state = GameState::new();
        let map = generate_map(state.level, &mut rng);
        let player = Player::new(&map);
        let enemies = spawn_enemies(state.level, &mut rng, &mut ids);
        let items = place_items(&map, state.level, &mut rng, &mut ids);

        let mut world = Self {
            state,
            phase: GamePhase::Intro,
            dialog: None,
            map,
            player,
            enemies,
            items,
            attacks: Vec::new(),
            seed,
            time_ticks: 0,
            rng,
            ids,
            events: Vec::new(),
        };
        world.open_dialog(Dialog::Opening);
        world
    }

    /// Throw the run away and start over at level 1
    ///
    /// The RNG and ID allocator carry on, so entity IDs never repeat.
    pub fn reset(&mut self) {
        self.clear_run();
        self.populate_level();
        self.dialog = None;
        self.phase = GamePhase::Playing;
    }

    /// Fresh level-1 state, map and player with the board left empty
    fn clear_run(&mut self) {
        self.state = GameState::new();
        self.map = generate_map(self.state.level, &mut self.rng);
        self.player = Player::new(&self.map);
        self.enemies.clear();
        self.items.clear();
        self.attacks.clear();
    }

    /// Spawn the current level's bugs and items
    fn populate_level(&mut self) {
        let level = self.state.level;
        self.enemies = spawn_enemies(level, &mut self.rng, &mut self.ids);
        self.items = place_items(&self.map, level, &mut self.rng, &mut self.ids);
    }

    /// Drain the events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    fn open_dialog(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
        self.state.paused = true;
        self.events.push(GameEvent::DialogOpened(dialog));
    }

    /// Acknowledge the dialog on screen
    ///
    /// The opening story chains into the controls screen; every other dialog
    /// hands control back to the player. Leaving the game over screen is what
    /// puts the new run's bugs and items on the board. Returns false when
    /// nothing was up.
    pub fn dismiss_dialog(&mut self) -> bool {
        let Some(dialog) = self.dialog.take() else {
            return false;
        };
        self.state.paused = false;
        self.events.push(GameEvent::DialogClosed(dialog));

        match dialog {
            Dialog::Opening => self.open_dialog(Dialog::Instructions),
            Dialog::GameOver { .. } => {
                self.populate_level();
                self.phase = GamePhase::Playing;
            }
            _ => self.phase = GamePhase::Playing,
        }
        true
    }

    /// Route one command from the input source
    ///
    /// Everything is ignored while a dialog is up or the player is not in
    /// control.
    pub fn handle_input(&mut self, command: Command) {
        if self.state.paused || !self.is_playing() {
            return;
        }

        match command {
            Command::Move(direction) => {
                self.player.step(direction, &self.map);
            }
            Command::Pause => {
                self.phase = GamePhase::Paused;
                self.open_dialog(Dialog::Paused);
            }
            Command::FireLeft => self.fire(Aim::Left),
            Command::FireRight => self.fire(Aim::Right),
        }
    }

    fn fire(&mut self, aim: Aim) {
        if self.state.bullets == 0 {
            return;
        }
        self.state.bullets -= 1;
        let attack = self.player.fire(self.ids.allocate(), aim);
        self.attacks.push(attack);
        self.events.push(GameEvent::AttackFired { aim });
    }

    /// Background behavior timers and item lifetimes
    ///
    /// These keep running through pauses and dialogs; only movement stops.
    pub fn update_timers(&mut self, dt: f32) {
        for enemy in &mut self.enemies {
            enemy.update_timers(dt, &mut self.rng);
        }
        for item in &mut self.items {
            item.update(dt);
        }
    }

    /// Move enemies and bullets
    pub fn update_movement(&mut self, dt: f32) {
        let speed_mult = self.state.speed;
        for enemy in &mut self.enemies {
            enemy.update(dt, speed_mult, &mut self.rng);
        }
        for attack in &mut self.attacks {
            attack.update(dt, speed_mult);
        }
    }

    /// Drop expired items and bullets that left the field
    pub fn purge(&mut self) {
        self.items.retain(|item| !item.destroyed);
        self.attacks.retain(|attack| !attack.is_spent());
    }

    /// Remove an enemy by ID; absent IDs are ignored
    pub fn destroy_enemy(&mut self, id: u32) {
        let before = self.enemies.len();
        self.enemies.retain(|enemy| enemy.id != id);
        if self.enemies.len() < before {
            log::debug!("Enemy {} destroyed", id);
            self.events.push(GameEvent::EnemyDestroyed { id });
        }
    }

    /// Remove a bullet by ID; absent IDs are ignored
    pub fn remove_attack(&mut self, id: u32) {
        self.attacks.retain(|attack| attack.id != id);
    }

    /// Remove an item by ID; absent IDs are ignored
    pub fn remove_item(&mut self, id: u32) {
        self.items.retain(|item| item.id != id);
    }

    /// Enemy contact, bullet hits and drowning
    ///
    /// Contact is judged before bullets land, so a bug shot on the same tick
    /// it reaches the player still costs a life. Returns whether a life was
    /// lost.
    pub fn resolve_collisions(&mut self) -> bool {
        let caught = self.enemies.iter().any(|enemy| overlaps(enemy, &self.player));
        let drowned = self
            .map
            .tile_at(self.player.cell)
            .is_some_and(|tile| tile.kind == TileKind::Water);

        let mut killed = Vec::new();
        let mut spent = Vec::new();
        for attack in &self.attacks {
            for enemy in &self.enemies {
                if overlaps(attack, enemy) {
                    killed.push(enemy.id);
                    spent.push(attack.id);
                }
            }
        }
        for id in killed {
            self.destroy_enemy(id);
        }
        for id in spent {
            self.remove_attack(id);
        }

        if caught || drowned {
            self.lose_life();
            return true;
        }
        false
    }

    /// Lose a life: restart the level, or end the run on the last one
    pub fn lose_life(&mut self) {
        if self.player.lives <= 1 {
            let level = self.state.level;
            log::info!("Game over at level {}", level);
            self.events.push(GameEvent::LifeLost { lives_left: 0 });
            self.events.push(GameEvent::GameOver { level });
            self.clear_run();
            self.phase = GamePhase::GameOver;
            self.open_dialog(Dialog::GameOver { level });
            return;
        }

        self.player.lives -= 1;
        log::debug!("Caught on level {}, {} lives left", self.state.level, self.player.lives);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.player.lives,
        });
        self.player.reset_position(&self.map);
        for enemy in &mut self.enemies {
            enemy.respawn(&mut self.rng);
        }
        self.phase = GamePhase::Dying;
        self.open_dialog(Dialog::Caught);
    }

    /// Apply an item's effect to the player
    pub fn apply_pickup(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Key => self.player.has_key = true,
            ItemKind::Heart => self.player.add_life(),
            ItemKind::Gem => self.state.bullets += 1,
        }
        log::debug!("Picked up {:?}", kind);
        self.events.push(GameEvent::ItemCollected { kind });
    }

    /// Collect whatever shares the player's cell
    pub fn collect_pickups(&mut self) {
        let cell = self.player.cell;
        let picked: Vec<(u32, ItemKind)> = self
            .items
            .iter()
            .filter(|item| !item.destroyed && item.cell == cell)
            .map(|item| (item.id, item.kind))
            .collect();

        for (id, kind) in picked {
            self.apply_pickup(kind);
            self.remove_item(id);
        }
    }

    /// Advance when the player stands in the doorway
    pub fn check_level_complete(&mut self) -> bool {
        if self.player.cell != self.map.end.cell {
            return false;
        }
        self.advance_level();
        true
    }

    /// Build the next level and drop the player at its start
    pub fn advance_level(&mut self) {
        self.phase = GamePhase::LevelTransition;
        self.state.level_up();
        let level = self.state.level;

        self.map = generate_map(level, &mut self.rng);
        self.enemies = spawn_enemies(level, &mut self.rng, &mut self.ids);
        self.items = place_items(&self.map, level, &mut self.rng, &mut self.ids);
        self.player.reset_position(&self.map);
        self.player.has_key = false;
        self.attacks.clear();

        log::info!(
            "Level {} ({} enemies, speed x{:.2})",
            level,
            self.enemies.len(),
            self.state.speed
        );
        self.events.push(GameEvent::LevelStarted { level });
        self.phase = GamePhase::Playing;
    }
}
