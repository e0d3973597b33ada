//! The simulation world.
//!
//! [`World`] owns the level, the player, the boss, every projectile and
//! item, and the camera. It is the sole mutator of all of them and advances
//! them one fixed tick at a time.

use std::sync::Arc;

use bastion_common::{Rect, Vec2, WorldError};
use bastion_gameplay::{
    find_item_spawn, handle_item_player_collision, handle_player_enemy_collision,
    resolve_projectiles, Camera, EffectsSink, Enemy, EnemyContext, InputSnapshot, Item, Lethality,
    Player, Projectile, ProjectileContext,
};
use bastion_world::{LevelGenerator, StreamingMode};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::timing::ticks_to_ms;

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    /// The fight is on
    #[default]
    Playing,
    /// The player died
    GameOver,
    /// The boss was defeated
    Victory,
}

impl RoundState {
    /// Returns true once the round has been decided.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Generates a random world seed.
#[must_use]
pub fn random_seed() -> u64 {
    fastrand::u64(..)
}

/// The boss fight simulation.
pub struct World {
    /// Configuration the world was built from
    config: GameConfig,
    /// Seed shared by the level and the simulation RNG
    seed: u64,
    /// Chunk streaming
    level: LevelGenerator,
    player: Player,
    /// `None` once the boss is defeated
    enemy: Option<Enemy>,
    projectiles: Vec<Projectile>,
    items: Vec<Item>,
    camera: Camera,
    effects: Arc<dyn EffectsSink>,
    rng: fastrand::Rng,
    /// Ticks run since the world was created
    ticks: u64,
    /// Simulation clock in milliseconds
    now_ms: u64,
    state: RoundState,
}

impl World {
    /// Builds the world: generates the spawn chunk and places the player in
    /// the spawn room and the boss at its spawn point.
    pub fn new(
        config: GameConfig,
        effects: Arc<dyn EffectsSink>,
        mode: StreamingMode,
    ) -> Result<Self, WorldError> {
        let seed = config.seed.unwrap_or_else(random_seed);
        info!("Creating world with seed {seed}");

        let level = LevelGenerator::with_mode(config.level.clone(), seed, mode)?;
        let mut rng = fastrand::Rng::with_seed(seed);
        let player = Player::new(config.player, config.level.spawn_point(), Arc::clone(&effects));
        let enemy = Enemy::new(config.enemy.clone(), 0, &mut rng, Arc::clone(&effects));
        let camera = Camera::new(config.viewport(), config.camera);

        Ok(Self {
            config,
            seed,
            level,
            player,
            enemy: Some(enemy),
            projectiles: Vec::new(),
            items: Vec::new(),
            camera,
            effects,
            rng,
            ticks: 0,
            now_ms: 0,
            state: RoundState::Playing,
        })
    }

    /// Runs one tick with `input` and returns the round state afterwards.
    ///
    /// Once the round is decided, ticks do nothing until [`World::new_round`].
    pub fn tick(&mut self, input: &InputSnapshot) -> RoundState {
        if self.state.is_finished() {
            return self.state;
        }

        self.ticks += 1;
        self.now_ms = ticks_to_ms(self.ticks, self.config.window.fps);
        let walls = self.level.get_visible_walls(self.camera.x(), self.camera.y());

        if input.shooting && self.player.is_alive() {
            let bolt = self.player.shoot(
                &input.aim,
                self.camera.offset(),
                &self.config.projectiles.player,
                &mut self.rng,
            );
            self.projectiles.push(bolt);
        }

        self.player.update(input, &walls);

        if let Some(enemy) = self.enemy.as_mut() {
            let ctx = EnemyContext {
                now_ms: self.now_ms,
                player_center: self.player.center(),
                player_velocity: self.player.velocity(),
                walls: &walls,
                projectiles: &self.config.projectiles,
            };
            let fired = enemy.update(&ctx, &mut self.rng);
            self.projectiles.extend(fired);
        }

        self.resolve_collisions(&walls);
        self.sanitize();

        self.camera.update(self.player.center());
        if let Err(e) = self.level.update(self.camera.x(), self.camera.y()) {
            warn!("Chunk streaming failed: {e}");
        }

        self.update_items();
        self.spawn_items();

        if self.state == RoundState::Playing && !self.player.is_alive() {
            info!("Player died after {} ms", self.now_ms);
            self.state = RoundState::GameOver;
        }

        self.state
    }

    fn resolve_collisions(&mut self, walls: &[Rect]) {
        let ctx = ProjectileContext {
            walls,
            camera: &self.camera,
            combat: &self.config.combat,
            now_ms: self.now_ms,
            effects: self.effects.as_ref(),
        };
        let report = resolve_projectiles(
            &mut self.projectiles,
            &mut self.player,
            self.enemy.as_mut(),
            &ctx,
            &mut self.rng,
        );
        if report.removed > 0 {
            debug!("{} projectiles removed", report.removed);
        }

        if self.enemy.as_ref().is_some_and(Enemy::is_defeated) {
            info!("Boss defeated after {} ms", self.now_ms);
            self.enemy = None;
            self.state = RoundState::Victory;
            return;
        }

        if let Some(enemy) = &self.enemy {
            if handle_player_enemy_collision(&self.player, enemy) {
                match self.config.combat.lethality {
                    Lethality::OneHit => self.player.die(),
                    Lethality::Sustained => {
                        self.player.take_damage(self.config.combat.contact_damage_per_tick);
                    },
                }
            }
        }
    }

    /// Drops projectiles and items that can no longer be drawn.
    fn sanitize(&mut self) {
        self.projectiles.retain(|projectile| {
            let ok = projectile.is_well_formed();
            if !ok {
                warn!(
                    "Dropping malformed {:?} projectile at {:?} (radius {})",
                    projectile.kind(),
                    projectile.center(),
                    projectile.radius()
                );
            }
            ok
        });
        self.items.retain(|item| {
            let ok = item.is_well_formed();
            if !ok {
                warn!("Dropping malformed item at {:?}", item.center());
            }
            ok
        });
    }

    fn update_items(&mut self) {
        let now_ms = self.now_ms;
        let config = self.config.items;
        let camera = &self.camera;
        let player = &mut self.player;

        self.items.retain_mut(|item| {
            item.update();
            if player.is_alive() && handle_item_player_collision(item, player) {
                debug!("Picked up {:?} item at {:?}", item.kind(), item.center());
                item.apply(player, &config);
                return false;
            }
            !item.should_despawn(now_ms, camera)
        });
    }

    /// Occasionally drops a stamina item into a loaded chunk near the camera.
    fn spawn_items(&mut self) {
        let config = self.config.items;
        if self.rng.f32() >= config.spawn_chance {
            return;
        }

        let radius = self.level.generation_radius() as i32;
        let center = self.level.get_chunk_coords(self.camera.x(), self.camera.y());
        let coord = center.offset(
            self.rng.i32(-radius..=radius),
            self.rng.i32(-radius..=radius),
        );
        let Some(chunk) = self.level.chunk(coord) else {
            return;
        };

        let bounds = chunk.bounds(self.level.chunk_size());
        if let Some(point) = find_item_spawn(&mut self.rng, bounds, chunk.walls(), &self.items, &config) {
            self.items.push(Item::new(point, self.now_ms, &config, &mut self.rng));
        }
    }

    /// Starts a fresh round on the same level.
    ///
    /// The player returns to the spawn point at full health, a new boss
    /// spawns, and every projectile and item is cleared.
    pub fn new_round(&mut self) {
        self.player.reset(self.config.level.spawn_point());
        self.enemy = Some(Enemy::new(
            self.config.enemy.clone(),
            self.now_ms,
            &mut self.rng,
            Arc::clone(&self.effects),
        ));
        self.projectiles.clear();
        self.items.clear();
        self.camera.set_offset(Vec2::ZERO);
        self.state = RoundState::Playing;
        info!("New round started at {} ms", self.now_ms);
    }

    /// Walls around the camera.
    #[must_use]
    pub fn visible_walls(&self) -> Vec<Rect> {
        self.level.get_visible_walls(self.camera.x(), self.camera.y())
    }

    /// Current round state.
    #[must_use]
    pub const fn state(&self) -> RoundState {
        self.state
    }

    /// World seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulation clock in milliseconds.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The boss, unless defeated.
    #[must_use]
    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    /// Mutable access to the boss.
    pub fn enemy_mut(&mut self) -> Option<&mut Enemy> {
        self.enemy.as_mut()
    }

    /// Live projectiles.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Live items.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Chunk streaming.
    #[must_use]
    pub const fn level(&self) -> &LevelGenerator {
        &self.level
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("seed", &self.seed)
            .field("ticks", &self.ticks)
            .field("now_ms", &self.now_ms)
            .field("state", &self.state)
            .field("player", &self.player)
            .field("enemy", &self.enemy)
            .field("projectiles", &self.projectiles.len())
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}
