//! Player entity: movement, stamina and shooting.

use std::sync::Arc;

use bastion_common::{direction_or, Circle, Rect, Vec2, FALLBACK_DIRECTION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collision::move_with_walls;
use crate::effects::{EffectKind, EffectTrigger, EffectsSink};
use crate::input::{AimDevice, AimInput, InputSnapshot};
use crate::projectile::{PlayerBoltConfig, Projectile};

/// Player tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collision radius
    pub radius: f32,
    /// Walking speed in units per tick
    pub base_speed: f32,
    /// Speed multiplier while sprinting
    pub sprint_multiplier: f32,
    /// Maximum health (sustained lethality)
    pub max_health: f32,
    /// Maximum stamina
    pub max_stamina: f32,
    /// Stamina recovered per tick when not sprinting
    pub stamina_recovery: f32,
    /// Fraction of max stamina needed to recover from exhaustion
    pub exhaustion_threshold: f32,
    /// Ticks the stamina bar stays visible after a change
    pub stamina_bar_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            base_speed: 5.0,
            sprint_multiplier: 2.0,
            max_health: 60.0,
            max_stamina: 180.0,
            stamina_recovery: 0.1,
            exhaustion_threshold: 0.3,
            stamina_bar_ticks: 30,
        }
    }
}

/// The player.
pub struct Player {
    /// Tuning
    config: PlayerConfig,
    /// Centre
    center: Vec2,
    /// Displacement during the last update
    velocity: Vec2,
    /// Current health
    health: f32,
    /// Current stamina
    stamina: f32,
    /// Set when stamina hits zero; cleared at the threshold
    exhausted: bool,
    /// Alive flag
    alive: bool,
    /// Remaining ticks of stamina bar visibility
    stamina_bar_ticks: u32,
    /// Effect sink
    effects: Arc<dyn EffectsSink>,
}

impl Player {
    /// Creates a player at `spawn` with full health and stamina.
    #[must_use]
    pub fn new(config: PlayerConfig, spawn: Vec2, effects: Arc<dyn EffectsSink>) -> Self {
        Self {
            config,
            center: spawn,
            velocity: Vec2::ZERO,
            health: config.max_health,
            stamina: config.max_stamina,
            exhausted: false,
            alive: true,
            stamina_bar_ticks: 0,
            effects,
        }
    }

    /// Restores the player to its starting state at `spawn`.
    pub fn reset(&mut self, spawn: Vec2) {
        let effects = Arc::clone(&self.effects);
        *self = Self::new(self.config, spawn, effects);
    }

    /// Runs one tick of stamina and movement.
    pub fn update(&mut self, input: &InputSnapshot, walls: &[Rect]) {
        if !self.alive {
            self.velocity = Vec2::ZERO;
            return;
        }

        self.stamina_bar_ticks = self.stamina_bar_ticks.saturating_sub(1);
        let movement = input.clamped_movement();

        let mut speed = self.config.base_speed;
        if input.sprinting && self.can_sprint() {
            speed *= self.config.sprint_multiplier;
            self.stamina = (self.stamina - 1.0).max(0.0);
            self.stamina_bar_ticks = self.config.stamina_bar_ticks;
            if self.stamina <= 0.0 {
                debug!("Player exhausted");
                self.exhausted = true;
            }

            if movement != Vec2::ZERO {
                self.effects.trigger(EffectTrigger::new(
                    EffectKind::Boost,
                    self.center,
                    movement.y.atan2(movement.x),
                ));
            }
        } else {
            self.recover_stamina();
        }

        let old = self.bounding_box();
        let moved = move_with_walls(old, movement * speed, walls);
        let new_center = moved.center();
        self.velocity = new_center - self.center;
        self.center = new_center;
    }

    fn can_sprint(&self) -> bool {
        !self.exhausted && self.stamina > 0.0
    }

    fn recover_stamina(&mut self) {
        let before = self.stamina;
        self.stamina = (self.stamina + self.config.stamina_recovery).min(self.config.max_stamina);
        if self.stamina > before {
            self.stamina_bar_ticks = self.config.stamina_bar_ticks;
        }
        if self.stamina >= self.config.max_stamina * self.config.exhaustion_threshold {
            self.exhausted = false;
        }
    }

    /// Fires a bolt toward `aim`.
    ///
    /// Pointer aim is a screen position and is resolved against
    /// `camera_offset`; stick aim is already a direction. The bolt gets a
    /// random aim error and speed variation within the configured bounds.
    #[must_use]
    pub fn shoot(
        &self,
        aim: &AimInput,
        camera_offset: Vec2,
        config: &PlayerBoltConfig,
        rng: &mut fastrand::Rng,
    ) -> Projectile {
        let raw = match aim.device {
            AimDevice::Stick => aim.vector,
            AimDevice::Pointer => aim.vector - (self.center - camera_offset),
        };
        let direction = direction_or(raw, FALLBACK_DIRECTION);

        let angle = direction.y.atan2(direction.x) + symmetric(rng, config.inaccuracy);
        let speed = config.speed * (1.0 + symmetric(rng, config.speed_variation));
        Projectile::player_bolt(self.center, Vec2::from_angle(angle), speed, config)
    }

    /// Restores `fraction` of max stamina and clears exhaustion.
    pub fn restore_stamina(&mut self, fraction: f32) {
        let amount = self.config.max_stamina * fraction;
        self.stamina = (self.stamina + amount).clamp(0.0, self.config.max_stamina);
        self.exhausted = false;
        self.stamina_bar_ticks = self.config.stamina_bar_ticks;
    }

    /// Removes health. Returns `true` if this killed the player.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.die();
            return true;
        }
        false
    }

    /// Kills the player.
    pub fn die(&mut self) {
        if self.alive {
            debug!("Player died at {:?}", self.center);
        }
        self.alive = false;
    }

    /// Checks if the player is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Centre.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Moves the player to `center` without collision.
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Displacement during the last update.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Collision radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.config.radius
    }

    /// Collision circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.config.radius)
    }

    /// Bounding box used against walls.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        self.circle().bounding_box()
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Current stamina.
    #[must_use]
    pub const fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Stamina as a fraction of max.
    #[must_use]
    pub fn stamina_fraction(&self) -> f32 {
        if self.config.max_stamina > 0.0 {
            self.stamina / self.config.max_stamina
        } else {
            0.0
        }
    }

    /// Checks if the player is exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Remaining ticks of stamina bar visibility.
    #[must_use]
    pub const fn stamina_bar_ticks(&self) -> u32 {
        self.stamina_bar_ticks
    }

    /// Tuning.
    #[must_use]
    pub const fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("center", &self.center)
            .field("health", &self.health)
            .field("stamina", &self.stamina)
            .field("exhausted", &self.exhausted)
            .field("alive", &self.alive)
            .finish_non_exhaustive()
    }
}

/// Uniform value in `[-bound, bound]`.
fn symmetric(rng: &mut fastrand::Rng, bound: f32) -> f32 {
    (rng.f32() * 2.0 - 1.0) * bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{NullSink, RecordingSink};
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(PlayerConfig::default(), Vec2::new(600.0, 400.0), Arc::new(NullSink))
    }

    #[test]
    fn test_walk_speed() {
        let mut p = player();
        p.update(&InputSnapshot::moving(Vec2::X), &[]);
        assert!((p.center().x - 605.0).abs() < 1e-4);
        assert!((p.velocity().x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_sprint_doubles_speed_and_drains_stamina() {
        let sink = Arc::new(RecordingSink::new());
        let mut p = Player::new(PlayerConfig::default(), Vec2::ZERO, sink.clone());
        p.update(&InputSnapshot::moving(Vec2::X).with_sprint(), &[]);
        assert!((p.center().x - 10.0).abs() < 1e-4);
        assert!((p.stamina() - 179.0).abs() < 1e-4);
        assert_eq!(p.stamina_bar_ticks(), 30);
        assert_eq!(sink.count(EffectKind::Boost), 1);
    }

    #[test]
    fn test_sprint_in_place_has_no_boost_effect() {
        let sink = Arc::new(RecordingSink::new());
        let mut p = Player::new(PlayerConfig::default(), Vec2::ZERO, sink.clone());
        p.update(&InputSnapshot::default().with_sprint(), &[]);
        assert_eq!(sink.count(EffectKind::Boost), 0);
    }

    #[test]
    fn test_exhaustion_and_recovery_threshold() {
        let config = PlayerConfig {
            max_stamina: 10.0,
            stamina_recovery: 1.0,
            exhaustion_threshold: 0.5,
            ..PlayerConfig::default()
        };
        let mut p = Player::new(config, Vec2::ZERO, Arc::new(NullSink));
        let sprint = InputSnapshot::moving(Vec2::X).with_sprint();
        for _ in 0..10 {
            p.update(&sprint, &[]);
        }
        assert!(p.is_exhausted());
        assert_eq!(p.stamina(), 0.0);

        // Sprint held but exhausted: walk speed and recovering
        let x = p.center().x;
        p.update(&sprint, &[]);
        assert!((p.center().x - x - 5.0).abs() < 1e-4);
        assert!(p.is_exhausted());

        // Threshold is 5.0 (half of 10)
        for _ in 0..3 {
            p.update(&sprint, &[]);
        }
        assert!(p.is_exhausted());
        p.update(&InputSnapshot::default(), &[]);
        assert!((p.stamina() - 5.0).abs() < 1e-4);
        assert!(!p.is_exhausted());
    }

    #[test]
    fn test_wall_stops_player() {
        let mut p = player();
        let wall = Rect::new(612.0, 300.0, 15.0, 200.0);
        p.update(&InputSnapshot::moving(Vec2::X), &[wall]);
        assert!(!p.bounding_box().intersects(&wall));
        assert!(p.bounding_box().right() <= wall.left());
    }

    #[test]
    fn test_player_stuck_in_wall_is_pushed_out() {
        let mut p = player();
        let wall = Rect::new(595.0, 300.0, 15.0, 200.0);
        assert!(p.bounding_box().intersects(&wall));
        p.update(&InputSnapshot::default(), &[wall]);
        assert!(!p.bounding_box().intersects(&wall));
    }

    #[test]
    fn test_item_restore_clears_exhaustion() {
        let config = PlayerConfig {
            max_stamina: 10.0,
            ..PlayerConfig::default()
        };
        let mut p = Player::new(config, Vec2::ZERO, Arc::new(NullSink));
        for _ in 0..10 {
            p.update(&InputSnapshot::default().with_sprint(), &[]);
        }
        assert!(p.is_exhausted());
        p.restore_stamina(0.5);
        assert!(!p.is_exhausted());
        assert!((p.stamina() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_shoot_pointer_aim_uses_screen_space() {
        let p = player();
        let config = PlayerBoltConfig {
            inaccuracy: 0.0,
            speed_variation: 0.0,
            ..PlayerBoltConfig::default()
        };
        let mut rng = fastrand::Rng::with_seed(1);
        let camera = Vec2::new(100.0, 100.0);
        // Player at screen (500, 300); pointer straight below
        let bolt = p.shoot(&AimInput::pointer(Vec2::new(500.0, 400.0)), camera, &config, &mut rng);
        assert!((bolt.direction() - Vec2::Y).length() < 1e-5);
        assert!((bolt.speed() - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_shoot_spread_stays_in_bounds() {
        let p = player();
        let config = PlayerBoltConfig::default();
        let mut rng = fastrand::Rng::with_seed(9);
        for _ in 0..100 {
            let bolt = p.shoot(&AimInput::stick(Vec2::X), Vec2::ZERO, &config, &mut rng);
            assert!(bolt.angle().abs() <= config.inaccuracy + 1e-5);
            assert!((bolt.speed() - 15.0).abs() <= 1.5 + 1e-4);
        }
    }

    #[test]
    fn test_sustained_damage_kills_at_zero() {
        let mut p = player();
        assert!(!p.take_damage(59.0));
        assert!(p.take_damage(1.0));
        assert!(!p.is_alive());
    }

    proptest! {
        #[test]
        fn prop_stamina_stays_in_bounds(ticks in proptest::collection::vec(any::<bool>(), 0..600)) {
            let mut p = Player::new(PlayerConfig::default(), Vec2::ZERO, Arc::new(NullSink));
            for sprint in ticks {
                let mut input = InputSnapshot::moving(Vec2::X);
                input.sprinting = sprint;
                p.update(&input, &[]);
                prop_assert!(p.stamina() >= 0.0);
                prop_assert!(p.stamina() <= p.config().max_stamina);
            }
        }
    }
}
