//! Pickups scattered around the level.

use std::f32::consts::TAU;

use bastion_common::{Circle, Rect, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::Camera;
use crate::collision::is_off_screen;
use crate::player::Player;

/// Item spawning and effect tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Chance per tick of attempting a spawn
    pub spawn_chance: f32,
    /// No other item may spawn within this distance of a live item
    pub min_distance: f32,
    /// Time before an item may despawn
    pub lifetime_ms: u64,
    /// Fraction of max stamina restored on pickup
    pub restore_fraction: f32,
    /// Pickup radius
    pub radius: f32,
    /// Clearance from chunk edges and walls
    pub spawn_padding: f32,
    /// Positions tried per spawn
    pub spawn_attempts: u32,
    /// Pulse phase advance per tick
    pub pulse_speed: f32,
    /// Pulse size variation as a fraction of the radius
    pub pulse_amplitude: f32,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.02,
            min_distance: 500.0,
            lifetime_ms: 20_000,
            restore_fraction: 0.5,
            radius: 20.0,
            spawn_padding: 20.0,
            spawn_attempts: 10,
            pulse_speed: 0.1,
            pulse_amplitude: 0.1,
        }
    }
}

/// Item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores stamina
    #[default]
    Stamina,
}

/// A pickup in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    kind: ItemKind,
    center: Vec2,
    radius: f32,
    spawned_at_ms: u64,
    lifetime_ms: u64,
    occupied_radius: f32,
    pulse_phase: f32,
    pulse_speed: f32,
    pulse_amplitude: f32,
}

impl Item {
    /// Creates a stamina item at `center`.
    #[must_use]
    pub fn new(center: Vec2, now_ms: u64, config: &ItemConfig, rng: &mut fastrand::Rng) -> Self {
        Self {
            kind: ItemKind::Stamina,
            center,
            radius: config.radius,
            spawned_at_ms: now_ms,
            lifetime_ms: config.lifetime_ms,
            occupied_radius: config.min_distance,
            pulse_phase: rng.f32() * TAU,
            pulse_speed: config.pulse_speed,
            pulse_amplitude: config.pulse_amplitude,
        }
    }

    /// Advances the pulse animation.
    pub fn update(&mut self) {
        self.pulse_phase = (self.pulse_phase + self.pulse_speed) % TAU;
    }

    /// Radius to draw at, including the pulse.
    #[must_use]
    pub fn visual_radius(&self) -> f32 {
        self.radius * (1.0 + self.pulse_phase.sin() * self.pulse_amplitude)
    }

    /// Applies the item to the player.
    pub fn apply(&self, player: &mut Player, config: &ItemConfig) {
        match self.kind {
            ItemKind::Stamina => player.restore_stamina(config.restore_fraction),
        }
    }

    /// Checks if the item has outlived its lifetime.
    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawned_at_ms) > self.lifetime_ms
    }

    /// Checks if the item should be removed: expired and out of view.
    #[must_use]
    pub fn should_despawn(&self, now_ms: u64, camera: &Camera) -> bool {
        self.is_expired(now_ms) && is_off_screen(&self.bounding_box(), camera)
    }

    /// Item type.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Centre.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Pickup radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Radius kept clear of other items.
    #[must_use]
    pub const fn occupied_radius(&self) -> f32 {
        self.occupied_radius
    }

    /// Spawn time.
    #[must_use]
    pub const fn spawned_at_ms(&self) -> u64 {
        self.spawned_at_ms
    }

    /// Pickup circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        self.circle().bounding_box()
    }

    /// Checks that the item can be drawn.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.radius > 0.0
    }
}

/// Looks for a free spawn point inside `chunk`.
///
/// Candidates keep `spawn_padding` clear of the chunk edge and of every
/// wall, and stay out of the occupied radius of every live item. Gives up
/// after `spawn_attempts` tries.
pub fn find_item_spawn(
    rng: &mut fastrand::Rng,
    chunk: Rect,
    walls: &[Rect],
    items: &[Item],
    config: &ItemConfig,
) -> Option<Vec2> {
    let padding = config.spawn_padding;
    let min_x = chunk.left() + padding;
    let max_x = chunk.right() - padding;
    let min_y = chunk.top() + padding;
    let max_y = chunk.bottom() - padding;
    if min_x > max_x || min_y > max_y {
        return None;
    }

    for _ in 0..config.spawn_attempts {
        let candidate = Vec2::new(
            min_x + rng.f32() * (max_x - min_x),
            min_y + rng.f32() * (max_y - min_y),
        );

        let crowded = items
            .iter()
            .any(|item| candidate.distance(item.center()) < item.occupied_radius());
        if crowded {
            continue;
        }

        let clearance = Rect::from_center(candidate, padding, padding);
        if clearance.intersects_any(walls) {
            continue;
        }

        debug!("Item spawn point found at {candidate:?}");
        return Some(candidate);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use crate::effects::NullSink;
    use crate::input::InputSnapshot;
    use std::sync::Arc;

    fn item_at(center: Vec2, now_ms: u64) -> Item {
        let mut rng = fastrand::Rng::with_seed(2);
        Item::new(center, now_ms, &ItemConfig::default(), &mut rng)
    }

    #[test]
    fn test_pulse_stays_within_ten_percent() {
        let mut item = item_at(Vec2::ZERO, 0);
        for _ in 0..200 {
            item.update();
            let r = item.visual_radius();
            assert!((18.0 - 1e-4..=22.0 + 1e-4).contains(&r), "{r}");
        }
    }

    #[test]
    fn test_pickup_restores_half_stamina() {
        let config = ItemConfig::default();
        let mut player = Player::new(Default::default(), Vec2::ZERO, Arc::new(NullSink));
        for _ in 0..150 {
            player.update(&InputSnapshot::default().with_sprint(), &[]);
        }
        assert!((player.stamina() - 30.0).abs() < 1e-3);

        item_at(Vec2::ZERO, 0).apply(&mut player, &config);
        assert!((player.stamina() - 120.0).abs() < 1e-3);

        item_at(Vec2::ZERO, 0).apply(&mut player, &config);
        assert!((player.stamina() - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_despawn_needs_expiry_and_off_screen() {
        let camera = Camera::new(Vec2::new(1200.0, 800.0), CameraConfig::default());
        let visible = item_at(Vec2::new(600.0, 400.0), 0);
        let hidden = item_at(Vec2::new(5000.0, 400.0), 0);

        assert!(!hidden.should_despawn(20_000, &camera));
        assert!(hidden.should_despawn(20_001, &camera));
        assert!(!visible.should_despawn(90_000, &camera));
    }

    #[test]
    fn test_spawn_avoids_walls() {
        let mut rng = fastrand::Rng::with_seed(8);
        let chunk = Rect::new(0.0, 0.0, 1200.0, 800.0);
        // Walls everywhere except a strip on the right
        let walls = [Rect::new(0.0, 0.0, 1000.0, 800.0)];
        let config = ItemConfig {
            spawn_attempts: 200,
            ..ItemConfig::default()
        };
        for _ in 0..20 {
            if let Some(point) = find_item_spawn(&mut rng, chunk, &walls, &[], &config) {
                assert!(point.x >= 1020.0, "{point:?}");
            }
        }
    }

    #[test]
    fn test_spawn_respects_occupied_space() {
        let mut rng = fastrand::Rng::with_seed(8);
        let chunk = Rect::new(0.0, 0.0, 1200.0, 800.0);
        let existing = vec![item_at(Vec2::new(600.0, 400.0), 0)];
        let config = ItemConfig::default();
        for _ in 0..50 {
            if let Some(point) = find_item_spawn(&mut rng, chunk, &[], &existing, &config) {
                assert!(point.distance(Vec2::new(600.0, 400.0)) >= 500.0);
            }
        }
    }

    #[test]
    fn test_spawn_in_tiny_chunk_fails() {
        let mut rng = fastrand::Rng::with_seed(8);
        let chunk = Rect::new(0.0, 0.0, 30.0, 30.0);
        assert!(find_item_spawn(&mut rng, chunk, &[], &[], &ItemConfig::default()).is_none());
    }
}
