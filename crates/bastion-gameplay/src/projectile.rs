//! Projectiles fired by the player and the boss.

use std::f32::consts::PI;

use bastion_common::{direction_or, Circle, Rect, Vec2, FALLBACK_DIRECTION};
use serde::{Deserialize, Serialize};

/// Projectile kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Fast, small enemy bolt (spread volley)
    Basic,
    /// Slow, heavy enemy bolt (ring volley)
    PhaseTwo,
    /// Enemy bolt aimed at the player's intercept point
    Predictive,
    /// Player shot
    PlayerBolt,
}

impl ProjectileKind {
    /// Checks if this kind belongs to the boss.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        !matches!(self, ProjectileKind::PlayerBolt)
    }
}

/// Tuning for one kind of enemy bolt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyBoltConfig {
    /// Starting radius
    pub radius: f32,
    /// Speed in units per tick
    pub speed: f32,
    /// Damage per tick of contact (sustained lethality)
    pub damage_per_tick: f32,
    /// Radius multiplier per player-bolt hit, in (0, 1)
    pub shrink_rate: f32,
    /// Destroyed once the radius falls to this size
    pub min_size: f32,
    /// Destroyed after this many player-bolt hits
    pub max_hits: u32,
}

/// Tuning for player bolts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBoltConfig {
    /// Radius
    pub radius: f32,
    /// Base speed in units per tick
    pub speed: f32,
    /// Maximum aim error in radians, either side
    pub inaccuracy: f32,
    /// Maximum speed variation as a fraction of `speed`, either side
    pub speed_variation: f32,
}

impl Default for PlayerBoltConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            speed: 15.0,
            inaccuracy: 0.1,
            speed_variation: 0.1,
        }
    }
}

/// Projectile tuning for every kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfigs {
    /// Spread volley bolts
    pub basic: EnemyBoltConfig,
    /// Ring volley bolts
    pub phase_two: EnemyBoltConfig,
    /// Predictive bolts
    pub predictive: EnemyBoltConfig,
    /// Player bolts
    pub player: PlayerBoltConfig,
}

impl Default for ProjectileConfigs {
    fn default() -> Self {
        Self {
            basic: EnemyBoltConfig {
                radius: 20.0,
                speed: 15.0,
                damage_per_tick: 1.0,
                shrink_rate: 0.8,
                min_size: 1.0,
                max_hits: 3,
            },
            phase_two: EnemyBoltConfig {
                radius: 30.0,
                speed: 4.0,
                damage_per_tick: 8.0,
                shrink_rate: 0.9,
                min_size: 2.0,
                max_hits: 5,
            },
            predictive: EnemyBoltConfig {
                radius: 25.0,
                speed: 10.0,
                damage_per_tick: 10.0,
                shrink_rate: 0.85,
                min_size: 1.0,
                max_hits: 3,
            },
            player: PlayerBoltConfig::default(),
        }
    }
}

impl ProjectileConfigs {
    /// Config for an enemy kind; `None` for player bolts.
    #[must_use]
    pub fn enemy(&self, kind: ProjectileKind) -> Option<&EnemyBoltConfig> {
        match kind {
            ProjectileKind::Basic => Some(&self.basic),
            ProjectileKind::PhaseTwo => Some(&self.phase_two),
            ProjectileKind::Predictive => Some(&self.predictive),
            ProjectileKind::PlayerBolt => None,
        }
    }
}

/// Shrink behaviour of an enemy bolt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shrink {
    /// Radius multiplier per hit
    pub rate: f32,
    /// Size at which the bolt is destroyed
    pub min_size: f32,
}

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Kind
    kind: ProjectileKind,
    /// Centre
    center: Vec2,
    /// Centre before the last `advance`
    previous_center: Vec2,
    /// Radius
    radius: f32,
    /// Speed in units per tick
    speed: f32,
    /// Unit direction
    direction: Vec2,
    /// Hits taken from player bolts
    hits: u32,
    /// Hits tolerated
    max_hits: u32,
    /// Contact damage per tick
    damage_per_tick: Option<f32>,
    /// Shrink on hit
    shrink: Option<Shrink>,
}

impl Projectile {
    /// Creates an enemy bolt travelling along `angle`.
    #[must_use]
    pub fn enemy(kind: ProjectileKind, center: Vec2, angle: f32, config: &EnemyBoltConfig) -> Self {
        Self {
            kind,
            center,
            previous_center: center,
            radius: config.radius,
            speed: config.speed,
            direction: Vec2::from_angle(angle),
            hits: 0,
            max_hits: config.max_hits.max(1),
            damage_per_tick: Some(config.damage_per_tick),
            shrink: Some(Shrink {
                rate: config.shrink_rate,
                min_size: config.min_size,
            }),
        }
    }

    /// Creates a player bolt travelling along `direction` at `speed`.
    #[must_use]
    pub fn player_bolt(center: Vec2, direction: Vec2, speed: f32, config: &PlayerBoltConfig) -> Self {
        Self {
            kind: ProjectileKind::PlayerBolt,
            center,
            previous_center: center,
            radius: config.radius,
            speed,
            direction: direction_or(direction, FALLBACK_DIRECTION),
            hits: 0,
            max_hits: 1,
            damage_per_tick: None,
            shrink: None,
        }
    }

    /// Moves the projectile by one tick of velocity.
    pub fn advance(&mut self) {
        self.previous_center = self.center;
        self.center += self.velocity();
    }

    /// Registers a hit from a player bolt.
    ///
    /// Shrinks the bolt around its centre and returns `true` once it should
    /// be destroyed.
    pub fn register_hit(&mut self) -> bool {
        self.hits += 1;
        if let Some(shrink) = self.shrink {
            self.radius *= shrink.rate;
            if self.radius <= shrink.min_size {
                return true;
            }
        }
        self.hits >= self.max_hits
    }

    /// Kind.
    #[must_use]
    pub const fn kind(&self) -> ProjectileKind {
        self.kind
    }

    /// Checks if the boss fired this projectile.
    #[must_use]
    pub const fn from_enemy(&self) -> bool {
        self.kind.is_enemy()
    }

    /// Centre.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Centre before the last move.
    #[must_use]
    pub const fn previous_center(&self) -> Vec2 {
        self.previous_center
    }

    /// Radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Unit direction.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Velocity per tick.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }

    /// Heading in radians.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.direction.y.atan2(self.direction.x)
    }

    /// Hits taken.
    #[must_use]
    pub const fn hits(&self) -> u32 {
        self.hits
    }

    /// Hits tolerated.
    #[must_use]
    pub const fn max_hits(&self) -> u32 {
        self.max_hits
    }

    /// Contact damage per tick, for enemy bolts.
    #[must_use]
    pub const fn damage_per_tick(&self) -> Option<f32> {
        self.damage_per_tick
    }

    /// Shrink settings, for enemy bolts.
    #[must_use]
    pub const fn shrink(&self) -> Option<Shrink> {
        self.shrink
    }

    /// Collision circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        self.circle().bounding_box()
    }

    /// Checks if every field is usable for drawing and collision.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.radius > 0.0
    }

    /// Moves the projectile to `center`. Test and spawn helper.
    pub fn set_center(&mut self, center: Vec2) {
        self.previous_center = center;
        self.center = center;
    }
}

/// Angle offsets of an `n`-bolt ring, evenly spaced over a full turn.
pub fn ring_angles(count: usize, offset: f32) -> impl Iterator<Item = f32> {
    let step = 2.0 * PI / count.max(1) as f32;
    (0..count).map(move |i| offset + i as f32 * step)
}
