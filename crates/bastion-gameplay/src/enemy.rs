//! The boss: phases, health and per-tick behaviour.
//!
//! The boss runs one [`BehaviorState`] at a time. Dropping its health to
//! zero advances it to the next phase, refills health and freezes it for a
//! short transition; at zero health in the last phase it is defeated.

use std::f32::consts::PI;
use std::sync::Arc;

use bastion_common::{
    angle_of, calculate_intercept_point, direction_or, Circle, Rect, Vec2, FALLBACK_DIRECTION,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{
    orbit_step, pause_pulse, phase_states, roll_ms, speed_multiplier, turn_toward,
    BehaviorScratch, BehaviorState, DashStage, VolleyPattern,
};
use crate::effects::{EffectKind, EffectTrigger, EffectsSink};
use crate::projectile::{ring_angles, Projectile, ProjectileConfigs, ProjectileKind};

/// Largest dash heading change per tick.
pub const DASH_TURN_RATE: f32 = PI / 128.0;

/// Bolts in a ring volley.
pub const RING_BOLTS: usize = 8;

/// Angular offsets of a spread volley around the player direction.
pub const SPREAD_OFFSETS: [f32; 3] = [-0.2, 0.0, 0.2];

/// Boss tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Collision radius
    pub radius: f32,
    /// Max health per phase; the length is the phase count
    pub phase_health: Vec<f32>,
    /// Cruise speed
    pub base_speed: f32,
    /// Velocity gain per tick
    pub acceleration: f32,
    /// Velocity loss per tick while pausing
    pub deceleration: f32,
    /// Top speed of a dash, also the orbit speed
    pub dash_speed: f32,
    /// Length of a dash
    pub dash_duration_ms: u64,
    /// Pause between dashes
    pub pause_duration_ms: u64,
    /// Sideways speed while sweeping
    pub sweep_amplitude: f32,
    /// Time between sweep side flips
    pub sweep_flip_ms: u64,
    /// Speed factor when fully buried in walls
    pub wall_slowdown: f32,
    /// Freeze after a phase change
    pub transition_ms: u64,
    /// Shortest behaviour re-roll delay
    pub state_interval_min_ms: u64,
    /// Longest behaviour re-roll delay (exclusive)
    pub state_interval_max_ms: u64,
    /// Spawn X
    pub spawn_x: f32,
    /// Spawn Y
    pub spawn_y: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            phase_health: vec![1000.0, 1000.0, 1000.0],
            base_speed: 6.0,
            acceleration: 2.0,
            deceleration: 2.0,
            dash_speed: 12.0,
            dash_duration_ms: 500,
            pause_duration_ms: 700,
            sweep_amplitude: 6.0,
            sweep_flip_ms: 2000,
            wall_slowdown: 0.001,
            transition_ms: 1500,
            state_interval_min_ms: 3000,
            state_interval_max_ms: 8000,
            spawn_x: 0.0,
            spawn_y: 0.0,
        }
    }
}

impl EnemyConfig {
    /// Number of phases.
    #[must_use]
    pub fn max_phases(&self) -> u8 {
        self.phase_health.len().min(u8::MAX as usize) as u8
    }

    /// Max health of `phase` (1-based).
    #[must_use]
    pub fn health_for(&self, phase: u8) -> f32 {
        let index = usize::from(phase.max(1)) - 1;
        self.phase_health.get(index).copied().unwrap_or(0.0)
    }

    /// Spawn position.
    #[must_use]
    pub fn spawn(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }
}

/// Result of damaging the boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health dropped but the phase holds
    Absorbed,
    /// The boss entered a new phase
    PhaseChanged {
        /// The new phase (1-based)
        phase: u8,
    },
    /// Health ran out in the last phase
    Defeated,
}

/// What the boss sees each tick.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    /// Simulation clock
    pub now_ms: u64,
    /// Player centre
    pub player_center: Vec2,
    /// Player displacement during its last move
    pub player_velocity: Vec2,
    /// Walls near the camera
    pub walls: &'a [Rect],
    /// Bolt tuning
    pub projectiles: &'a ProjectileConfigs,
}

/// The boss.
pub struct Enemy {
    config: EnemyConfig,
    center: Vec2,
    velocity: Vec2,
    phase: u8,
    health: f32,
    state: BehaviorState,
    scratch: BehaviorScratch,
    last_state_change_ms: u64,
    state_interval_ms: u64,
    transition_started_ms: Option<u64>,
    /// Visual scale (dash pause pulse)
    pulse: f32,
    defeated: bool,
    effects: Arc<dyn EffectsSink>,
}

impl Enemy {
    /// Spawns the boss in phase 1 at the configured spawn point.
    #[must_use]
    pub fn new(
        config: EnemyConfig,
        now_ms: u64,
        rng: &mut fastrand::Rng,
        effects: Arc<dyn EffectsSink>,
    ) -> Self {
        let state_interval_ms =
            roll_ms(rng, config.state_interval_min_ms, config.state_interval_max_ms);
        Self {
            center: config.spawn(),
            velocity: Vec2::ZERO,
            phase: 1,
            health: config.health_for(1),
            state: phase_states(1)[0],
            scratch: BehaviorScratch::default(),
            last_state_change_ms: now_ms,
            state_interval_ms,
            transition_started_ms: None,
            pulse: 1.0,
            defeated: false,
            config,
            effects,
        }
    }

    /// Runs one tick and returns any bolts fired.
    pub fn update(&mut self, ctx: &EnemyContext<'_>, rng: &mut fastrand::Rng) -> Vec<Projectile> {
        if self.defeated {
            return Vec::new();
        }

        if let Some(started) = self.transition_started_ms {
            if ctx.now_ms.saturating_sub(started) < self.config.transition_ms {
                self.velocity = Vec2::ZERO;
                return Vec::new();
            }
            debug!("Boss finished entering phase {}", self.phase);
            self.transition_started_ms = None;
        }

        self.update_state(ctx.now_ms, rng);
        self.pulse = 1.0;

        let multiplier = speed_multiplier(
            &self.bounding_box(),
            self.config.radius,
            ctx.walls,
            self.config.wall_slowdown,
        );

        match self.state {
            BehaviorState::MoveTowardsPlayer => {
                self.move_towards(ctx.player_center, multiplier);
                Vec::new()
            },
            BehaviorState::SweepTowardsPlayer => {
                self.sweep_towards(ctx, multiplier);
                Vec::new()
            },
            BehaviorState::DashTowardPlayer => {
                self.dash_toward(ctx, multiplier);
                Vec::new()
            },
            BehaviorState::MiddleShoot | BehaviorState::SpreadShot | BehaviorState::PredictiveShot => {
                self.orbit_and_fire(ctx, rng)
            },
            BehaviorState::Hold => {
                self.velocity = Vec2::ZERO;
                Vec::new()
            },
        }
    }

    /// Re-rolls the behaviour once the current interval has elapsed.
    fn update_state(&mut self, now_ms: u64, rng: &mut fastrand::Rng) {
        if now_ms.saturating_sub(self.last_state_change_ms) < self.state_interval_ms {
            return;
        }

        let states = phase_states(self.phase);
        let next = states[rng.usize(..states.len())];
        if next != self.state {
            debug!("Boss behaviour {} -> {}", self.state.name(), next.name());
            self.enter_state(next);
            self.effects.trigger(EffectTrigger::new(
                EffectKind::MovementChange,
                self.center,
                0.0,
            ));
        }

        self.last_state_change_ms = now_ms;
        self.state_interval_ms = roll_ms(
            rng,
            self.config.state_interval_min_ms,
            self.config.state_interval_max_ms,
        );
    }

    fn enter_state(&mut self, state: BehaviorState) {
        self.state = state;
        self.scratch.reset();
    }

    fn move_towards(&mut self, target: Vec2, multiplier: f32) {
        let to_player = target - self.center;
        if to_player.length_squared() > 0.0 {
            let direction = direction_or(to_player, FALLBACK_DIRECTION);
            self.velocity += direction * self.config.acceleration * multiplier;
            let max_speed = self.config.base_speed * (multiplier + 0.1);
            self.velocity = self.velocity.clamp_length_max(max_speed);
        }
        self.center += self.velocity;
    }

    fn sweep_towards(&mut self, ctx: &EnemyContext<'_>, multiplier: f32) {
        match self.scratch.sweep_flipped_ms {
            None => self.scratch.sweep_flipped_ms = Some(ctx.now_ms),
            Some(flipped) if ctx.now_ms.saturating_sub(flipped) > self.config.sweep_flip_ms => {
                self.scratch.sweep_direction = -self.scratch.sweep_direction;
                self.scratch.sweep_flipped_ms = Some(ctx.now_ms);
            },
            Some(_) => {},
        }

        let forward = Vec2::from_angle(angle_of(ctx.player_center - self.center));
        let side = forward.perp();
        let target = forward * self.config.base_speed * multiplier
            + side * self.config.sweep_amplitude * self.scratch.sweep_direction * multiplier;

        self.velocity += (target - self.velocity) * 0.15;
        self.center += self.velocity;
    }

    fn dash_toward(&mut self, ctx: &EnemyContext<'_>, multiplier: f32) {
        let now = ctx.now_ms;
        let to_player = ctx.player_center - self.center;
        let has_target = to_player.length_squared() > 0.0;
        let target_angle = angle_of(to_player);

        let stage = *self
            .scratch
            .dash
            .get_or_insert(DashStage::Dashing { since_ms: now });

        match stage {
            DashStage::Dashing { since_ms } => {
                if has_target {
                    let heading = self.scratch.heading.unwrap_or(target_angle);
                    let heading = turn_toward(heading, target_angle, DASH_TURN_RATE);
                    self.scratch.heading = Some(heading);

                    let boost = self.config.acceleration * 3.0 * multiplier;
                    self.velocity += Vec2::from_angle(heading) * boost;
                    self.velocity = self.velocity.clamp_length_max(self.config.dash_speed);
                }

                if now.saturating_sub(since_ms) >= self.config.dash_duration_ms {
                    self.scratch.dash = Some(DashStage::Paused { since_ms: now });
                }
            },
            DashStage::Paused { since_ms } => {
                if has_target {
                    self.scratch.heading = Some(target_angle);
                }

                let elapsed = now.saturating_sub(since_ms);
                let duration = self.config.pause_duration_ms.max(1);
                self.pulse = pause_pulse(elapsed as f32 / duration as f32);

                let decel = self.config.deceleration * 2.0 * multiplier;
                self.velocity = Vec2::new(
                    decay_toward_zero(self.velocity.x, decel),
                    decay_toward_zero(self.velocity.y, decel),
                );

                if elapsed >= self.config.pause_duration_ms {
                    self.scratch.dash = Some(DashStage::Dashing { since_ms: now });
                }
            },
        }

        self.center += self.velocity;
    }

    fn orbit_and_fire(&mut self, ctx: &EnemyContext<'_>, rng: &mut fastrand::Rng) -> Vec<Projectile> {
        let Some(pattern) = self.state.volley() else {
            return Vec::new();
        };

        let angle = self
            .scratch
            .orbit_angle
            .unwrap_or_else(|| angle_of(self.center - ctx.player_center))
            + pattern.angular_speed;
        self.scratch.orbit_angle = Some(angle);

        let next = orbit_step(
            self.center,
            ctx.player_center,
            pattern.orbit_radius,
            angle,
            self.config.dash_speed,
        );
        self.velocity = next - self.center;
        self.center = next;

        self.fire_volley(ctx, &pattern, angle, rng)
    }

    fn fire_volley(
        &mut self,
        ctx: &EnemyContext<'_>,
        pattern: &VolleyPattern,
        orbit_angle: f32,
        rng: &mut fastrand::Rng,
    ) -> Vec<Projectile> {
        let Some(last_shot) = self.scratch.last_shot_ms else {
            self.scratch.last_shot_ms = Some(ctx.now_ms);
            self.scratch.shot_interval_ms = pattern.roll_interval(rng);
            return Vec::new();
        };
        if ctx.now_ms.saturating_sub(last_shot) < self.scratch.shot_interval_ms {
            return Vec::new();
        }

        self.scratch.last_shot_ms = Some(ctx.now_ms);
        self.scratch.shot_interval_ms = pattern.roll_interval(rng);

        let bolts = ctx.projectiles;
        let aim = angle_of(ctx.player_center - self.center);
        let volley: Vec<Projectile> = match self.state {
            BehaviorState::MiddleShoot => ring_angles(RING_BOLTS, orbit_angle)
                .map(|angle| {
                    Projectile::enemy(ProjectileKind::PhaseTwo, self.center, angle, &bolts.phase_two)
                })
                .collect(),
            BehaviorState::SpreadShot => SPREAD_OFFSETS
                .iter()
                .map(|offset| {
                    Projectile::enemy(ProjectileKind::Basic, self.center, aim + offset, &bolts.basic)
                })
                .collect(),
            BehaviorState::PredictiveShot => {
                let angle = calculate_intercept_point(
                    self.center,
                    ctx.player_center,
                    ctx.player_velocity,
                    bolts.predictive.speed,
                )
                .map_or(aim, |point| angle_of(point - self.center));
                vec![Projectile::enemy(
                    ProjectileKind::Predictive,
                    self.center,
                    angle,
                    &bolts.predictive,
                )]
            },
            _ => Vec::new(),
        };

        debug!("Boss fired {} bolts ({})", volley.len(), self.state.name());
        volley
    }

    /// Applies damage at `now_ms`, advancing the phase when health runs out.
    pub fn take_damage(&mut self, amount: f32, now_ms: u64) -> DamageOutcome {
        if self.defeated {
            return DamageOutcome::Defeated;
        }

        self.health -= amount;
        if self.health > 0.0 {
            return DamageOutcome::Absorbed;
        }

        if self.phase < self.config.max_phases() {
            self.enter_phase(self.phase + 1, now_ms);
            DamageOutcome::PhaseChanged { phase: self.phase }
        } else {
            info!("Boss defeated");
            self.health = 0.0;
            self.defeated = true;
            self.velocity = Vec2::ZERO;
            DamageOutcome::Defeated
        }
    }

    fn enter_phase(&mut self, phase: u8, now_ms: u64) {
        info!("Boss entering phase {phase}");
        self.phase = phase;
        self.health = self.config.health_for(phase);
        self.enter_state(phase_states(phase)[0]);
        self.velocity = Vec2::ZERO;
        self.pulse = 1.0;
        self.transition_started_ms = Some(now_ms);
        self.effects.trigger(EffectTrigger::new(EffectKind::PhaseChange, self.center, 0.0));
    }

    /// Progress through the phase transition in `[0, 1]`, or `None` outside
    /// one.
    #[must_use]
    pub fn transition_progress(&self, now_ms: u64) -> Option<f32> {
        let started = self.transition_started_ms?;
        let duration = self.config.transition_ms.max(1);
        let elapsed = now_ms.saturating_sub(started);
        Some((elapsed as f32 / duration as f32).min(1.0))
    }

    /// Checks if a phase transition is running.
    #[must_use]
    pub const fn in_transition(&self) -> bool {
        self.transition_started_ms.is_some()
    }

    /// Checks if the boss is defeated.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Current phase (1-based).
    #[must_use]
    pub const fn phase(&self) -> u8 {
        self.phase
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Max health of the current phase.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.config.health_for(self.phase)
    }

    /// Active behaviour.
    #[must_use]
    pub const fn state(&self) -> BehaviorState {
        self.state
    }

    /// Centre.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Moves the boss without steering.
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Radius including the dash pause pulse.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.config.radius * self.pulse
    }

    /// Collision circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius())
    }

    /// Bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        self.circle().bounding_box()
    }

    /// Tuning.
    #[must_use]
    pub const fn config(&self) -> &EnemyConfig {
        &self.config
    }
}

impl std::fmt::Debug for Enemy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enemy")
            .field("center", &self.center)
            .field("phase", &self.phase)
            .field("health", &self.health)
            .field("state", &self.state)
            .field("defeated", &self.defeated)
            .finish_non_exhaustive()
    }
}

fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        value
    }
}
