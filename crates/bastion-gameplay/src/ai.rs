//! Boss behaviour states and the steering helpers they share.
//!
//! The boss picks a behaviour from its phase's set and re-rolls it on a
//! random timer. Phase one chases the player in three styles; phase two
//! orbits the player while firing volleys; phase three holds still.

use std::f32::consts::PI;

use bastion_common::{direction_or, lerp, smoothstep, wrap_angle, Rect, Vec2, FALLBACK_DIRECTION};
use serde::{Deserialize, Serialize};

// ============================================================================
// Behaviour States
// ============================================================================

/// What the boss is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Accelerate straight at the player
    MoveTowardsPlayer,
    /// Approach while weaving side to side
    SweepTowardsPlayer,
    /// Alternate short dashes and pauses
    DashTowardPlayer,
    /// Orbit and fire rings of bolts
    MiddleShoot,
    /// Orbit and fire three-bolt fans
    SpreadShot,
    /// Orbit and fire single bolts that lead the player
    PredictiveShot,
    /// Do nothing
    Hold,
}

const PHASE_ONE: &[BehaviorState] = &[
    BehaviorState::MoveTowardsPlayer,
    BehaviorState::SweepTowardsPlayer,
    BehaviorState::DashTowardPlayer,
];

const PHASE_TWO: &[BehaviorState] = &[
    BehaviorState::MiddleShoot,
    BehaviorState::SpreadShot,
    BehaviorState::PredictiveShot,
];

const PHASE_THREE: &[BehaviorState] = &[BehaviorState::Hold];

/// Behaviours allowed in `phase` (1-based). Phases past the third hold.
#[must_use]
pub fn phase_states(phase: u8) -> &'static [BehaviorState] {
    match phase {
        0 | 1 => PHASE_ONE,
        2 => PHASE_TWO,
        _ => PHASE_THREE,
    }
}

impl BehaviorState {
    /// Short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MoveTowardsPlayer => "move_towards_player",
            Self::SweepTowardsPlayer => "sweep_towards_player",
            Self::DashTowardPlayer => "dash_toward_player",
            Self::MiddleShoot => "middle_shoot",
            Self::SpreadShot => "spread_shot",
            Self::PredictiveShot => "predictive_shot",
            Self::Hold => "hold",
        }
    }

    /// Orbit and firing pattern for ranged behaviours.
    #[must_use]
    pub const fn volley(self) -> Option<VolleyPattern> {
        match self {
            Self::MiddleShoot => Some(VolleyPattern {
                orbit_radius: 300.0,
                angular_speed: 0.05,
                min_interval_ms: 500,
                max_interval_ms: 1500,
            }),
            Self::SpreadShot => Some(VolleyPattern {
                orbit_radius: 250.0,
                angular_speed: 0.03,
                min_interval_ms: 500,
                max_interval_ms: 2000,
            }),
            Self::PredictiveShot => Some(VolleyPattern {
                orbit_radius: 300.0,
                angular_speed: 0.02,
                min_interval_ms: 800,
                max_interval_ms: 1500,
            }),
            _ => None,
        }
    }
}

/// Orbit geometry and shot timing of a ranged behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolleyPattern {
    /// Distance kept from the player
    pub orbit_radius: f32,
    /// Orbit advance in radians per tick
    pub angular_speed: f32,
    /// Shortest delay between volleys
    pub min_interval_ms: u64,
    /// Longest delay between volleys (exclusive)
    pub max_interval_ms: u64,
}

impl VolleyPattern {
    /// Draws the delay until the next volley.
    pub fn roll_interval(&self, rng: &mut fastrand::Rng) -> u64 {
        roll_ms(rng, self.min_interval_ms, self.max_interval_ms)
    }
}

/// Uniform draw from `[min, max)`, or `min` if the range is empty.
pub fn roll_ms(rng: &mut fastrand::Rng, min: u64, max: u64) -> u64 {
    if max > min {
        rng.u64(min..max)
    } else {
        min
    }
}

// ============================================================================
// Scratch State
// ============================================================================

/// Sub-state of the dash behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashStage {
    /// Accelerating along the heading
    Dashing {
        /// When the dash began
        since_ms: u64,
    },
    /// Slowing down and re-aiming
    Paused {
        /// When the pause began
        since_ms: u64,
    },
}

/// Per-behaviour timers and angles. Reset whenever the behaviour changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorScratch {
    /// Sweep side, +1 or -1
    pub sweep_direction: f32,
    /// Last sweep flip
    pub sweep_flipped_ms: Option<u64>,
    /// Dash sub-state
    pub dash: Option<DashStage>,
    /// Dash heading in radians
    pub heading: Option<f32>,
    /// Orbit angle around the player
    pub orbit_angle: Option<f32>,
    /// Last volley
    pub last_shot_ms: Option<u64>,
    /// Delay until the next volley
    pub shot_interval_ms: u64,
}

impl Default for BehaviorScratch {
    fn default() -> Self {
        Self {
            sweep_direction: 1.0,
            sweep_flipped_ms: None,
            dash: None,
            heading: None,
            orbit_angle: None,
            last_shot_ms: None,
            shot_interval_ms: 0,
        }
    }
}

impl BehaviorScratch {
    /// Returns to the "not started" state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Steering Helpers
// ============================================================================

/// Speed factor for a boss whose box overlaps walls.
///
/// `1.0` in open space, falling to `slowdown` when walls cover an area equal
/// to the boss's circle.
#[must_use]
pub fn speed_multiplier(bbox: &Rect, radius: f32, walls: &[Rect], slowdown: f32) -> f32 {
    if walls.is_empty() {
        return 1.0;
    }

    let circle_area = PI * radius * radius;
    if circle_area <= 0.0 {
        return 1.0;
    }

    let overlap: f32 = walls
        .iter()
        .filter_map(|wall| bbox.intersection(wall))
        .map(|clip| clip.area())
        .sum();
    let fraction = (overlap / circle_area).clamp(0.0, 1.0);

    1.0 - fraction.sqrt() * (1.0 - slowdown)
}

/// Visual scale during a dash pause at `progress` in `[0, 1]`.
///
/// Shrinks to 0.9, swells to 1.1, then settles back to 1.0.
#[must_use]
pub fn pause_pulse(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.3 {
        lerp(1.0, 0.9, smoothstep(p / 0.3))
    } else if p < 0.7 {
        lerp(0.9, 1.1, smoothstep((p - 0.3) / 0.4))
    } else {
        lerp(1.1, 1.0, smoothstep((p - 0.7) / 0.3))
    }
}

/// Rotates `current` toward `target` by at most `max_turn` radians, taking
/// the short way round.
#[must_use]
pub fn turn_toward(current: f32, target: f32, max_turn: f32) -> f32 {
    let diff = wrap_angle(target - current);
    current + diff.clamp(-max_turn, max_turn)
}

/// One tick of orbit steering.
///
/// Advances `angle` and moves `position` toward the matching point on the
/// circle around `center`, leading slightly past it. Returns the new
/// position.
#[must_use]
pub fn orbit_step(position: Vec2, center: Vec2, radius: f32, angle: f32, max_speed: f32) -> Vec2 {
    let target = center + Vec2::from_angle(angle) * radius;
    let to_target = target - position;
    let distance = to_target.length();
    if distance <= 0.0 {
        return position;
    }

    let speed = max_speed * (distance / 100.0).min(1.5);
    let predicted = target + to_target * 0.2;
    position + direction_or(predicted - position, FALLBACK_DIRECTION) * speed
}
