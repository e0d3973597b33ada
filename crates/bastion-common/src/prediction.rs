//! Intercept prediction for leading moving targets.
//!
//! The solver is a fixed-point iteration: estimate the flight time to the
//! target, project the target forward by that time, and repeat against the
//! projected point. For targets slower than the projectile this converges
//! quickly; three refinements are enough for aiming purposes.

use glam::Vec2;

/// Number of refinement passes after the initial estimate.
pub const INTERCEPT_ITERATIONS: usize = 3;

/// Returns every estimate of the intercept point: the initial guess followed
/// by `iterations` refinements.
///
/// Returns an empty list if the target is stationary or the projectile cannot
/// move.
#[must_use]
pub fn intercept_refinements(
    shooter: Vec2,
    target: Vec2,
    target_velocity: Vec2,
    projectile_speed: f32,
    iterations: usize,
) -> Vec<Vec2> {
    if target_velocity.length_squared() <= 0.0 || projectile_speed <= 0.0 {
        return Vec::new();
    }

    let mut estimates = Vec::with_capacity(iterations + 1);
    let base_time = shooter.distance(target) / projectile_speed;
    let mut predicted = target + target_velocity * base_time;
    estimates.push(predicted);

    for _ in 0..iterations {
        let time_to_target = shooter.distance(predicted) / projectile_speed;
        predicted = target + target_velocity * time_to_target;
        estimates.push(predicted);
    }

    estimates
}

/// Predicted point at which a projectile fired now meets a moving target.
///
/// Velocities and speeds share a time unit (world units per tick).
/// Returns `None` if the target is not moving, in which case callers aim
/// directly at the target.
#[must_use]
pub fn calculate_intercept_point(
    shooter: Vec2,
    target: Vec2,
    target_velocity: Vec2,
    projectile_speed: f32,
) -> Option<Vec2> {
    intercept_refinements(
        shooter,
        target,
        target_velocity,
        projectile_speed,
        INTERCEPT_ITERATIONS,
    )
    .last()
    .copied()
}
