//! Collision detection and response.
//!
//! Entities collide with each other as circles and with walls as
//! axis-aligned boxes. Wall contact is resolved continuously: a move that
//! would end inside a wall is cut back to the furthest safe point, then the
//! leftover motion is retried one axis at a time so entities slide along
//! walls instead of sticking to them.

use std::f32::consts::{PI, TAU};

use bastion_common::{check_circle_collision, segment_intersects_rect, Circle, Rect, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::Camera;
use crate::effects::{EffectKind, EffectTrigger, EffectsSink};
use crate::enemy::{DamageOutcome, Enemy};
use crate::item::Item;
use crate::player::Player;
use crate::projectile::Projectile;

/// Binary search iterations when cutting a move back to a safe point.
pub const SWEEP_STEPS: usize = 8;

/// How hits on the player are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lethality {
    /// Any enemy bolt or body contact kills the player
    #[default]
    OneHit,
    /// Bolts and body contact drain health each tick
    Sustained,
}

/// Damage rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// How hits on the player are scored
    pub lethality: Lethality,
    /// Damage a player bolt deals to the boss
    pub bolt_damage: f32,
    /// Health drained per tick of body contact (sustained lethality)
    pub contact_damage_per_tick: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            lethality: Lethality::OneHit,
            bolt_damage: 1.0,
            contact_damage_per_tick: 1.0,
        }
    }
}

/// Resolves a move from `old` to `new` against `walls`.
///
/// If `old` is clear of every wall, the result is too.
#[must_use]
pub fn resolve_wall_collision(old: Rect, new: Rect, walls: &[Rect]) -> Rect {
    if !new.intersects_any(walls) {
        return new;
    }

    let movement = new.position() - old.position();
    if movement == Vec2::ZERO {
        return old;
    }

    // Furthest safe fraction of the move
    let mut min_t = 0.0_f32;
    let mut max_t = 1.0_f32;
    let mut best = old;
    for _ in 0..SWEEP_STEPS {
        let t = (min_t + max_t) / 2.0;
        let test = old.translated(movement * t);
        if test.intersects_any(walls) {
            max_t = t;
        } else {
            min_t = t;
            best = test;
        }
    }

    // Slide with whatever is left, one axis at a time
    let mut result = best;
    if min_t < 1.0 {
        let remaining = movement * (1.0 - min_t);

        let test = result.translated(Vec2::new(remaining.x, 0.0));
        if !test.intersects_any(walls) {
            result = test;
        }
        let test = result.translated(Vec2::new(0.0, remaining.y));
        if !test.intersects_any(walls) {
            result = test;
        }
    }

    result
}

/// Pushes `rect` out of each wall it overlaps, along the axis of least
/// overlap.
#[must_use]
pub fn push_out_of_walls(mut rect: Rect, walls: &[Rect]) -> Rect {
    for wall in walls {
        if !rect.intersects(wall) {
            continue;
        }
        let left = wall.right() - rect.left();
        let right = rect.right() - wall.left();
        let top = wall.bottom() - rect.top();
        let bottom = rect.bottom() - wall.top();
        let min = left.min(right).min(top).min(bottom);

        if min == left {
            rect.x = wall.right();
        } else if min == right {
            rect.x = wall.left() - rect.w;
        } else if min == top {
            rect.y = wall.bottom();
        } else {
            rect.y = wall.top() - rect.h;
        }
    }
    rect
}

/// Moves `old` by `delta` without entering any wall.
///
/// A box that already overlaps a wall (geometry that streamed in on top of
/// it) is pushed out first. If the result still overlaps, the box stays
/// where it was.
#[must_use]
pub fn move_with_walls(old: Rect, delta: Vec2, walls: &[Rect]) -> Rect {
    if walls.is_empty() {
        return old.translated(delta);
    }

    let start = if old.intersects_any(walls) {
        debug!("Entity overlaps a wall before moving, pushing out");
        push_out_of_walls(old, walls)
    } else {
        old
    };

    let resolved = resolve_wall_collision(start, start.translated(delta), walls);
    if resolved.intersects_any(walls) {
        old
    } else {
        resolved
    }
}

/// Checks if a box lies entirely outside the camera view.
#[must_use]
pub fn is_off_screen(rect: &Rect, camera: &Camera) -> bool {
    let screen = camera.apply(rect);
    let viewport = camera.viewport();
    screen.x > viewport.x
        || screen.right() < 0.0
        || screen.y > viewport.y
        || screen.bottom() < 0.0
}

/// Face of a wall struck by something travelling from `previous` to
/// `current`: the contact point and the outward normal angle.
#[must_use]
pub fn struck_face(previous: Vec2, current: Vec2, wall: &Rect) -> (Vec2, f32) {
    if previous.x < wall.left() && current.x >= wall.left() {
        (Vec2::new(wall.left(), current.y), PI)
    } else if previous.x > wall.right() && current.x <= wall.right() {
        (Vec2::new(wall.right(), current.y), 0.0)
    } else if previous.y < wall.top() && current.y >= wall.top() {
        (Vec2::new(current.x, wall.top()), 3.0 * PI / 2.0)
    } else if previous.y > wall.bottom() && current.y <= wall.bottom() {
        (Vec2::new(current.x, wall.bottom()), PI / 2.0)
    } else {
        (current, 0.0)
    }
}

/// Checks a projectile against one wall; on contact emits a wall-hit effect
/// on the struck face and returns `true`.
///
/// The path since the last move is tested too, so fast bolts cannot skip
/// through thin walls.
pub fn handle_projectile_wall_collision(
    projectile: &Projectile,
    wall: &Rect,
    effects: &dyn EffectsSink,
) -> bool {
    let hit = projectile.bounding_box().intersects(wall)
        || segment_intersects_rect(projectile.previous_center(), projectile.center(), wall);
    if !hit {
        return false;
    }

    let (point, normal) = struck_face(projectile.previous_center(), projectile.center(), wall);
    effects.trigger(EffectTrigger::new(EffectKind::WallHit, point, normal));
    true
}

/// Outcome of a player bolt meeting an enemy bolt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoltClash {
    /// The bolts did not touch
    Miss,
    /// The player bolt is spent; the enemy bolt shrank and survives
    Absorbed,
    /// Both bolts are spent
    Destroyed,
}

/// Resolves a player bolt against an enemy bolt.
///
/// Only player bolts can cancel enemy bolts; any other pairing is a miss.
pub fn handle_projectile_projectile_collision(bolt: &Projectile, enemy_bolt: &mut Projectile) -> BoltClash {
    if bolt.from_enemy() || !enemy_bolt.from_enemy() {
        return BoltClash::Miss;
    }
    if !check_circle_collision(bolt.circle(), enemy_bolt.circle()) {
        return BoltClash::Miss;
    }
    if enemy_bolt.register_hit() {
        BoltClash::Destroyed
    } else {
        BoltClash::Absorbed
    }
}

/// Applies a player bolt to the boss. Returns the damage outcome on contact.
pub fn handle_projectile_enemy_collision(
    bolt: &Projectile,
    enemy: &mut Enemy,
    damage: f32,
    now_ms: u64,
    rng: &mut fastrand::Rng,
    effects: &dyn EffectsSink,
) -> Option<DamageOutcome> {
    if bolt.from_enemy() || enemy.is_defeated() {
        return None;
    }
    if !check_circle_collision(bolt.circle(), enemy.circle()) {
        return None;
    }

    let outcome = enemy.take_damage(damage, now_ms);
    effects.trigger(EffectTrigger::new(
        EffectKind::WallHit,
        bolt.center(),
        rng.f32() * TAU,
    ));
    Some(outcome)
}

/// Applies an enemy bolt to the player. Returns `true` on contact.
pub fn handle_projectile_player_collision(bolt: &Projectile, player: &mut Player, lethality: Lethality) -> bool {
    if !bolt.from_enemy() || !player.is_alive() {
        return false;
    }
    if !check_circle_collision(bolt.circle(), player.circle()) {
        return false;
    }

    match lethality {
        Lethality::OneHit => player.die(),
        Lethality::Sustained => {
            player.take_damage(bolt.damage_per_tick().unwrap_or(0.0));
        },
    }
    true
}

/// Checks body contact between the player and the boss.
#[must_use]
pub fn handle_player_enemy_collision(player: &Player, enemy: &Enemy) -> bool {
    player.is_alive() && !enemy.is_defeated() && check_circle_collision(player.circle(), enemy.circle())
}

/// Checks if the player is touching an item.
#[must_use]
pub fn handle_item_player_collision(item: &Item, player: &Player) -> bool {
    check_circle_collision(player.circle(), Circle::new(item.center(), item.radius()))
}

/// Inputs to [`resolve_projectiles`].
pub struct ProjectileContext<'a> {
    /// Walls near the camera
    pub walls: &'a [Rect],
    /// Camera for the off-screen cull
    pub camera: &'a Camera,
    /// Damage rules
    pub combat: &'a CombatConfig,
    /// Simulation clock
    pub now_ms: u64,
    /// Effect sink
    pub effects: &'a dyn EffectsSink,
}

/// What happened while resolving one tick of projectiles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectileReport {
    /// Projectiles removed this tick
    pub removed: usize,
    /// Strongest boss damage outcome this tick
    pub boss_outcome: Option<DamageOutcome>,
    /// An enemy bolt reached the player
    pub player_hit: bool,
}

impl ProjectileReport {
    fn record_boss(&mut self, outcome: DamageOutcome) {
        let stronger = match (self.boss_outcome, outcome) {
            (None, _) => true,
            (Some(DamageOutcome::Defeated), _) => false,
            (Some(_), DamageOutcome::Defeated | DamageOutcome::PhaseChanged { .. }) => true,
            (Some(_), DamageOutcome::Absorbed) => false,
        };
        if stronger {
            self.boss_outcome = Some(outcome);
        }
    }
}

/// Moves every projectile one tick and resolves its collisions.
///
/// All projectiles move before any check runs, so clashes compare bolts at
/// the same tick whatever their order in `projectiles`. Then, per projectile,
/// in order: walls, enemy bolts (player bolts only), the boss (player bolts
/// only), the player (enemy bolts only), the off-screen cull. A projectile
/// removed by an earlier check skips the later ones, and each removal happens
/// once.
pub fn resolve_projectiles(
    projectiles: &mut Vec<Projectile>,
    player: &mut Player,
    mut enemy: Option<&mut Enemy>,
    ctx: &ProjectileContext<'_>,
    rng: &mut fastrand::Rng,
) -> ProjectileReport {
    let mut report = ProjectileReport::default();
    let mut removed = vec![false; projectiles.len()];

    for projectile in projectiles.iter_mut() {
        projectile.advance();
    }

    for i in 0..projectiles.len() {
        if removed[i] {
            continue;
        }

        let hit_wall = ctx
            .walls
            .iter()
            .any(|wall| handle_projectile_wall_collision(&projectiles[i], wall, ctx.effects));
        if hit_wall {
            removed[i] = true;
            continue;
        }

        if !projectiles[i].from_enemy() {
            let bolt = projectiles[i].clone();
            let mut spent = false;
            for j in 0..projectiles.len() {
                if j == i || removed[j] {
                    continue;
                }
                match handle_projectile_projectile_collision(&bolt, &mut projectiles[j]) {
                    BoltClash::Miss => continue,
                    BoltClash::Absorbed => {},
                    BoltClash::Destroyed => removed[j] = true,
                }
                spent = true;
                break;
            }
            if spent {
                removed[i] = true;
                continue;
            }

            if let Some(enemy) = enemy.as_deref_mut() {
                if let Some(outcome) = handle_projectile_enemy_collision(
                    &bolt,
                    enemy,
                    ctx.combat.bolt_damage,
                    ctx.now_ms,
                    rng,
                    ctx.effects,
                ) {
                    report.record_boss(outcome);
                    removed[i] = true;
                    continue;
                }
            }
        } else if handle_projectile_player_collision(&projectiles[i], player, ctx.combat.lethality) {
            report.player_hit = true;
            removed[i] = true;
            continue;
        }

        if is_off_screen(&projectiles[i].bounding_box(), ctx.camera) {
            removed[i] = true;
        }
    }

    report.removed = removed.iter().filter(|gone| **gone).count();
    let mut flags = removed.into_iter();
    projectiles.retain(|_| !flags.next().unwrap_or(false));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use crate::effects::{NullSink, RecordingSink};
    use crate::enemy::EnemyConfig;
    use crate::player::PlayerConfig;
    use crate::projectile::{PlayerBoltConfig, ProjectileConfigs, ProjectileKind};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn camera() -> Camera {
        Camera::new(Vec2::new(1200.0, 800.0), CameraConfig::default())
    }

    fn player_at(center: Vec2) -> Player {
        Player::new(PlayerConfig::default(), center, Arc::new(NullSink))
    }

    fn boss_at(center: Vec2, phase_health: Vec<f32>) -> Enemy {
        let config = EnemyConfig {
            spawn_x: center.x,
            spawn_y: center.y,
            phase_health,
            ..EnemyConfig::default()
        };
        let mut rng = fastrand::Rng::with_seed(4);
        Enemy::new(config, 0, &mut rng, Arc::new(NullSink))
    }

    fn player_bolt(center: Vec2, direction: Vec2) -> Projectile {
        Projectile::player_bolt(center, direction, 15.0, &PlayerBoltConfig::default())
    }

    #[test]
    fn test_fast_move_into_wall_stops_at_face() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let old = Rect::new(80.0, 50.0, 10.0, 10.0);
        let new = Rect::new(105.0, 50.0, 10.0, 10.0);
        let resolved = resolve_wall_collision(old, new, &[wall]);
        assert!(resolved.right() <= 100.0, "{resolved:?}");
        assert!(resolved.x > 80.0);
        assert!(!resolved.intersects(&wall));
    }

    #[test]
    fn test_clear_move_is_unchanged() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let old = Rect::new(0.0, 0.0, 10.0, 10.0);
        let new = old.translated(Vec2::new(5.0, 5.0));
        assert_eq!(resolve_wall_collision(old, new, &[wall]), new);
    }

    #[test]
    fn test_diagonal_move_slides_along_wall() {
        let wall = Rect::new(100.0, 0.0, 20.0, 400.0);
        let old = Rect::new(85.0, 50.0, 10.0, 10.0);
        let new = old.translated(Vec2::new(10.0, 10.0));
        let resolved = resolve_wall_collision(old, new, &[wall]);
        assert!(!resolved.intersects(&wall));
        assert!((resolved.y - 60.0).abs() < 1e-3, "should keep sliding down: {resolved:?}");
    }

    #[test]
    fn test_push_out_uses_smallest_overlap() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let stuck = Rect::new(95.0, 50.0, 10.0, 10.0);
        let freed = push_out_of_walls(stuck, &[wall]);
        assert_eq!(freed.x, 90.0);
        assert_eq!(freed.y, 50.0);
    }

    #[test]
    fn test_move_with_walls_frees_stuck_box() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let stuck = Rect::new(95.0, 50.0, 10.0, 10.0);
        let moved = move_with_walls(stuck, Vec2::new(0.0, 5.0), &[wall]);
        assert!(!moved.intersects(&wall));
        assert!((moved.y - 55.0).abs() < 1e-4);
    }

    #[test]
    fn test_far_projectile_is_off_screen() {
        let mut cam = camera();
        cam.set_offset(Vec2::new(2000.0, 0.0));
        let far = Rect::new(cam.x() - 1000.0, 100.0, 4.0, 4.0);
        assert!(is_off_screen(&far, &cam));
        let near = Rect::new(cam.x() + 10.0, 100.0, 4.0, 4.0);
        assert!(!is_off_screen(&near, &cam));
    }

    #[test]
    fn test_struck_face_normals() {
        let wall = Rect::new(100.0, 100.0, 20.0, 20.0);
        let (point, normal) = struck_face(Vec2::new(90.0, 110.0), Vec2::new(105.0, 110.0), &wall);
        assert_eq!(point, Vec2::new(100.0, 110.0));
        assert!((normal - PI).abs() < 1e-6);

        let (point, normal) = struck_face(Vec2::new(110.0, 130.0), Vec2::new(110.0, 118.0), &wall);
        assert_eq!(point, Vec2::new(110.0, 120.0));
        assert!((normal - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_bolt_tunnelling_through_thin_wall_is_caught() {
        let sink = RecordingSink::new();
        let wall = Rect::new(100.0, 0.0, 4.0, 200.0);
        let mut bolt = player_bolt(Vec2::new(95.0, 50.0), Vec2::X);
        bolt.advance();
        assert!(!bolt.bounding_box().intersects(&wall));
        assert!(handle_projectile_wall_collision(&bolt, &wall, &sink));
        assert_eq!(sink.count(EffectKind::WallHit), 1);
    }

    #[test]
    fn test_player_bolt_shrinks_enemy_bolt() {
        let configs = ProjectileConfigs::default();
        let mut enemy_bolt = Projectile::enemy(ProjectileKind::Basic, Vec2::ZERO, 0.0, &configs.basic);
        let bolt = player_bolt(Vec2::new(5.0, 0.0), Vec2::X);

        assert_eq!(handle_projectile_projectile_collision(&bolt, &mut enemy_bolt), BoltClash::Absorbed);
        assert!((enemy_bolt.radius() - 16.0).abs() < 1e-4);
        assert_eq!(enemy_bolt.center(), Vec2::ZERO);

        // Enemy bolts never cancel each other
        let mut other = enemy_bolt.clone();
        assert_eq!(handle_projectile_projectile_collision(&enemy_bolt, &mut other), BoltClash::Miss);
    }

    #[test]
    fn test_enemy_bolt_kills_player() {
        let configs = ProjectileConfigs::default();
        let mut player = player_at(Vec2::new(10.0, 0.0));
        let bolt = Projectile::enemy(ProjectileKind::Basic, Vec2::ZERO, 0.0, &configs.basic);
        assert!(handle_projectile_player_collision(&bolt, &mut player, Lethality::OneHit));
        assert!(!player.is_alive());
    }

    #[test]
    fn test_sustained_bolt_drains_health() {
        let configs = ProjectileConfigs::default();
        let mut player = player_at(Vec2::new(10.0, 0.0));
        let bolt = Projectile::enemy(ProjectileKind::PhaseTwo, Vec2::ZERO, 0.0, &configs.phase_two);
        assert!(handle_projectile_player_collision(&bolt, &mut player, Lethality::Sustained));
        assert!(player.is_alive());
        assert!((player.health() - 52.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_bolt_damages_boss() {
        let sink = RecordingSink::new();
        let mut rng = fastrand::Rng::with_seed(1);
        let mut boss = boss_at(Vec2::ZERO, vec![2.0, 10.0, 10.0]);
        let bolt = player_bolt(Vec2::new(40.0, 0.0), Vec2::X);

        let first = handle_projectile_enemy_collision(&bolt, &mut boss, 1.0, 0, &mut rng, &sink);
        assert_eq!(first, Some(DamageOutcome::Absorbed));
        let second = handle_projectile_enemy_collision(&bolt, &mut boss, 1.0, 0, &mut rng, &sink);
        assert_eq!(second, Some(DamageOutcome::PhaseChanged { phase: 2 }));
        assert_eq!(sink.count(EffectKind::WallHit), 2);

        let miss = player_bolt(Vec2::new(500.0, 0.0), Vec2::X);
        assert!(handle_projectile_enemy_collision(&miss, &mut boss, 1.0, 0, &mut rng, &sink).is_none());
    }

    #[test]
    fn test_body_contact() {
        let boss = boss_at(Vec2::ZERO, vec![10.0]);
        assert!(handle_player_enemy_collision(&player_at(Vec2::new(55.0, 0.0)), &boss));
        assert!(!handle_player_enemy_collision(&player_at(Vec2::new(60.0, 0.0)), &boss));
    }

    #[test]
    fn test_resolve_projectiles_removes_each_bolt_once() {
        let configs = ProjectileConfigs::default();
        let cam = camera();
        let combat = CombatConfig::default();
        let sink = RecordingSink::new();
        let wall = Rect::new(200.0, 0.0, 15.0, 800.0);
        let ctx = ProjectileContext {
            walls: &[wall],
            camera: &cam,
            combat: &combat,
            now_ms: 0,
            effects: &sink,
        };
        let mut rng = fastrand::Rng::with_seed(1);
        let mut player = player_at(Vec2::new(900.0, 700.0));

        let mut projectiles = vec![
            // Hits the wall
            player_bolt(Vec2::new(190.0, 100.0), Vec2::X),
            // Meets the enemy bolt below
            player_bolt(Vec2::new(500.0, 300.0), Vec2::X),
            Projectile::enemy(ProjectileKind::Basic, Vec2::new(530.0, 300.0), PI, &configs.basic),
            // Leaves the screen
            player_bolt(Vec2::new(-50.0, 400.0), -Vec2::X),
            // Keeps flying
            player_bolt(Vec2::new(600.0, 600.0), Vec2::Y),
        ];

        let report = resolve_projectiles(&mut projectiles, &mut player, None, &ctx, &mut rng);
        assert_eq!(report.removed, 3);
        assert_eq!(projectiles.len(), 2);
        assert!(projectiles.iter().any(|p| p.from_enemy() && p.hits() == 1));
        assert!(!report.player_hit);
        assert!(player.is_alive());
    }

    #[test]
    fn test_clash_ignores_projectile_order() {
        let configs = ProjectileConfigs::default();
        let cam = camera();
        let combat = CombatConfig::default();
        let ctx = ProjectileContext {
            walls: &[],
            camera: &cam,
            combat: &combat,
            now_ms: 0,
            effects: &NullSink,
        };
        let mut rng = fastrand::Rng::with_seed(1);
        let mut player = player_at(Vec2::new(900.0, 700.0));

        // 35 apart now, 20 apart once both have moved
        let bolt = player_bolt(Vec2::new(500.0, 300.0), Vec2::X);
        let enemy_bolt = Projectile::enemy(ProjectileKind::Basic, Vec2::new(550.0, 300.0), PI, &configs.basic);

        for mut projectiles in [
            vec![bolt.clone(), enemy_bolt.clone()],
            vec![enemy_bolt.clone(), bolt.clone()],
        ] {
            let report = resolve_projectiles(&mut projectiles, &mut player, None, &ctx, &mut rng);
            assert_eq!(report.removed, 1);
            assert_eq!(projectiles.len(), 1);
            assert!(projectiles[0].from_enemy());
            assert_eq!(projectiles[0].hits(), 1);
        }
    }

    #[test]
    fn test_resolve_projectiles_reports_boss_outcome() {
        let cam = camera();
        let combat = CombatConfig::default();
        let ctx = ProjectileContext {
            walls: &[],
            camera: &cam,
            combat: &combat,
            now_ms: 0,
            effects: &NullSink,
        };
        let mut rng = fastrand::Rng::with_seed(1);
        let mut player = player_at(Vec2::new(900.0, 700.0));
        let mut boss = boss_at(Vec2::new(300.0, 300.0), vec![2.0]);
        let mut projectiles = vec![
            player_bolt(Vec2::new(240.0, 300.0), Vec2::X),
            player_bolt(Vec2::new(360.0, 300.0), -Vec2::X),
        ];

        let report = resolve_projectiles(&mut projectiles, &mut player, Some(&mut boss), &ctx, &mut rng);
        assert_eq!(report.boss_outcome, Some(DamageOutcome::Defeated));
        assert_eq!(report.removed, 2);
        assert!(boss.is_defeated());
    }

    proptest! {
        #[test]
        fn prop_resolved_box_never_overlaps_walls(
            ox in -200.0f32..200.0, oy in -200.0f32..200.0,
            dx in -40.0f32..40.0, dy in -40.0f32..40.0,
            walls in proptest::collection::vec(
                (-200.0f32..200.0, -200.0f32..200.0, 5.0f32..60.0, 5.0f32..60.0),
                1..6,
            ),
        ) {
            let walls: Vec<Rect> = walls.into_iter().map(|(x, y, w, h)| Rect::new(x, y, w, h)).collect();
            let old = Rect::new(ox, oy, 20.0, 20.0);
            prop_assume!(!old.intersects_any(&walls));

            let resolved = resolve_wall_collision(old, old.translated(Vec2::new(dx, dy)), &walls);
            prop_assert!(!resolved.intersects_any(&walls));
        }
    }
}
