//! # Bastion Gameplay
//!
//! Gameplay systems for Bastion.
//!
//! This crate provides the entity layer of the boss fight:
//! - Player with sprint stamina and aimed bolts
//! - Boss with three phases and a behaviour state machine
//! - Projectiles (enemy volleys and player bolts)
//! - Stamina pickups
//! - Swept wall collision and pairwise hit resolution
//! - Follow camera
//! - Input and visual effect collaborator contracts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ai;
pub mod camera;
pub mod collision;
pub mod effects;
pub mod enemy;
pub mod input;
pub mod item;
pub mod player;
pub mod projectile;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ai::*;
    pub use crate::camera::*;
    pub use crate::collision::*;
    pub use crate::effects::*;
    pub use crate::enemy::*;
    pub use crate::input::*;
    pub use crate::item::*;
    pub use crate::player::*;
    pub use crate::projectile::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_common::Vec2;

    #[test]
    fn test_player_bolt_reaches_boss() {
        let bus = EffectBus::default();
        let mut rng = fastrand::Rng::with_seed(7);
        let player = Player::new(PlayerConfig::default(), Vec2::new(300.0, 0.0), bus.sink());
        let mut boss = Enemy::new(EnemyConfig::default(), 0, &mut rng, bus.sink());

        let config = PlayerBoltConfig {
            inaccuracy: 0.0,
            speed_variation: 0.0,
            ..PlayerBoltConfig::default()
        };
        let mut bolt = player.shoot(&AimInput::stick(-Vec2::X), Vec2::ZERO, &config, &mut rng);
        let sink = bus.sink();
        let mut outcome = None;
        for tick in 0..40 {
            bolt.advance();
            outcome = handle_projectile_enemy_collision(&bolt, &mut boss, 1.0, tick, &mut rng, sink.as_ref());
            if outcome.is_some() {
                break;
            }
        }

        assert_eq!(outcome, Some(DamageOutcome::Absorbed));
        assert!((boss.health() - 999.0).abs() < 1e-4);
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_sprinting_player_feeds_effect_bus() {
        let bus = EffectBus::new(4);
        let mut player = Player::new(PlayerConfig::default(), Vec2::ZERO, bus.sink());
        for _ in 0..10 {
            player.update(&InputSnapshot::moving(Vec2::Y).with_sprint(), &[]);
        }
        // Bounded bus drops the overflow
        let drained = bus.drain();
        assert_eq!(drained.len(), 4);
        assert!(drained.iter().all(|e| e.kind == EffectKind::Boost));
    }
}
