//! Game configuration.
//!
//! Every tunable of the simulation lives in [`GameConfig`]. The file is
//! TOML; any section or field left out takes its default.

use std::fs;
use std::io::Write;
use std::path::Path;

use bastion_common::ConfigError;
use bastion_gameplay::{
    CameraConfig, CombatConfig, EnemyConfig, ItemConfig, PlayerConfig, ProjectileConfigs,
};
use bastion_world::LevelConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "bastion.toml";

/// Window and tick rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in world units
    pub width: u32,
    /// Viewport height in world units
    pub height: u32,
    /// Simulation ticks per second
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            fps: 60,
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World seed (None = random)
    pub seed: Option<u64>,
    /// Window
    pub window: WindowConfig,
    /// Player
    pub player: PlayerConfig,
    /// Boss
    pub enemy: EnemyConfig,
    /// Projectiles
    pub projectiles: ProjectileConfigs,
    /// Level generation
    pub level: LevelConfig,
    /// Camera
    pub camera: CameraConfig,
    /// Items
    pub items: ItemConfig,
    /// Damage rules
    pub combat: CombatConfig,
}

impl GameConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Ignoring config file {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Load and validate configuration, reporting why it failed.
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid("window", "size must be non-zero"));
        }
        if self.window.fps == 0 || self.window.fps > 1000 {
            return Err(ConfigError::invalid("window.fps", "must be within 1..=1000"));
        }

        positive("player.radius", self.player.radius)?;
        positive("player.base_speed", self.player.base_speed)?;
        positive("player.max_health", self.player.max_health)?;
        positive("player.max_stamina", self.player.max_stamina)?;
        fraction("player.exhaustion_threshold", self.player.exhaustion_threshold)?;

        positive("enemy.radius", self.enemy.radius)?;
        if self.enemy.phase_health.is_empty() {
            return Err(ConfigError::invalid("enemy.phase_health", "needs at least one phase"));
        }
        if self.enemy.phase_health.len() > usize::from(u8::MAX) {
            return Err(ConfigError::invalid("enemy.phase_health", "too many phases"));
        }
        for health in &self.enemy.phase_health {
            positive("enemy.phase_health", *health)?;
        }
        fraction("enemy.wall_slowdown", self.enemy.wall_slowdown)?;
        if self.enemy.state_interval_min_ms > self.enemy.state_interval_max_ms {
            return Err(ConfigError::invalid(
                "enemy.state_interval_min_ms",
                "must not exceed state_interval_max_ms",
            ));
        }

        for (name, bolt) in [
            ("projectiles.basic", &self.projectiles.basic),
            ("projectiles.phase_two", &self.projectiles.phase_two),
            ("projectiles.predictive", &self.projectiles.predictive),
        ] {
            positive(&format!("{name}.radius"), bolt.radius)?;
            positive(&format!("{name}.speed"), bolt.speed)?;
            if !(bolt.shrink_rate > 0.0 && bolt.shrink_rate < 1.0) {
                return Err(ConfigError::invalid(
                    format!("{name}.shrink_rate"),
                    "must be within (0, 1)",
                ));
            }
            if bolt.max_hits == 0 {
                return Err(ConfigError::invalid(format!("{name}.max_hits"), "must be at least 1"));
            }
        }
        positive("projectiles.player.radius", self.projectiles.player.radius)?;
        positive("projectiles.player.speed", self.projectiles.player.speed)?;

        fraction("camera.lerp_speed", self.camera.lerp_speed)?;
        fraction("items.spawn_chance", self.items.spawn_chance)?;
        positive("items.radius", self.items.radius)?;

        self.level
            .validate()
            .map_err(|e| ConfigError::invalid("level", e.to_string()))?;
        Ok(())
    }

    /// Viewport size in world units.
    #[must_use]
    pub fn viewport(&self) -> bastion_common::Vec2 {
        bastion_common::Vec2::new(self.window.width as f32, self.window.height as f32)
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn fraction(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_gameplay::Lethality;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.fps, 60);
        assert_eq!(config.enemy.phase_health.len(), 3);
        assert_eq!(config.combat.lethality, Lethality::OneHit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let mut config = GameConfig::default();
        config.seed = Some(12345);
        config.combat.lethality = Lethality::Sustained;
        config.enemy.phase_health = vec![10.0, 20.0];

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = GameConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "seed = 7\n[player]\nbase_speed = 8.0\n").expect("write");

        let loaded = GameConfig::try_load(&config_path).expect("valid config");
        assert_eq!(loaded.seed, Some(7));
        assert!((loaded.player.base_speed - 8.0).abs() < f32::EPSILON);
        assert!((loaded.player.radius - 10.0).abs() < f32::EPSILON);
        assert_eq!(loaded.level, LevelConfig::default());
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = GameConfig::load_from("/nonexistent/path/bastion.toml");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[items]\nspawn_chance = 1.5\n").expect("write");

        assert!(matches!(
            GameConfig::try_load(&config_path),
            Err(ConfigError::Invalid { .. })
        ));
        assert_eq!(GameConfig::load_from(&config_path), GameConfig::default());

        fs::write(&config_path, "window = 3").expect("write");
        assert!(matches!(GameConfig::try_load(&config_path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_rejects_degenerate_values() {
        let mut config = GameConfig::default();
        config.enemy.phase_health.clear();
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.level.gaps_per_wall = 3;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.player.radius = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_serialization() {
        let config = GameConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[window]"));
        assert!(toml_str.contains("lethality"));
    }
}
