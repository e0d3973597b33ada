//! Procedural level generation.
//!
//! Every chunk except the spawn chunk is filled by a recursive binary space
//! partition: a region is cut by a wall through its midpoint, the wall gets
//! one or two doorway gaps, and each side is cut again until the rooms get
//! too small or the depth limit is hit. The spawn chunk holds a fixed square
//! room with a doorway centred on each side.

use bastion_common::{ChunkCoord, ChunkSize, Rect, Vec2, WorldError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunk::Chunk;

/// Level generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Size of one chunk (one screen)
    pub chunk_size: ChunkSize,
    /// Rooms are never split below this size
    pub min_room_size: f32,
    /// Side length of the square spawn room
    pub spawn_room_size: f32,
    /// Wall thickness
    pub wall_thickness: f32,
    /// Doorway width
    pub gap_size: f32,
    /// Deepest BSP level that may still split
    pub max_depth: u32,
    /// Chance that a region below the root stops splitting
    pub split_chance: f32,
    /// Doorways per wall (1 or 2)
    pub gaps_per_wall: u32,
    /// Chunks within this many chunks of the camera are generated
    pub generation_radius: u32,
    /// Chunks within this many chunks of the camera supply visible walls
    pub visible_radius: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            chunk_size: ChunkSize::default(),
            min_room_size: 150.0,
            spawn_room_size: 750.0,
            wall_thickness: 15.0,
            gap_size: 60.0,
            max_depth: 2,
            split_chance: 0.3,
            gaps_per_wall: 1,
            generation_radius: 2,
            visible_radius: 1,
        }
    }
}

impl LevelConfig {
    /// Centre of the spawn chunk, where the player starts.
    #[must_use]
    pub fn spawn_point(&self) -> Vec2 {
        self.chunk_size.as_vec2() / 2.0
    }

    /// Smallest region extent that can take a split along one axis.
    #[must_use]
    pub fn min_split_extent(&self) -> f32 {
        self.min_room_size * 2.0 + self.wall_thickness
    }

    /// Checks that these parameters can produce geometry.
    pub fn validate(&self) -> Result<(), WorldError> {
        let invalid = |reason: &str| Err(WorldError::InvalidConfig(reason.to_string()));

        if self.chunk_size.width == 0 || self.chunk_size.height == 0 {
            return invalid("chunk size must be non-zero");
        }
        for (name, value) in [
            ("min_room_size", self.min_room_size),
            ("spawn_room_size", self.spawn_room_size),
            ("wall_thickness", self.wall_thickness),
            ("gap_size", self.gap_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(&format!("{name} must be a positive number"));
            }
        }
        if !(0.0..=1.0).contains(&self.split_chance) {
            return invalid("split_chance must be within [0, 1]");
        }
        if !(1..=2).contains(&self.gaps_per_wall) {
            return invalid("gaps_per_wall must be 1 or 2");
        }
        if self.spawn_room_size <= self.gap_size + 2.0 * self.wall_thickness {
            return invalid("spawn room is too small for its doorways");
        }
        let chunk = self.chunk_size.as_vec2();
        if self.spawn_room_size > chunk.x.min(chunk.y) {
            return invalid("spawn room does not fit inside the spawn chunk");
        }
        Ok(())
    }
}

/// Something that can build the contents of a chunk.
///
/// Implemented by [`ChunkGenerator`]; the streaming layer only sees this
/// trait so alternative sources can be plugged in.
pub trait ChunkSource: Send + Sync {
    /// Builds the chunk at `coord`.
    fn generate(&self, coord: ChunkCoord) -> Result<Chunk, WorldError>;
}

/// Seeded BSP level generator.
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    /// Configuration
    config: LevelConfig,
    /// World seed
    seed: u64,
}

impl ChunkGenerator {
    /// Creates a generator for the given world seed.
    #[must_use]
    pub fn new(config: LevelConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// Returns the generator configuration.
    #[must_use]
    pub const fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// RNG for a specific chunk, derived from the world seed and coordinate.
    #[must_use]
    pub fn chunk_rng(&self, coord: ChunkCoord) -> fastrand::Rng {
        let mut state = self.seed;
        state = state.wrapping_mul(31).wrapping_add(coord.x as u64);
        state = state.wrapping_mul(31).wrapping_add(coord.y as u64);
        fastrand::Rng::with_seed(state)
    }

    /// Builds the walls of the chunk at `coord`.
    ///
    /// The origin chunk always receives the spawn room.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Result<Chunk, WorldError> {
        let walls = if coord == ChunkCoord::new(0, 0) {
            self.generate_spawn_room()
        } else {
            let origin = coord.origin(self.config.chunk_size);
            let size = self.config.chunk_size.as_vec2();
            let mut rng = self.chunk_rng(coord);
            self.split_region(Rect::new(origin.x, origin.y, size.x, size.y), &mut rng)
        };

        if let Some(bad) = walls.iter().find(|wall| !wall.is_finite()) {
            return Err(WorldError::GenerationFailed {
                x: coord.x,
                y: coord.y,
                reason: format!("non-finite wall {bad:?}"),
            });
        }

        debug!(
            "Generated chunk ({}, {}) with {} walls",
            coord.x,
            coord.y,
            walls.len()
        );
        Ok(Chunk::new(coord, walls))
    }

    /// Square room around the spawn point with a doorway centred on each
    /// side. Always yields eight segments.
    #[must_use]
    pub fn generate_spawn_room(&self) -> Vec<Rect> {
        let room = self.config.spawn_room_size;
        let thickness = self.config.wall_thickness;
        let center = self.config.spawn_point();

        let half = (room / 2.0).floor();
        let segment = ((room - self.config.gap_size) / 2.0).floor();
        let left = center.x - half;
        let right = center.x + half;
        let top = center.y - half;
        let bottom = center.y + half;

        vec![
            // North
            Rect::new(left, top, segment, thickness),
            Rect::new(right - segment, top, segment, thickness),
            // South
            Rect::new(left, bottom - thickness, segment, thickness),
            Rect::new(right - segment, bottom - thickness, segment, thickness),
            // West
            Rect::new(left, top, thickness, segment),
            Rect::new(left, bottom - segment, thickness, segment),
            // East
            Rect::new(right - thickness, top, thickness, segment),
            Rect::new(right - thickness, bottom - segment, thickness, segment),
        ]
    }

    /// Recursively partitions `region` and returns the generated walls.
    pub fn split_region(&self, region: Rect, rng: &mut fastrand::Rng) -> Vec<Rect> {
        let mut walls = Vec::new();
        self.split_area(region, 0, rng, &mut walls);
        walls
    }

    fn split_area(&self, region: Rect, depth: u32, rng: &mut fastrand::Rng, walls: &mut Vec<Rect>) {
        let cfg = &self.config;
        if depth > cfg.max_depth {
            return;
        }

        let can_split_vertical = region.w >= cfg.min_split_extent();
        let can_split_horizontal = region.h >= cfg.min_split_extent();

        if depth > 0 && rng.f32() < cfg.split_chance {
            return;
        }

        let split_vertical = match (can_split_vertical, can_split_horizontal) {
            (true, true) => region.w > region.h,
            (true, false) => true,
            (false, true) => false,
            (false, false) => return,
        };

        let thickness = cfg.wall_thickness;
        if split_vertical {
            let wall_x = region.x + (region.w / 2.0).floor();
            let Some(segments) = self.wall_segments(region.y, region.h, rng) else {
                debug!("Skipping vertical split of {region:?}: no room for a doorway");
                return;
            };
            walls.extend(
                segments
                    .into_iter()
                    .map(|(start, len)| Rect::new(wall_x, start, thickness, len)),
            );

            let left_width = wall_x - region.x;
            if left_width > cfg.min_room_size {
                let left = Rect::new(region.x, region.y, left_width, region.h);
                self.split_area(left, depth + 1, rng, walls);
            }
            let right_width = region.w - left_width - thickness;
            if right_width > cfg.min_room_size {
                let right = Rect::new(wall_x + thickness, region.y, right_width, region.h);
                self.split_area(right, depth + 1, rng, walls);
            }
        } else {
            let wall_y = region.y + (region.h / 2.0).floor();
            let Some(segments) = self.wall_segments(region.x, region.w, rng) else {
                debug!("Skipping horizontal split of {region:?}: no room for a doorway");
                return;
            };
            walls.extend(
                segments
                    .into_iter()
                    .map(|(start, len)| Rect::new(start, wall_y, len, thickness)),
            );

            let top_height = wall_y - region.y;
            if top_height > cfg.min_room_size {
                let top = Rect::new(region.x, region.y, region.w, top_height);
                self.split_area(top, depth + 1, rng, walls);
            }
            let bottom_height = region.h - top_height - thickness;
            if bottom_height > cfg.min_room_size {
                let bottom = Rect::new(region.x, wall_y + thickness, region.w, bottom_height);
                self.split_area(bottom, depth + 1, rng, walls);
            }
        }
    }

    /// Lays doorways along a wall spanning `[lo, lo + len)` and returns the
    /// solid `(start, length)` pieces between them.
    ///
    /// Returns `None` when a doorway cannot be placed with solid wall on
    /// both sides.
    fn wall_segments(&self, lo: f32, len: f32, rng: &mut fastrand::Rng) -> Option<Vec<(f32, f32)>> {
        let gap = self.config.gap_size;
        let hi = lo + len;

        let gaps = if self.config.gaps_per_wall >= 2 {
            let half = (len / 2.0).floor();
            let first = pick_in_range(rng, lo + gap, lo + half - gap)?;
            let second = pick_in_range(rng, lo + half, hi - gap)?;
            vec![first, second]
        } else {
            vec![pick_in_range(rng, lo + gap, hi - 2.0 * gap)?]
        };

        let mut segments = Vec::with_capacity(gaps.len() + 1);
        let mut cursor = lo;
        for gap_start in gaps {
            segments.push((cursor, gap_start - cursor));
            cursor = gap_start + gap;
        }
        segments.push((cursor, hi - cursor));
        segments.retain(|&(_, length)| length > 0.0);
        Some(segments)
    }
}

impl ChunkSource for ChunkGenerator {
    fn generate(&self, coord: ChunkCoord) -> Result<Chunk, WorldError> {
        self.generate_chunk(coord)
    }
}

/// Uniform value in `[min, max]`, or `None` for an inverted range.
fn pick_in_range(rng: &mut fastrand::Rng, min: f32, max: f32) -> Option<f32> {
    (min <= max).then(|| min + rng.f32() * (max - min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn generator() -> ChunkGenerator {
        ChunkGenerator::new(LevelConfig::default(), 42)
    }

    #[test]
    fn test_spawn_room_has_eight_segments_and_open_doorways() {
        let gen = generator();
        let walls = gen.generate_spawn_room();
        assert_eq!(walls.len(), 8);

        let c = gen.config().spawn_point();
        let half = 375.0;
        let t = gen.config().wall_thickness / 2.0;
        let doorways = [
            Vec2::new(c.x, c.y - half + t),
            Vec2::new(c.x, c.y + half - t),
            Vec2::new(c.x - half + t, c.y),
            Vec2::new(c.x + half - t, c.y),
        ];
        for door in doorways {
            assert!(
                !walls.iter().any(|w| w.contains_point(door)),
                "doorway at {door:?} is blocked"
            );
        }
    }

    #[test]
    fn test_origin_chunk_is_spawn_room() {
        let gen = generator();
        let chunk = gen.generate_chunk(ChunkCoord::new(0, 0)).expect("spawn chunk");
        assert_eq!(chunk.walls(), gen.generate_spawn_room().as_slice());
    }

    #[test]
    fn test_split_guard_skips_when_no_doorway_fits() {
        let gen = ChunkGenerator::new(
            LevelConfig {
                split_chance: 0.0,
                ..LevelConfig::default()
            },
            7,
        );
        let extent = gen.config().min_split_extent();
        let mut rng = fastrand::Rng::with_seed(1);

        // Splittable across x, but a 100-unit wall cannot hold a doorway.
        let walls = gen.split_region(Rect::new(0.0, 0.0, extent, 100.0), &mut rng);
        assert!(walls.is_empty());
    }

    #[test]
    fn test_split_at_exact_minimum_extent() {
        let gen = ChunkGenerator::new(
            LevelConfig {
                split_chance: 0.0,
                max_depth: 0,
                ..LevelConfig::default()
            },
            7,
        );
        let extent = gen.config().min_split_extent();
        let region = Rect::new(0.0, 0.0, extent, extent);
        let mut rng = fastrand::Rng::with_seed(3);

        let walls = gen.split_region(region, &mut rng);
        assert_eq!(walls.len(), 2);
        let solid: f32 = walls.iter().map(|w| w.w).sum();
        assert!((solid - (extent - gen.config().gap_size)).abs() < 1e-3);
        for wall in &walls {
            assert!(wall.w > 0.0 && wall.h > 0.0);
            assert!(wall.left() >= region.left() && wall.right() <= region.right());
        }
    }

    #[test]
    fn test_two_doorways_per_wall() {
        let gen = ChunkGenerator::new(
            LevelConfig {
                max_depth: 0,
                gaps_per_wall: 2,
                ..LevelConfig::default()
            },
            11,
        );
        let chunk = gen.generate_chunk(ChunkCoord::new(1, 0)).expect("chunk");
        let walls = chunk.walls();
        assert!((2..=3).contains(&walls.len()));

        // Single vertical wall through a 1200x800 chunk
        let solid: f32 = walls.iter().map(|w| w.h).sum();
        assert!((solid - (800.0 - 2.0 * 60.0)).abs() < 1e-3);
    }

    #[test]
    fn test_generation_deterministic() {
        let a = ChunkGenerator::new(LevelConfig::default(), 42);
        let b = ChunkGenerator::new(LevelConfig::default(), 42);
        let coord = ChunkCoord::new(3, -2);
        assert_eq!(
            a.generate_chunk(coord).expect("chunk"),
            b.generate_chunk(coord).expect("chunk")
        );
    }

    #[test]
    fn test_different_seeds_different_walls() {
        let a = ChunkGenerator::new(LevelConfig::default(), 1);
        let b = ChunkGenerator::new(LevelConfig::default(), 2);
        let coord = ChunkCoord::new(1, 0);
        assert_ne!(
            a.generate_chunk(coord).expect("chunk").walls(),
            b.generate_chunk(coord).expect("chunk").walls()
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(LevelConfig::default().validate().is_ok());
        let bad = LevelConfig {
            gaps_per_wall: 3,
            ..LevelConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = LevelConfig {
            spawn_room_size: 2000.0,
            ..LevelConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_walls_stay_inside_their_chunk(
            seed in any::<u64>(),
            cx in -20i32..20,
            cy in -20i32..20,
            gaps in 1u32..=2,
        ) {
            let gen = ChunkGenerator::new(
                LevelConfig { gaps_per_wall: gaps, ..LevelConfig::default() },
                seed,
            );
            let coord = ChunkCoord::new(cx, cy);
            let chunk = gen.generate_chunk(coord).expect("chunk");
            let bounds = chunk.bounds(gen.config().chunk_size);
            for wall in chunk.walls() {
                prop_assert!(wall.w > 0.0 && wall.h > 0.0);
                prop_assert!(wall.left() >= bounds.left() - 1e-3);
                prop_assert!(wall.right() <= bounds.right() + 1e-3);
                prop_assert!(wall.top() >= bounds.top() - 1e-3);
                prop_assert!(wall.bottom() <= bounds.bottom() + 1e-3);
            }
        }
    }
}
