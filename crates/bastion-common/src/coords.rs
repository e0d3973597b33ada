//! Chunk coordinate types and world-to-chunk mapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size of a chunk in world units.
///
/// Chunks are rectangular; the default matches one screen (1200×800).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkSize {
    /// Chunk width in world units
    pub width: u32,
    /// Chunk height in world units
    pub height: u32,
}

impl ChunkSize {
    /// Creates a new chunk size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the size as a vector.
    #[must_use]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Maps a world position to the chunk containing it.
    ///
    /// Uses floor division, so negative positions land in negative chunks.
    #[must_use]
    pub fn from_world(position: Vec2, size: ChunkSize) -> Self {
        Self {
            x: (position.x / size.width as f32).floor() as i32,
            y: (position.y / size.height as f32).floor() as i32,
        }
    }

    /// Converts to world coordinate (top-left corner of chunk).
    #[must_use]
    pub fn origin(self, size: ChunkSize) -> Vec2 {
        Vec2::new(
            self.x as f32 * size.width as f32,
            self.y as f32 * size.height as f32,
        )
    }

    /// Returns the chunk offset by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Iterates the square neighbourhood of `radius` chunks around this one,
    /// row by row, including the centre.
    pub fn neighborhood(self, radius: u32) -> impl Iterator<Item = ChunkCoord> {
        let r = radius as i32;
        (-r..=r).flat_map(move |dy| (-r..=r).map(move |dx| self.offset(dx, dy)))
    }
}
