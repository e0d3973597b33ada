//! Chunk data: the wall segments owned by one cell of the world grid.

use bastion_common::{ChunkCoord, ChunkSize, Rect};

/// A generated chunk of level geometry.
///
/// Chunks are built in full before they are published and are never
/// mutated afterwards; the streaming map hands out `Arc<Chunk>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Chunk coordinate
    coord: ChunkCoord,
    /// Wall segments, in generation order
    walls: Vec<Rect>,
}

impl Chunk {
    /// Creates a chunk from its generated walls.
    #[must_use]
    pub fn new(coord: ChunkCoord, walls: Vec<Rect>) -> Self {
        Self { coord, walls }
    }

    /// Creates a chunk with no walls.
    #[must_use]
    pub fn empty(coord: ChunkCoord) -> Self {
        Self::new(coord, Vec::new())
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the wall segments.
    #[must_use]
    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    /// Number of wall segments.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// World-space area covered by this chunk.
    #[must_use]
    pub fn bounds(&self, size: ChunkSize) -> Rect {
        let origin = self.coord.origin(size);
        Rect::new(origin.x, origin.y, size.width as f32, size.height as f32)
    }

    /// Checks if `rect` overlaps any wall of this chunk.
    #[must_use]
    pub fn blocks(&self, rect: &Rect) -> bool {
        rect.intersects_any(&self.walls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_bounds() {
        let chunk = Chunk::empty(ChunkCoord::new(-1, 2));
        let bounds = chunk.bounds(ChunkSize::new(1200, 800));
        assert_eq!(bounds, Rect::new(-1200.0, 1600.0, 1200.0, 800.0));
        assert_eq!(chunk.wall_count(), 0);
    }

    #[test]
    fn test_chunk_blocks() {
        let chunk = Chunk::new(
            ChunkCoord::new(0, 0),
            vec![Rect::new(100.0, 0.0, 15.0, 300.0)],
        );
        assert!(chunk.blocks(&Rect::new(110.0, 10.0, 20.0, 20.0)));
        assert!(!chunk.blocks(&Rect::new(115.0, 10.0, 20.0, 20.0)));
    }
}
