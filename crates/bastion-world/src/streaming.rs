//! Chunk streaming around the camera.
//!
//! The [`LevelGenerator`] owns the published chunk map and a single
//! background worker. The simulation thread calls [`LevelGenerator::update`]
//! once per tick; missing chunks near the camera are marked pending and sent
//! to the worker, which builds each one in full before inserting it. Reads
//! never block on generation: a chunk is either absent or complete.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bastion_common::{ChunkCoord, ChunkSize, Rect, Vec2, WorldError};
use crossbeam_channel::{Receiver, Sender};
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::chunk::Chunk;
use crate::generation::{ChunkGenerator, ChunkSource, LevelConfig};

/// How chunk requests are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingMode {
    /// Requests go to the background worker thread.
    Background,
    /// Requests are generated on the calling thread during `update`.
    Inline,
}

/// Counters for chunk generation outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Chunks requested from the source
    pub requested: u64,
    /// Chunks successfully published
    pub generated: u64,
    /// Requests that errored or panicked
    pub failed: u64,
}

/// State shared between the simulation thread and the worker.
struct Shared {
    chunks: DashMap<ChunkCoord, Arc<Chunk>>,
    pending: DashSet<ChunkCoord>,
    source: Arc<dyn ChunkSource>,
    stats: Mutex<StreamingStats>,
}

impl Shared {
    /// Builds one requested chunk and releases its pending marker.
    fn process(&self, coord: ChunkCoord) {
        if self.chunks.contains_key(&coord) {
            self.pending.remove(&coord);
            return;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.source.generate(coord)));
        match result {
            Ok(Ok(chunk)) => {
                self.chunks.entry(coord).or_insert_with(|| Arc::new(chunk));
                self.stats.lock().generated += 1;
            },
            Ok(Err(e)) => {
                warn!("Failed to generate chunk ({}, {}): {e}", coord.x, coord.y);
                self.stats.lock().failed += 1;
            },
            Err(_) => {
                warn!("Chunk generation panicked at ({}, {})", coord.x, coord.y);
                self.stats.lock().failed += 1;
            },
        }

        self.pending.remove(&coord);
    }
}

/// Streams level chunks around the camera.
pub struct LevelGenerator {
    /// Chunk grid size
    chunk_size: ChunkSize,
    /// Generation radius in chunks
    generation_radius: u32,
    /// Visible-walls radius in chunks
    visible_radius: u32,
    /// Shared chunk state
    shared: Arc<Shared>,
    /// Request queue to the worker (background mode only)
    requests: Option<Sender<ChunkCoord>>,
}

impl LevelGenerator {
    /// Creates a generator with a background worker and the spawn chunk
    /// already in place.
    pub fn new(config: LevelConfig, seed: u64) -> Result<Self, WorldError> {
        Self::with_mode(config, seed, StreamingMode::Background)
    }

    /// Creates a generator that builds chunks on the calling thread.
    pub fn without_worker(config: LevelConfig, seed: u64) -> Result<Self, WorldError> {
        Self::with_mode(config, seed, StreamingMode::Inline)
    }

    /// Creates a generator in the given mode using the BSP generator.
    pub fn with_mode(config: LevelConfig, seed: u64, mode: StreamingMode) -> Result<Self, WorldError> {
        config.validate()?;
        let generator = ChunkGenerator::new(config.clone(), seed);
        let spawn = generator.generate_chunk(ChunkCoord::new(0, 0))?;
        Self::with_source(&config, Arc::new(generator), spawn, mode)
    }

    /// Creates a generator around an arbitrary chunk source.
    ///
    /// `spawn` is published immediately at its own coordinate.
    pub fn with_source(
        config: &LevelConfig,
        source: Arc<dyn ChunkSource>,
        spawn: Chunk,
        mode: StreamingMode,
    ) -> Result<Self, WorldError> {
        let shared = Arc::new(Shared {
            chunks: DashMap::new(),
            pending: DashSet::new(),
            source,
            stats: Mutex::new(StreamingStats::default()),
        });
        shared.chunks.insert(spawn.coord(), Arc::new(spawn));

        let requests = match mode {
            StreamingMode::Background => Some(Self::spawn_worker(Arc::clone(&shared))?),
            StreamingMode::Inline => None,
        };

        info!(
            "Level generator ready ({:?}, radius {})",
            mode, config.generation_radius
        );

        Ok(Self {
            chunk_size: config.chunk_size,
            generation_radius: config.generation_radius,
            visible_radius: config.visible_radius,
            shared,
            requests,
        })
    }

    fn spawn_worker(shared: Arc<Shared>) -> Result<Sender<ChunkCoord>, WorldError> {
        let (tx, rx): (Sender<ChunkCoord>, Receiver<ChunkCoord>) = crossbeam_channel::unbounded();
        thread::Builder::new()
            .name("chunk-worker".to_string())
            .spawn(move || {
                // Ends once the generator (and its sender) is dropped
                for coord in rx {
                    shared.process(coord);
                }
                debug!("Chunk worker exiting");
            })
            .map_err(|e| WorldError::WorkerUnavailable(e.to_string()))?;
        Ok(tx)
    }

    /// Maps a world position to its chunk coordinate.
    #[must_use]
    pub fn get_chunk_coords(&self, x: f32, y: f32) -> ChunkCoord {
        ChunkCoord::from_world(Vec2::new(x, y), self.chunk_size)
    }

    /// Requests every missing chunk around the camera.
    ///
    /// Each coordinate is enqueued at most once while it is pending.
    /// Returns the number of newly requested chunks.
    pub fn update(&self, camera_x: f32, camera_y: f32) -> Result<usize, WorldError> {
        let center = self.get_chunk_coords(camera_x, camera_y);
        let mut enqueued = 0;

        for coord in center.neighborhood(self.generation_radius) {
            if self.shared.chunks.contains_key(&coord) || !self.shared.pending.insert(coord) {
                continue;
            }
            self.shared.stats.lock().requested += 1;
            enqueued += 1;

            match &self.requests {
                Some(tx) => {
                    if tx.send(coord).is_err() {
                        self.shared.pending.remove(&coord);
                        return Err(WorldError::WorkerUnavailable(
                            "chunk worker has stopped".to_string(),
                        ));
                    }
                },
                None => self.shared.process(coord),
            }
        }

        if enqueued > 0 {
            debug!("Requested {enqueued} chunks around ({}, {})", center.x, center.y);
        }
        Ok(enqueued)
    }

    /// Walls of every published chunk within the visible radius of the
    /// camera chunk.
    #[must_use]
    pub fn get_visible_walls(&self, camera_x: f32, camera_y: f32) -> Vec<Rect> {
        let center = self.get_chunk_coords(camera_x, camera_y);
        let mut walls = Vec::new();
        for coord in center.neighborhood(self.visible_radius) {
            if let Some(chunk) = self.shared.chunks.get(&coord) {
                walls.extend_from_slice(chunk.walls());
            }
        }
        walls
    }

    /// Returns a published chunk.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.shared.chunks.get(&coord).map(|entry| Arc::clone(entry.value()))
    }

    /// Checks if a chunk has been published.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.shared.chunks.contains_key(&coord)
    }

    /// Checks if a chunk is waiting for the worker.
    #[must_use]
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.shared.pending.contains(&coord)
    }

    /// Number of published chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.shared.chunks.len()
    }

    /// Number of chunks waiting for the worker.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.pending.len()
    }

    /// Snapshot of the generation counters.
    #[must_use]
    pub fn stats(&self) -> StreamingStats {
        *self.shared.stats.lock()
    }

    /// Chunk grid size.
    #[must_use]
    pub const fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Generation radius in chunks.
    #[must_use]
    pub const fn generation_radius(&self) -> u32 {
        self.generation_radius
    }

    /// Blocks until nothing is pending or `timeout` elapses.
    ///
    /// Returns `true` if the worker drained its queue in time.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.shared.pending.is_empty() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }
}

impl std::fmt::Debug for LevelGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelGenerator")
            .field("chunk_size", &self.chunk_size)
            .field("loaded", &self.loaded_count())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that fails the first `failures` requests, then yields empty
    /// chunks.
    struct FlakySource {
        calls: AtomicUsize,
        failures: usize,
        panic: bool,
    }

    impl ChunkSource for FlakySource {
        fn generate(&self, coord: ChunkCoord) -> Result<Chunk, WorldError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                if self.panic {
                    panic!("boom");
                }
                return Err(WorldError::GenerationFailed {
                    x: coord.x,
                    y: coord.y,
                    reason: "flaky".to_string(),
                });
            }
            Ok(Chunk::empty(coord))
        }
    }

    fn flaky(failures: usize, panic: bool) -> Arc<FlakySource> {
        Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
            failures,
            panic,
        })
    }

    #[test]
    fn test_spawn_chunk_available_immediately() {
        let level = LevelGenerator::new(LevelConfig::default(), 1).expect("level");
        assert!(level.is_loaded(ChunkCoord::new(0, 0)));
        assert_eq!(level.get_visible_walls(0.0, 0.0).len(), 8);
    }

    #[test]
    fn test_update_fills_neighbourhood_inline() {
        let level = LevelGenerator::without_worker(LevelConfig::default(), 1).expect("level");
        let enqueued = level.update(0.0, 0.0).expect("update");
        assert_eq!(enqueued, 24);
        assert_eq!(level.loaded_count(), 25);
        assert_eq!(level.pending_count(), 0);

        // Everything is present now
        assert_eq!(level.update(0.0, 0.0).expect("update"), 0);
    }

    #[test]
    fn test_update_enqueues_each_chunk_once() {
        let level = LevelGenerator::new(LevelConfig::default(), 9).expect("level");
        let first = level.update(10.0, 10.0).expect("update");
        let second = level.update(10.0, 10.0).expect("update");
        assert_eq!(first, 24);
        assert_eq!(second, 0);

        assert!(level.wait_idle(Duration::from_secs(10)));
        assert_eq!(level.loaded_count(), 25);
        assert_eq!(level.stats().requested, 24);
        assert_eq!(level.stats().generated, 24);
    }

    #[test]
    fn test_published_chunks_are_not_regenerated() {
        let level = LevelGenerator::without_worker(LevelConfig::default(), 5).expect("level");
        level.update(0.0, 0.0).expect("update");
        let before = level.chunk(ChunkCoord::new(1, 1)).expect("chunk");

        // Move away and back
        level.update(12_000.0, 0.0).expect("update");
        level.update(0.0, 0.0).expect("update");
        let after = level.chunk(ChunkCoord::new(1, 1)).expect("chunk");
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_failed_generation_releases_pending_marker() {
        let config = LevelConfig {
            generation_radius: 1,
            ..LevelConfig::default()
        };
        let source = flaky(8, false);
        let level = LevelGenerator::with_source(
            &config,
            source,
            Chunk::empty(ChunkCoord::new(0, 0)),
            StreamingMode::Inline,
        )
        .expect("level");

        assert_eq!(level.update(0.0, 0.0).expect("update"), 8);
        assert_eq!(level.loaded_count(), 1);
        assert_eq!(level.pending_count(), 0);
        assert_eq!(level.stats().failed, 8);

        // Retried on the next update
        assert_eq!(level.update(0.0, 0.0).expect("update"), 8);
        assert_eq!(level.loaded_count(), 9);
    }

    #[test]
    fn test_worker_survives_panicking_source() {
        let config = LevelConfig {
            generation_radius: 1,
            ..LevelConfig::default()
        };
        let level = LevelGenerator::with_source(
            &config,
            flaky(3, true),
            Chunk::empty(ChunkCoord::new(0, 0)),
            StreamingMode::Background,
        )
        .expect("level");

        level.update(0.0, 0.0).expect("update");
        assert!(level.wait_idle(Duration::from_secs(10)));
        assert_eq!(level.stats().failed, 3);
        assert_eq!(level.loaded_count(), 6);

        level.update(0.0, 0.0).expect("update");
        assert!(level.wait_idle(Duration::from_secs(10)));
        assert_eq!(level.loaded_count(), 9);
    }

    #[test]
    fn test_visible_walls_cover_three_by_three() {
        let config = LevelConfig::default();
        let level = LevelGenerator::without_worker(config, 3).expect("level");
        level.update(0.0, 0.0).expect("update");

        let expected: usize = ChunkCoord::new(0, 0)
            .neighborhood(1)
            .filter_map(|c| level.chunk(c))
            .map(|c| c.wall_count())
            .sum();
        assert_eq!(level.get_visible_walls(0.0, 0.0).len(), expected);
    }
}
