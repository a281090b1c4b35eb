//! Terrain ribbon streaming
//!
//! Keeps fixed-length tiles laid end to end ahead of the observer and
//! recycles those it has left behind.

use glam::Vec3;
use rand::Rng;

use super::item::{ItemId, PoolItem, Prefab};
use super::pool::{ItemPool, StreamStats};
use crate::error::{Result, SkipReason, StreamError};
use crate::settings::TerrainSettings;
use crate::spawn_budget;

/// Streams terrain tiles along +z from a single pool
pub struct TileStreamer<P: Prefab> {
    settings: TerrainSettings,
    pool: ItemPool<P::Item>,
    /// Active tiles in spawn order
    active: Vec<ItemId>,
    /// z of the next tile
    cursor: f32,
    stats: StreamStats,
    warned_exhausted: bool,
}

impl<P: Prefab> TileStreamer<P> {
    /// Build the pool from random variants and preload tiles from z = 0
    pub fn initialize<R: Rng + ?Sized>(
        prefabs: &[P],
        settings: TerrainSettings,
        rng: &mut R,
    ) -> Result<Self> {
        if prefabs.is_empty() {
            return Err(StreamError::EmptyVariants {
                kind: "terrain".into(),
            });
        }
        settings.validate()?;

        let pool = ItemPool::new(settings.pool_size, || {
            prefabs[rng.random_range(0..prefabs.len())].instantiate()
        });

        let mut streamer = Self {
            settings,
            pool,
            active: Vec::new(),
            cursor: 0.0,
            stats: StreamStats::default(),
            warned_exhausted: false,
        };

        for _ in 0..streamer.settings.preload_tiles {
            streamer.spawn_tile(streamer.cursor);
            streamer.cursor += streamer.settings.tile_length;
        }

        log::info!(
            "Terrain initialized: {} tiles pooled, {} preloaded, cursor at {}",
            streamer.pool.capacity(),
            streamer.active.len(),
            streamer.cursor
        );
        Ok(streamer)
    }

    /// Advance streaming for the observer's current z
    pub fn tick(&mut self, observer_z: f32) {
        if !observer_z.is_finite() {
            log::warn!("Terrain tick ignored: observer z is {}", observer_z);
            return;
        }

        self.recycle_behind(observer_z);
        self.catch_up(observer_z);

        let step = self.settings.tile_length;
        let budget = spawn_budget(
            self.settings.ahead_distance,
            self.settings.behind_distance(),
            step,
        );
        for _ in 0..budget {
            if self.cursor - observer_z >= self.settings.ahead_distance {
                break;
            }
            let next = self.cursor + step;
            if next <= self.cursor {
                log::warn!(
                    "Terrain cursor {} can no longer advance by {}; streaming stalled",
                    self.cursor,
                    step
                );
                break;
            }
            self.spawn_tile(self.cursor);
            self.cursor = next;
        }
    }

    /// Activate the oldest free tile at `(0, 0, z)`. Returns None if the
    /// pool was exhausted and the tile skipped.
    pub fn spawn_tile(&mut self, z: f32) -> Option<ItemId> {
        let Some(id) = self.pool.spawn(Vec3::new(0.0, 0.0, z)) else {
            self.stats.note_skip(SkipReason::CapacityExhausted);
            if !self.warned_exhausted {
                log::warn!(
                    "Terrain pool exhausted ({} tiles); skipping tile at z={}",
                    self.pool.capacity(),
                    z
                );
                self.warned_exhausted = true;
            } else {
                log::debug!("Terrain tile at z={} skipped: {}", z, SkipReason::CapacityExhausted);
            }
            return None;
        };
        self.active.push(id);
        self.stats.spawned += 1;
        log::debug!("Tile {:?} spawned at z={}", id, z);
        Some(id)
    }

    /// Return every tile to the pool and restart the ribbon at `observer_z`
    pub fn reset(&mut self, observer_z: f32) {
        let count = self.active.len();
        for id in self.active.drain(..) {
            self.pool.release(id);
        }
        self.stats.recycled += count as u64;
        self.cursor = observer_z;
        log::info!("Terrain reset at z={} ({} tiles recycled)", observer_z, count);
    }

    /// Hide every tile and hand the host handles back
    pub fn shutdown(self) -> Vec<P::Item> {
        log::info!("Terrain shutdown: releasing {} tiles", self.pool.capacity());
        self.pool.into_handles()
    }

    fn recycle_behind(&mut self, observer_z: f32) {
        let behind = self.settings.behind_distance();
        let pool = &mut self.pool;
        let mut recycled = 0u64;
        self.active.retain(|&id| {
            let z = pool.get(id).position().z;
            if observer_z - z > behind {
                pool.release(id);
                recycled += 1;
                false
            } else {
                true
            }
        });
        self.stats.recycled += recycled;
    }

    /// Skip grid slots that would be recycled as soon as they spawned
    fn catch_up(&mut self, observer_z: f32) {
        let behind = self.settings.behind_distance();
        let lag = observer_z - behind - self.cursor;
        if lag > 0.0 {
            let steps = (lag / self.settings.tile_length).ceil();
            let from = self.cursor;
            self.cursor += steps * self.settings.tile_length;
            log::debug!("Terrain cursor caught up {} -> {}", from, self.cursor);
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn free_len(&self) -> usize {
        self.pool.free_len()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Active tiles in spawn order
    pub fn active_tiles(&self) -> impl Iterator<Item = &PoolItem<P::Item>> {
        self.active.iter().map(|&id| self.pool.get(id))
    }

    /// z of every active tile, in spawn order
    pub fn active_positions(&self) -> Vec<f32> {
        self.active_tiles().map(|tile| tile.position().z).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::MarkerPrefab;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn prefabs() -> Vec<MarkerPrefab> {
        vec![
            MarkerPrefab::new("Meadow", 50.0),
            MarkerPrefab::new("Canyon", 50.0),
        ]
    }

    fn streamer(settings: TerrainSettings) -> TileStreamer<MarkerPrefab> {
        let mut rng = Pcg32::seed_from_u64(7);
        TileStreamer::initialize(&prefabs(), settings, &mut rng).unwrap()
    }

    #[test]
    fn test_initialize_preloads_tiles() {
        let tiles = streamer(TerrainSettings {
            tile_length: 395.0,
            preload_tiles: 10,
            pool_size: 21,
            ..Default::default()
        });
        let expected: Vec<f32> = (0..10).map(|i| i as f32 * 395.0).collect();
        assert_eq!(tiles.active_positions(), expected);
        assert_eq!(tiles.cursor(), 3950.0);
        assert_eq!(tiles.free_len(), 11);
        assert!(tiles.active_tiles().all(|t| t.handle().active));
    }

    #[test]
    fn test_empty_prefabs_rejected() {
        let mut rng = Pcg32::seed_from_u64(0);
        let result =
            TileStreamer::<MarkerPrefab>::initialize(&[], TerrainSettings::default(), &mut rng);
        assert!(matches!(result, Err(StreamError::EmptyVariants { .. })));
    }

    #[test]
    fn test_tick_spawns_ahead_and_recycles_behind() {
        let mut tiles = streamer(TerrainSettings {
            tile_length: 100.0,
            preload_tiles: 3,
            pool_size: 10,
            ahead_distance: 250.0,
            behind_tiles: 2.0,
        });
        assert_eq!(tiles.cursor(), 300.0);

        tiles.tick(100.0);
        assert!(tiles.cursor() - 100.0 >= 250.0);
        assert_eq!(tiles.active_positions(), vec![0.0, 100.0, 200.0, 300.0]);

        tiles.tick(450.0);
        // 0, 100 and 200 are more than 200 behind 450
        assert_eq!(tiles.active_positions(), vec![300.0, 400.0, 500.0, 600.0]);
        assert_eq!(tiles.cursor(), 700.0);
        assert_eq!(tiles.free_len() + tiles.active_len(), tiles.capacity());
    }

    #[test]
    fn test_exhausted_pool_skips_but_advances() {
        let mut tiles = streamer(TerrainSettings {
            tile_length: 10.0,
            preload_tiles: 5,
            pool_size: 2,
            ahead_distance: 0.0,
            behind_tiles: 2.0,
        });
        assert_eq!(tiles.active_len(), 2);
        assert_eq!(tiles.cursor(), 50.0);
        assert_eq!(tiles.stats().capacity_exhausted, 3);
    }

    #[test]
    fn test_teleport_is_bounded() {
        let mut tiles = streamer(TerrainSettings {
            tile_length: 395.0,
            preload_tiles: 10,
            pool_size: 21,
            ..Default::default()
        });
        tiles.tick(1.0e7);
        assert!(tiles.cursor() - 1.0e7 >= tiles.settings().ahead_distance);
        assert!(tiles.active_len() <= 5);
        assert_eq!(tiles.stats().capacity_exhausted, 0);
        for z in tiles.active_positions() {
            assert!(1.0e7 - z <= tiles.settings().behind_distance());
        }
    }

    #[test]
    fn test_far_teleport_returns() {
        let mut tiles = streamer(TerrainSettings::default());
        tiles.tick(1.0e11);
        assert!(tiles.active_len() <= tiles.capacity());
        assert_eq!(tiles.stats().capacity_exhausted, 0);
        assert_eq!(tiles.free_len() + tiles.active_len(), tiles.capacity());

        // Still bounded when the pool is starved on every tick
        let mut starved = streamer(TerrainSettings {
            pool_size: 1,
            preload_tiles: 0,
            ..Default::default()
        });
        starved.tick(1.0e6);
        starved.tick(1.0e12);
        let budget = spawn_budget(790.0, 790.0, 395.0);
        assert!((starved.stats().spawned + starved.stats().skipped()) as usize <= 2 * budget);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut tiles = streamer(TerrainSettings::default());
        tiles.reset(-175.0);
        assert_eq!(tiles.active_len(), 0);
        assert_eq!(tiles.cursor(), -175.0);
        assert_eq!(tiles.free_len(), tiles.capacity());

        tiles.reset(-175.0);
        assert_eq!(tiles.active_len(), 0);
        assert_eq!(tiles.cursor(), -175.0);
        assert_eq!(tiles.free_len(), tiles.capacity());

        tiles.tick(-175.0);
        assert_eq!(tiles.active_positions()[0], -175.0);
    }

    #[test]
    fn test_shutdown_returns_hidden_handles() {
        let tiles = streamer(TerrainSettings::default());
        let handles = tiles.shutdown();
        assert_eq!(handles.len(), TerrainSettings::default().pool_size);
        assert!(handles.iter().all(|h| !h.active));
    }

    proptest! {
        #[test]
        fn prop_tick_invariants(steps in prop::collection::vec(-50.0f32..900.0, 1..60)) {
            let mut tiles = streamer(TerrainSettings::default());
            let mut z = -175.0f32;
            for step in steps {
                z += step;
                tiles.tick(z);
                prop_assert!(tiles.cursor() - z >= tiles.settings().ahead_distance);
                for tz in tiles.active_positions() {
                    prop_assert!(z - tz <= tiles.settings().behind_distance());
                }
                prop_assert_eq!(tiles.free_len() + tiles.active_len(), tiles.capacity());
            }
        }
    }
}
