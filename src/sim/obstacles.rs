//! Obstacle row streaming
//!
//! Rows are spawned at fixed spacing ahead of the observer. Each row leaves
//! one lane free, draws a weighted-random type for every other lane, and
//! jitters the obstacle laterally inside its lane while keeping footprints
//! apart. Every obstacle type has its own pool.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::item::{ItemId, PoolItem, Prefab};
use super::placement::{Footprint, RowPlacement};
use super::pool::{ItemPool, StreamStats};
use super::weighted::WeightedSelector;
use crate::error::{Result, SkipReason, StreamError};
use crate::settings::ObstacleSettings;
use crate::spawn_budget;

/// One obstacle type in the catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleTypeSpec<P> {
    /// Type name ("Rock", "Tree", "Pond")
    pub id: String,
    /// Interchangeable variants
    pub variants: Vec<P>,
    /// Relative spawn weight (non-negative)
    pub weight: f32,
}

impl<P> ObstacleTypeSpec<P> {
    pub fn new(id: impl Into<String>, variants: Vec<P>, weight: f32) -> Self {
        Self {
            id: id.into(),
            variants,
            weight,
        }
    }
}

/// Active obstacle tagged with the type pool it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveObstacle {
    pub id: ItemId,
    pub kind: usize,
}

/// Outcome of spawning a single row
#[derive(Debug, Clone, Default)]
pub struct RowReport {
    pub z: f32,
    pub free_lane: usize,
    /// (lane, type index, footprint) for every placed obstacle
    pub placed: Vec<(usize, usize, Footprint)>,
    /// (lane, reason) for every slot left empty
    pub skipped: Vec<(usize, SkipReason)>,
}

/// Streams obstacle rows along +z from per-type pools
pub struct ObstacleRowStreamer<P: Prefab> {
    settings: ObstacleSettings,
    type_ids: Vec<String>,
    selector: WeightedSelector,
    pools: Vec<ItemPool<P::Item>>,
    /// Active obstacles in spawn order, across all types
    active: Vec<ActiveObstacle>,
    /// z of the next row
    cursor: f32,
    stats: StreamStats,
    warned_exhausted: Vec<bool>,
}

impl<P: Prefab> ObstacleRowStreamer<P> {
    /// Validate the catalogue and build one pool per type
    pub fn initialize<R: Rng + ?Sized>(
        types: &[ObstacleTypeSpec<P>],
        settings: ObstacleSettings,
        rng: &mut R,
    ) -> Result<Self> {
        settings.validate()?;
        if types.is_empty() {
            return Err(StreamError::NoObstacleTypes);
        }
        for spec in types {
            if spec.variants.is_empty() {
                return Err(StreamError::EmptyVariants {
                    kind: format!("obstacle type '{}'", spec.id),
                });
            }
            if !spec.weight.is_finite() || spec.weight < 0.0 {
                return Err(StreamError::InvalidWeight {
                    id: spec.id.clone(),
                    weight: spec.weight,
                });
            }
        }
        let weights: Vec<f32> = types.iter().map(|spec| spec.weight).collect();
        let selector = WeightedSelector::new(&weights).ok_or(StreamError::ZeroTotalWeight)?;

        let pools = types
            .iter()
            .map(|spec| {
                ItemPool::new(settings.pool_size_per_type, || {
                    spec.variants[rng.random_range(0..spec.variants.len())].instantiate()
                })
            })
            .collect();

        log::info!(
            "Obstacles initialized: {} types x {} pooled, {} lanes, row spacing {}",
            types.len(),
            settings.pool_size_per_type,
            settings.lanes,
            settings.row_spacing
        );

        Ok(Self {
            cursor: settings.start_z,
            settings,
            type_ids: types.iter().map(|spec| spec.id.clone()).collect(),
            selector,
            pools,
            active: Vec::new(),
            stats: StreamStats::default(),
            warned_exhausted: vec![false; types.len()],
        })
    }

    /// Advance streaming for the observer's current z
    pub fn tick<R: Rng + ?Sized>(&mut self, observer_z: f32, rng: &mut R) {
        if !observer_z.is_finite() {
            log::warn!("Obstacle tick ignored: observer z is {}", observer_z);
            return;
        }

        let behind = self.settings.behind_distance;
        self.recycle_where(|z| observer_z - z > behind);
        self.catch_up(observer_z);

        let step = self.settings.row_spacing;
        let budget = spawn_budget(self.settings.ahead_distance, behind, step);
        for _ in 0..budget {
            if self.cursor >= observer_z + self.settings.ahead_distance {
                break;
            }
            let next = self.cursor + step;
            if next <= self.cursor {
                log::warn!(
                    "Obstacle cursor {} can no longer advance by {}; streaming stalled",
                    self.cursor,
                    step
                );
                break;
            }
            self.spawn_row(self.cursor, rng);
            self.cursor = next;
        }
    }

    /// Spawn one row at `z`, leaving a random lane unobstructed
    pub fn spawn_row<R: Rng + ?Sized>(&mut self, z: f32, rng: &mut R) -> RowReport {
        let lanes = self.settings.lanes;
        let free_lane = rng.random_range(0..lanes);
        let mut row = RowPlacement::new(self.settings.overlap_slack);
        let (free_lo, free_hi) = self.settings.lane_bounds(free_lane);
        row.reserve(free_lo, free_hi);

        let mut report = RowReport {
            z,
            free_lane,
            ..Default::default()
        };

        for lane in (0..lanes).filter(|&lane| lane != free_lane) {
            let kind = self.selector.pick(rng);
            match self.place_in_lane(&mut row, lane, kind, z, rng) {
                Ok(footprint) => report.placed.push((lane, kind, footprint)),
                Err(reason) => {
                    self.note_skip(kind, reason, z);
                    report.skipped.push((lane, reason));
                }
            }
        }

        log::debug!(
            "Row at z={}: {} placed, {} skipped, lane {} free",
            z,
            report.placed.len(),
            report.skipped.len(),
            free_lane
        );
        report
    }

    fn place_in_lane<R: Rng + ?Sized>(
        &mut self,
        row: &mut RowPlacement,
        lane: usize,
        kind: usize,
        z: f32,
        rng: &mut R,
    ) -> std::result::Result<Footprint, SkipReason> {
        let pool = &mut self.pools[kind];
        let id = pool.peek().ok_or(SkipReason::CapacityExhausted)?;
        let half_width = pool.get_mut(id).measure();

        let (lo, hi) = self.settings.lane_bounds(lane);
        let offset = row
            .find_offset(lo, hi, half_width, self.settings.placement_retries, rng)
            .ok_or(SkipReason::PlacementFailed)?;

        let footprint = Footprint::new(offset, half_width);
        row.place(footprint);
        let spawned = pool.spawn(Vec3::new(offset, 0.0, z));
        debug_assert_eq!(spawned, Some(id));
        self.active.push(ActiveObstacle { id, kind });
        self.stats.spawned += 1;
        Ok(footprint)
    }

    fn note_skip(&mut self, kind: usize, reason: SkipReason, z: f32) {
        self.stats.note_skip(reason);
        match reason {
            SkipReason::CapacityExhausted if !self.warned_exhausted[kind] => {
                log::warn!(
                    "Obstacle pool '{}' exhausted ({} items); rows will be sparser",
                    self.type_ids[kind],
                    self.pools[kind].capacity()
                );
                self.warned_exhausted[kind] = true;
            }
            SkipReason::CapacityExhausted => {
                log::debug!("'{}' slot at z={} skipped: {}", self.type_ids[kind], z, reason);
            }
            SkipReason::PlacementFailed => {
                log::trace!("'{}' slot at z={} skipped: {}", self.type_ids[kind], z, reason);
            }
        }
    }

    /// Return every obstacle to its pool and restart rows at `observer_z`
    pub fn reset(&mut self, observer_z: f32) {
        let count = self.recycle_where(|_| true);
        self.cursor = observer_z;
        log::info!("Obstacles reset at z={} ({} recycled)", observer_z, count);
    }

    /// Recycle every obstacle in `[hit_z, hit_z + row_span * row_spacing]`
    pub fn clear_from_hit(&mut self, hit_z: f32, row_span: u32) -> usize {
        let end = hit_z + row_span as f32 * self.settings.row_spacing;
        let count = self.recycle_where(|z| z >= hit_z && z <= end);
        log::info!("Cleared {} obstacles in [{}, {}] after hit", count, hit_z, end);
        count
    }

    /// Hide every obstacle and hand the host handles back, grouped by type
    pub fn shutdown(self) -> Vec<P::Item> {
        log::info!("Obstacles shutdown: releasing {} pools", self.pools.len());
        self.pools
            .into_iter()
            .flat_map(ItemPool::into_handles)
            .collect()
    }

    fn recycle_where(&mut self, mut stale: impl FnMut(f32) -> bool) -> usize {
        let pools = &mut self.pools;
        let before = self.active.len();
        self.active.retain(|obstacle| {
            let pool = &mut pools[obstacle.kind];
            if stale(pool.get(obstacle.id).position().z) {
                pool.release(obstacle.id);
                false
            } else {
                true
            }
        });
        let recycled = before - self.active.len();
        self.stats.recycled += recycled as u64;
        recycled
    }

    /// Skip row slots that would be recycled as soon as they spawned
    fn catch_up(&mut self, observer_z: f32) {
        let lag = observer_z - self.settings.behind_distance - self.cursor;
        if lag > 0.0 {
            let steps = (lag / self.settings.row_spacing).ceil();
            let from = self.cursor;
            self.cursor += steps * self.settings.row_spacing;
            log::debug!("Obstacle cursor caught up {} -> {}", from, self.cursor);
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn settings(&self) -> &ObstacleSettings {
        &self.settings
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn type_ids(&self) -> &[String] {
        &self.type_ids
    }

    pub fn active(&self) -> &[ActiveObstacle] {
        &self.active
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Active obstacles of one type
    pub fn active_len_of(&self, kind: usize) -> usize {
        self.active.iter().filter(|o| o.kind == kind).count()
    }

    pub fn free_len_of(&self, kind: usize) -> usize {
        self.pools[kind].free_len()
    }

    pub fn capacity_of(&self, kind: usize) -> usize {
        self.pools[kind].capacity()
    }

    pub fn item(&self, obstacle: &ActiveObstacle) -> &PoolItem<P::Item> {
        self.pools[obstacle.kind].get(obstacle.id)
    }

    /// Active obstacles with their pooled item, in spawn order
    pub fn active_items(&self) -> impl Iterator<Item = (&ActiveObstacle, &PoolItem<P::Item>)> {
        self.active.iter().map(|o| (o, self.item(o)))
    }
}
