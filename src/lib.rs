//! Corridor Stream - pooled content streaming for endless runners
//!
//! Core modules:
//! - `sim`: Deterministic streaming core (tile/obstacle pools, run state, host tick)
//! - `settings`: Data-driven tuning, loadable from JSON
//! - `best_distance`: Persisted best-run record
//! - `error`: Configuration and persistence errors

pub mod best_distance;
pub mod error;
pub mod settings;
pub mod sim;

pub use best_distance::BestDistance;
pub use error::{Result, SkipReason, StreamError};
pub use settings::{CorridorSettings, ObstacleSettings, RunSettings, TerrainSettings};

use glam::Vec3;

/// Default tuning constants
pub mod consts {
    /// Terrain tile length along the forward axis
    pub const TILE_LENGTH: f32 = 395.0;
    /// Tiles spawned immediately by initialize
    pub const PRELOAD_TILES: usize = 10;
    /// Terrain pool capacity (must exceed max simultaneously active tiles)
    pub const TERRAIN_POOL_SIZE: usize = 21;
    /// Terrain tiles are recycled once this many tile lengths behind
    pub const TERRAIN_BEHIND_TILES: f32 = 2.0;

    /// Obstacle lanes per row (one is always left free)
    pub const LANES: usize = 5;
    /// Lateral distance between lane centers
    pub const LANE_SPACING: f32 = 5.0;
    /// Longitudinal distance between obstacle rows
    pub const ROW_SPACING: f32 = 35.0;
    /// Rows are kept spawned this far ahead of the observer
    pub const OBSTACLE_AHEAD: f32 = 100.0;
    /// Obstacles are recycled once this far behind the observer
    pub const OBSTACLE_BEHIND: f32 = 20.0;
    /// Obstacle pool capacity per type
    pub const POOL_SIZE_PER_TYPE: usize = 10;
    /// Overlap slack: placed pairs keep |dx| >= (wa + wb) * slack
    pub const OVERLAP_SLACK: f32 = 0.6;
    /// Lateral offset attempts per slot before the slot is skipped
    pub const PLACEMENT_RETRIES: u32 = 15;

    /// Hearts per run
    pub const MAX_LIVES: u8 = 3;
    /// Observer spawn point
    pub const OBSERVER_START_Z: f32 = -175.0;
    /// Observer forward speed (units/s)
    pub const RUN_SPEED: f32 = 30.0;
    /// Rows cleared ahead of a survived hit
    pub const CLEAR_ROWS_ON_HIT: u32 = 2;

    /// Fixed simulation timestep for the headless driver
    pub const SIM_DT: f32 = 1.0 / 60.0;
}

/// Where free items are parked while inactive
pub const PARK_POSITION: Vec3 = Vec3::splat(9999.0);

/// Most spawns one tick can need: a caught-up cursor is at most `behind`
/// short of the observer and stops once `ahead` past it
#[inline]
pub fn spawn_budget(ahead: f32, behind: f32, step: f32) -> usize {
    ((ahead + behind) / step).ceil() as usize + 1
}

