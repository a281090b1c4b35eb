//! Corridor tuning
//!
//! Treated as immutable input at initialize time. Loaded from JSON by the
//! host; every field falls back to the default tuning when omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, StreamError, require_non_negative, require_positive};

/// Terrain ribbon tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Length of one tile along the forward axis
    pub tile_length: f32,
    /// Pool capacity (no growth at runtime)
    pub pool_size: usize,
    /// Tiles spawned by initialize, starting at z = 0
    pub preload_tiles: usize,
    /// Keep `cursor - observer_z` at least this large
    pub ahead_distance: f32,
    /// Recycle tiles more than this many tile lengths behind the observer
    pub behind_tiles: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            tile_length: TILE_LENGTH,
            pool_size: TERRAIN_POOL_SIZE,
            preload_tiles: PRELOAD_TILES,
            ahead_distance: TILE_LENGTH * 2.0,
            behind_tiles: TERRAIN_BEHIND_TILES,
        }
    }
}

impl TerrainSettings {
    /// Distance behind the observer past which a tile is recycled
    pub fn behind_distance(&self) -> f32 {
        self.tile_length * self.behind_tiles
    }

    /// Smallest pool that never starves in steady state
    pub fn recommended_pool_size(&self) -> usize {
        self.preload_tiles + (self.ahead_distance / self.tile_length).ceil() as usize + 1
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("tile_length", self.tile_length)?;
        require_non_negative("terrain ahead_distance", self.ahead_distance)?;
        require_non_negative("behind_tiles", self.behind_tiles)?;
        if self.pool_size == 0 {
            return Err(StreamError::ZeroPoolSize {
                kind: "terrain".into(),
            });
        }
        if self.pool_size < self.recommended_pool_size() {
            log::warn!(
                "Terrain pool size {} is below the recommended {}; tiles may be skipped",
                self.pool_size,
                self.recommended_pool_size()
            );
        }
        Ok(())
    }
}

/// Obstacle row tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleSettings {
    /// Pool capacity for each obstacle type
    pub pool_size_per_type: usize,
    /// Lane slots per row, one of which stays free
    pub lanes: usize,
    /// Lateral distance between lane centers
    pub lane_spacing: f32,
    /// Longitudinal distance between rows
    pub row_spacing: f32,
    /// Rows are spawned while `cursor < observer_z + ahead_distance`
    pub ahead_distance: f32,
    /// Obstacles further than this behind the observer are recycled
    pub behind_distance: f32,
    /// Longitudinal coordinate of the first row
    pub start_z: f32,
    /// Overlap slack factor for lateral placement
    pub overlap_slack: f32,
    /// Offset attempts per slot before the slot is skipped
    pub placement_retries: u32,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            pool_size_per_type: POOL_SIZE_PER_TYPE,
            lanes: LANES,
            lane_spacing: LANE_SPACING,
            row_spacing: ROW_SPACING,
            ahead_distance: OBSTACLE_AHEAD,
            behind_distance: OBSTACLE_BEHIND,
            start_z: 0.0,
            overlap_slack: OVERLAP_SLACK,
            placement_retries: PLACEMENT_RETRIES,
        }
    }
}

impl ObstacleSettings {
    /// Lateral coordinate of a lane center; lanes are centered on x = 0
    pub fn lane_center(&self, lane: usize) -> f32 {
        (lane as f32 - (self.lanes as f32 - 1.0) / 2.0) * self.lane_spacing
    }

    /// Lateral interval `[min, max]` covered by a lane
    pub fn lane_bounds(&self, lane: usize) -> (f32, f32) {
        let center = self.lane_center(lane);
        let half = self.lane_spacing / 2.0;
        (center - half, center + half)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lanes == 0 {
            return Err(StreamError::ZeroLanes);
        }
        if self.pool_size_per_type == 0 {
            return Err(StreamError::ZeroPoolSize {
                kind: "obstacle".into(),
            });
        }
        require_positive("lane_spacing", self.lane_spacing)?;
        require_positive("row_spacing", self.row_spacing)?;
        require_positive("overlap_slack", self.overlap_slack)?;
        require_non_negative("obstacle ahead_distance", self.ahead_distance)?;
        require_non_negative("obstacle behind_distance", self.behind_distance)?;
        if !self.start_z.is_finite() {
            return Err(StreamError::InvalidLength {
                name: "start_z",
                value: self.start_z,
            });
        }
        Ok(())
    }
}

/// Lives and observer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Hearts per run
    pub max_lives: u8,
    /// Observer z at (re)start; distance is measured from here
    pub observer_start_z: f32,
    /// Rows cleared ahead of a survived hit
    pub clear_rows_on_hit: u32,
    /// Observer forward speed for scripted drivers
    pub run_speed: f32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_lives: MAX_LIVES,
            observer_start_z: OBSERVER_START_Z,
            clear_rows_on_hit: CLEAR_ROWS_ON_HIT,
            run_speed: RUN_SPEED,
        }
    }
}

impl RunSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.observer_start_z.is_finite() {
            return Err(StreamError::InvalidLength {
                name: "observer_start_z",
                value: self.observer_start_z,
            });
        }
        require_non_negative("run_speed", self.run_speed)?;
        if self.max_lives == 0 {
            log::warn!("max_lives is 0; the first hit ends the run");
        }
        Ok(())
    }
}

/// Complete corridor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorSettings {
    /// Seed for the shared RNG
    pub seed: u64,
    pub terrain: TerrainSettings,
    pub obstacles: ObstacleSettings,
    pub run: RunSettings,
}

impl Default for CorridorSettings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            terrain: TerrainSettings::default(),
            obstacles: ObstacleSettings::default(),
            run: RunSettings::default(),
        }
    }
}

impl CorridorSettings {
    pub fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.obstacles.validate()?;
        self.run.validate()
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
