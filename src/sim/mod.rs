//! Deterministic streaming module
//!
//! All corridor logic lives here. This module must stay host-agnostic:
//! - Positions come in through `tick`, never looked up
//! - Seeded RNG only, injected by the owner
//! - Fixed-capacity pools, no allocation after initialize

pub mod item;
pub mod obstacles;
pub mod placement;
pub mod pool;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod weighted;

pub use item::{ItemId, Marker, MarkerPrefab, PoolItem, Prefab, Presentable};
pub use obstacles::{ActiveObstacle, ObstacleRowStreamer, ObstacleTypeSpec, RowReport};
pub use placement::{Footprint, RowPlacement};
pub use pool::{ItemPool, StreamStats};
pub use state::{RunPhase, RunState};
pub use terrain::TileStreamer;
pub use tick::{Corridor, HitOutcome};
pub use weighted::WeightedSelector;
