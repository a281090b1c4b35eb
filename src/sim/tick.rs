//! Host-driven corridor tick
//!
//! Owns both streamers, the run state and the shared RNG. The host calls
//! `tick` once per simulation step with the observer's z, and forwards
//! obstacle hits and restarts.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::item::Prefab;
use super::obstacles::{ObstacleRowStreamer, ObstacleTypeSpec};
use super::state::{RunPhase, RunState};
use super::terrain::TileStreamer;
use crate::best_distance::BestDistance;
use crate::error::Result;
use crate::settings::CorridorSettings;

/// Result of reporting an obstacle hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// A life was lost; nearby rows ahead were cleared
    Survived { lives_left: u8, cleared: usize },
    /// Last life lost
    GameOver { distance: f32, new_best: bool },
    /// Hit reported while the run was already over
    Ignored,
}

/// Terrain and obstacle streaming for one endless corridor
pub struct Corridor<T: Prefab, O: Prefab> {
    settings: CorridorSettings,
    rng: Pcg32,
    terrain: TileStreamer<T>,
    obstacles: ObstacleRowStreamer<O>,
    run: RunState,
    best: BestDistance,
    time_ticks: u64,
}

impl<T: Prefab, O: Prefab> Corridor<T, O> {
    /// Build both streamers, each validating its own settings. The observer
    /// need not exist yet; the first `tick` supplies its position.
    pub fn new(
        settings: CorridorSettings,
        terrain_prefabs: &[T],
        obstacle_types: &[ObstacleTypeSpec<O>],
    ) -> Result<Self> {
        settings.run.validate()?;
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let terrain = TileStreamer::initialize(terrain_prefabs, settings.terrain.clone(), &mut rng)?;
        let obstacles =
            ObstacleRowStreamer::initialize(obstacle_types, settings.obstacles.clone(), &mut rng)?;
        let run = RunState::new(&settings.run);

        log::info!("Corridor ready (seed {})", settings.seed);
        Ok(Self {
            settings,
            rng,
            terrain,
            obstacles,
            run,
            best: BestDistance::new(),
            time_ticks: 0,
        })
    }

    /// Use a previously persisted best distance
    pub fn with_best(mut self, best: BestDistance) -> Self {
        self.best = best;
        self
    }

    /// Advance streaming for the observer's current z
    pub fn tick(&mut self, observer_z: f32) {
        if self.run.phase == RunPhase::GameOver {
            return;
        }
        self.time_ticks += 1;
        self.run.observe(observer_z);
        self.terrain.tick(observer_z);
        self.obstacles.tick(observer_z, &mut self.rng);
    }

    /// Report a non-fatal collision at `hit_z`
    pub fn on_obstacle_hit(&mut self, hit_z: f32) -> HitOutcome {
        if !self.run.is_running() {
            return HitOutcome::Ignored;
        }

        let lives_left = self.run.lose_life();
        if lives_left > 0 {
            let cleared = self
                .obstacles
                .clear_from_hit(hit_z, self.settings.run.clear_rows_on_hit);
            log::info!("Hit at z={}: {} lives left", hit_z, lives_left);
            return HitOutcome::Survived {
                lives_left,
                cleared,
            };
        }

        let distance = self.run.distance;
        let new_best = self.best.record(distance);
        log::info!(
            "Game over at z={}: distance {:.1} m{}",
            hit_z,
            distance,
            if new_best { " (new best)" } else { "" }
        );
        HitOutcome::GameOver { distance, new_best }
    }

    /// Start a new run with the observer at `observer_z`
    pub fn restart(&mut self, observer_z: f32) {
        self.terrain.reset(observer_z);
        // One row of grace in front of the respawned observer
        self.obstacles
            .reset(observer_z + self.settings.obstacles.row_spacing);
        self.run.reset(observer_z);
        self.time_ticks = 0;
        log::info!("Run restarted at z={}", observer_z);
    }

    /// Hide everything and hand all host handles back
    pub fn shutdown(self) -> (Vec<T::Item>, Vec<O::Item>) {
        log::info!("Corridor shutdown after {} ticks", self.time_ticks);
        (self.terrain.shutdown(), self.obstacles.shutdown())
    }

    pub fn settings(&self) -> &CorridorSettings {
        &self.settings
    }

    pub fn terrain(&self) -> &TileStreamer<T> {
        &self.terrain
    }

    pub fn obstacles(&self) -> &ObstacleRowStreamer<O> {
        &self.obstacles
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn best(&self) -> BestDistance {
        self.best
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
