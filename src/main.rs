//! Corridor Stream headless driver
//!
//! Runs a scripted observer down a marker-only corridor and logs what the
//! streamers do. Usage: `corridor-stream [settings.json] [best.json]`

use std::process::ExitCode;

use corridor_stream::consts::SIM_DT;
use corridor_stream::sim::{Corridor, HitOutcome, MarkerPrefab, ObstacleTypeSpec};
use corridor_stream::{BestDistance, CorridorSettings, Result};

/// Simulated run length in ticks (two minutes)
const DEMO_TICKS: u32 = 120 * 60;
/// Observer body half-width for the toy collision check
const OBSERVER_HALF_WIDTH: f32 = 0.5;

fn terrain_catalogue() -> Vec<MarkerPrefab> {
    vec![
        MarkerPrefab::new("Meadow", 25.0),
        MarkerPrefab::new("Riverbank", 25.0),
        MarkerPrefab::new("Canyon", 25.0),
    ]
}

fn obstacle_catalogue() -> Vec<ObstacleTypeSpec<MarkerPrefab>> {
    vec![
        ObstacleTypeSpec::new(
            "Rock",
            vec![
                MarkerPrefab::new("Boulder", 1.2),
                MarkerPrefab::new("Pebbles", 0.8),
            ],
            5.0,
        ),
        ObstacleTypeSpec::new(
            "Tree",
            vec![MarkerPrefab::new("Pine", 0.9), MarkerPrefab::new("Oak", 1.4)],
            3.0,
        ),
        ObstacleTypeSpec::new("Pond", vec![MarkerPrefab::new("Pond", 2.0)], 1.0),
    ]
}

fn run(settings: CorridorSettings, best_path: Option<&str>) -> Result<()> {
    let best = match best_path {
        Some(path) => BestDistance::load(path)?,
        None => BestDistance::new(),
    };
    log::info!("{}", best.label());

    let mut corridor =
        Corridor::new(settings, &terrain_catalogue(), &obstacle_catalogue())?.with_best(best);

    let start_z = corridor.settings().run.observer_start_z;
    let speed = corridor.settings().run.run_speed;
    let mut observer_z = start_z;
    let mut runs = 1u32;

    for _ in 0..DEMO_TICKS {
        observer_z += speed * SIM_DT;
        corridor.tick(observer_z);

        // Stand-in for the host's collision layer: observer holds x = 0
        let hit = corridor
            .obstacles()
            .active_items()
            .map(|(_, item)| (item.position(), item.half_width()))
            .find(|(pos, half_width)| {
                (pos.z - observer_z).abs() < speed * SIM_DT
                    && pos.x.abs() < OBSERVER_HALF_WIDTH + half_width
            })
            .map(|(pos, _)| pos);
        let Some(hit) = hit else { continue };

        match corridor.on_obstacle_hit(hit.z) {
            HitOutcome::Survived { lives_left, cleared } => {
                log::info!("Survived hit ({} hearts, {} obstacles cleared)", lives_left, cleared);
            }
            HitOutcome::GameOver { distance, new_best } => {
                log::info!("Run {} over at {:.1} m (new best: {})", runs, distance, new_best);
                observer_z = start_z;
                corridor.restart(observer_z);
                runs += 1;
            }
            HitOutcome::Ignored => {}
        }
    }

    let terrain = corridor.terrain().stats();
    let obstacles = corridor.obstacles().stats();
    log::info!(
        "Terrain: {} spawned, {} recycled, {} skipped",
        terrain.spawned,
        terrain.recycled,
        terrain.skipped()
    );
    log::info!(
        "Obstacles: {} spawned, {} recycled, {} exhausted, {} placement failures",
        obstacles.spawned,
        obstacles.recycled,
        obstacles.capacity_exhausted,
        obstacles.placement_failed
    );
    log::info!("{} runs, {}", runs, corridor.best().label());

    if let Some(path) = best_path {
        corridor.best().save(path)?;
    }
    let (tiles, items) = corridor.shutdown();
    log::info!("Released {} tiles and {} obstacles", tiles.len(), items.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Corridor Stream (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match CorridorSettings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Failed to load settings from {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => CorridorSettings::default(),
    };
    let best_path = args.next();

    match run(settings, best_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
