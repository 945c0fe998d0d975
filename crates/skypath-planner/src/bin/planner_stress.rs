use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skypath_core::{Coord, GridModel, PathRequest, Position};
use skypath_planner::{spawn_planner, PlanError, PlannerConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

const GRID_SIZE: usize = 256;
const CELL_SIZE: f32 = 2.0;
const HILLS: usize = 40;
const REQUESTS: usize = 400;
const SEED: u64 = 7;

#[derive(Clone, Copy)]
struct Hill {
    x: f32,
    z: f32,
    radius: f32,
    height: f32,
}

struct Scenario {
    name: &'static str,
    multiplier: f32,
    ceiling: Option<f32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PlannerConfig::from_env();
    let mut rng = StdRng::seed_from_u64(SEED);

    let extent = GRID_SIZE as f32 * CELL_SIZE;
    let hills: Vec<Hill> = (0..HILLS)
        .map(|_| Hill {
            x: rng.random_range(0.0..extent),
            z: rng.random_range(0.0..extent),
            radius: rng.random_range(8.0..60.0),
            height: rng.random_range(10.0..120.0),
        })
        .collect();

    let requests: Vec<(Coord, Coord)> = (0..REQUESTS)
        .map(|_| {
            let mut pick = || {
                Coord::new(
                    rng.random_range(0..GRID_SIZE as i32),
                    rng.random_range(0..GRID_SIZE as i32),
                )
            };
            (pick(), pick())
        })
        .collect();

    let scenarios = [
        Scenario {
            name: "flat cost (multiplier 0)",
            multiplier: 0.0,
            ceiling: None,
        },
        Scenario {
            name: "climb averse (multiplier 10)",
            multiplier: 10.0,
            ceiling: None,
        },
        Scenario {
            name: "climb averse with 90m ceiling",
            multiplier: 10.0,
            ceiling: Some(90.0),
        },
    ];

    for scenario in scenarios {
        println!("\n=== {} ===", scenario.name);

        let mut grid = GridModel::new(GRID_SIZE, GRID_SIZE, CELL_SIZE, Position::default());
        grid.sample_terrain(&|x: f32, z: f32| terrain_height(&hills, x, z));
        if let Some(ceiling) = scenario.ceiling {
            println!("Blocked cells: {}", grid.block_above(ceiling));
        }
        let grid = Arc::new(grid);

        let (planner, workers) = spawn_planner(grid, &config);
        let started = Instant::now();
        let mut tasks = JoinSet::new();
        for (start, end) in requests.iter().copied() {
            let planner = planner.clone();
            let multiplier = scenario.multiplier;
            tasks.spawn(async move {
                let request_started = Instant::now();
                let result = planner
                    .plan(PathRequest::new(start, end, multiplier))
                    .await;
                (result, request_started.elapsed())
            });
        }

        let mut found = 0usize;
        let mut no_route = 0usize;
        let mut invalid = 0usize;
        let mut failed = 0usize;
        let mut total_cost = 0.0f64;
        let mut total_expanded = 0usize;
        let mut slowest = Duration::ZERO;
        while let Some(joined) = tasks.join_next().await {
            let (result, elapsed) = joined?;
            slowest = slowest.max(elapsed);
            match result {
                Ok(path) => {
                    found += 1;
                    total_cost += f64::from(path.total_cost());
                    total_expanded += path.expanded();
                }
                Err(PlanError::Search(err)) if err.is_no_route() => no_route += 1,
                Err(PlanError::Search(err)) if err.is_fatal() => {
                    failed += 1;
                    println!(" - FATAL: {}", err);
                }
                Err(PlanError::Search(_)) => invalid += 1,
                Err(err) => {
                    failed += 1;
                    println!(" - {}", err);
                }
            }
        }
        let wall = started.elapsed();

        drop(planner);
        for worker in workers {
            worker.await?;
        }

        println!(
            "Result: {} | found={} no_route={} invalid_endpoint={} failed={}",
            if failed == 0 { "OK" } else { "FAIL" },
            found,
            no_route,
            invalid,
            failed
        );
        if found > 0 {
            println!(
                "Paths: avg_cost={:.1} avg_expanded={:.0}",
                total_cost / found as f64,
                total_expanded as f64 / found as f64
            );
        }
        println!(
            "Timing: wall={:.1}ms throughput={:.0} req/s slowest={:.1}ms",
            wall.as_secs_f64() * 1000.0,
            REQUESTS as f64 / wall.as_secs_f64().max(1e-9),
            slowest.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}

fn terrain_height(hills: &[Hill], x: f32, z: f32) -> f32 {
    hills
        .iter()
        .map(|hill| {
            let dx = x - hill.x;
            let dz = z - hill.z;
            let d2 = (dx * dx + dz * dz) / (hill.radius * hill.radius);
            hill.height * (-d2).exp()
        })
        .fold(0.0, f32::max)
}
