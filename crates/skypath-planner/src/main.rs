//! skypath-planner - plan one route over a height map and print it as JSON

use anyhow::Result;
use clap::Parser;
use skypath_core::{PathRequest, Position};
use skypath_planner::{spawn_planner, HeightMap, PlannerConfig, RouteReport};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// World-space point on the ground plane, written as `x,z`.
#[derive(Debug, Clone, Copy)]
struct GroundPoint {
    x: f32,
    z: f32,
}

impl FromStr for GroundPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, z) = s
            .split_once(',')
            .ok_or_else(|| format!("expected x,z but got {s:?}"))?;
        let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
        let z = z.trim().parse().map_err(|e| format!("bad z in {s:?}: {e}"))?;
        Ok(Self { x, z })
    }
}

impl GroundPoint {
    fn position(self) -> Position {
        Position::new(self.x, 0.0, self.z)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Height map JSON file
    #[arg(long)]
    terrain: PathBuf,

    /// Grid cell size in world units (defaults to the height map spacing)
    #[arg(long)]
    cell_size: Option<f32>,

    /// Start position as x,z
    #[arg(long)]
    from: GroundPoint,

    /// Destination as x,z
    #[arg(long)]
    to: GroundPoint,

    /// Climb penalty per unit of height gained (defaults to SKYPATH_FLY_COST_MULTIPLIER)
    #[arg(long)]
    multiplier: Option<f32>,

    /// Treat terrain above this height as impassable
    #[arg(long)]
    ceiling: Option<f32>,

    /// Height added to every output waypoint
    #[arg(long, default_value_t = 0.0)]
    y_offset: f32,

    /// Reject positions outside the grid instead of clamping them
    #[arg(long)]
    strict: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skypath_planner=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = PlannerConfig::from_env();
    if args.strict {
        config.clamp_endpoints = false;
    }
    // One request needs one engine.
    config.workers = 1;

    let map = HeightMap::load(&args.terrain)?;
    let mut grid = map.grid(args.cell_size.unwrap_or(map.spacing))?;
    if let Some(ceiling) = args.ceiling {
        let blocked = grid.block_above(ceiling);
        tracing::info!(blocked, ceiling, "blocked cells above ceiling");
    }
    let grid = Arc::new(grid);

    let (planner, workers) = spawn_planner(Arc::clone(&grid), &config);
    let resolver = planner.resolver();
    let request = PathRequest::new(
        resolver.world_to_grid(args.from.position()),
        resolver.world_to_grid(args.to.position()),
        args.multiplier.unwrap_or(config.fly_cost_multiplier),
    );

    let result = planner.plan(request.clone()).await;
    let report = RouteReport::new(&request, &result, &resolver, args.y_offset);
    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");

    drop(planner);
    for worker in workers {
        worker.await?;
    }

    match result {
        Ok(path) => {
            tracing::info!(
                nodes = path.len(),
                total_cost = path.total_cost(),
                "route planned"
            );
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
