//! Route planning runtime: configuration, terrain loading, a queued planner
//! service and caller-side replanning throttle.

pub mod config;
pub mod report;
pub mod service;
pub mod terrain;
pub mod throttle;

pub use config::PlannerConfig;
pub use report::RouteReport;
pub use service::{spawn_planner, PlanError, PlannerHandle};
pub use terrain::{HeightMap, TerrainError, MAX_GRID_CELLS};
pub use throttle::ReplanThrottle;
