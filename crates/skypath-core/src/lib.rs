//! Height-aware grid routing for airborne agents.
//!
//! A [`GridModel`] holds sampled terrain; a [`SearchEngine`] owns reusable
//! search buffers and runs A* over the grid, charging extra for every climb so
//! routes prefer flying around high ground.

pub mod boundary;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod models;
pub mod reconstruct;
pub mod state;

pub use boundary::{BoundaryPolicy, BoundaryResolver};
pub use engine::{climb_cost, octile_distance, SearchConfig, SearchEngine};
pub use error::SearchError;
pub use frontier::Frontier;
pub use grid::{GridError, GridModel, HeightProvider};
pub use models::{Coord, Path, PathRequest, Position};
pub use reconstruct::reconstruct;
pub use state::SearchState;
