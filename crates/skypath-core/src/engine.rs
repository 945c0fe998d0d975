//! Height-aware A* over a [`GridModel`].
//!
//! Moves cost their planar length; climbing into a higher cell adds
//! `height_delta * fly_cost_multiplier`, descending adds nothing. The octile
//! heuristic only covers the planar part of the cost.

use serde::{Deserialize, Serialize};
use std::f32::consts::SQRT_2;
use std::sync::Arc;

use crate::boundary::{BoundaryPolicy, BoundaryResolver};
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::grid::GridModel;
use crate::models::{Coord, Path, PathRequest};
use crate::reconstruct::reconstruct;
use crate::state::SearchState;

/// Cardinal moves first, then diagonals.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Expansion cap per search. `None` means one full grid traversal.
    pub max_iterations: Option<usize>,
    /// Longest parent chain accepted by reconstruction. `None` means the
    /// cell count.
    pub max_path_length: Option<usize>,
    /// Whether out-of-range endpoints are clamped or rejected.
    pub boundary: BoundaryPolicy,
}

/// Octile distance between two cells, in world units.
pub fn octile_distance(a: Coord, b: Coord, cell_size: f32) -> f32 {
    let dx = (a.x as f32 - b.x as f32).abs();
    let dy = (a.y as f32 - b.y as f32).abs();
    (dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy)) * cell_size
}

/// Climb penalty for moving from `from_height` to `to_height`.
pub fn climb_cost(from_height: f32, to_height: f32, fly_cost_multiplier: f32) -> f32 {
    let delta = to_height - from_height;
    if delta > 0.0 {
        delta * fly_cost_multiplier
    } else {
        0.0
    }
}

/// A search engine bound to one grid, owning one set of search buffers.
///
/// Searches take `&mut self`, so a single engine never runs two searches at
/// once. Run one engine per concurrent caller over a shared grid.
pub struct SearchEngine {
    grid: Arc<GridModel>,
    resolver: BoundaryResolver,
    state: SearchState,
    frontier: Frontier,
    config: SearchConfig,
    next_request_id: u64,
}

impl SearchEngine {
    pub fn new(grid: Arc<GridModel>) -> Self {
        Self::with_config(grid, SearchConfig::default())
    }

    /// Allocate buffers sized to `grid`. Searches never allocate afterwards.
    pub fn with_config(grid: Arc<GridModel>, config: SearchConfig) -> Self {
        let cells = grid.cell_count();
        let resolver = grid.resolver().with_policy(config.boundary);
        Self {
            resolver,
            state: SearchState::new(cells),
            frontier: Frontier::with_capacity(frontier_bound(cells)),
            config,
            next_request_id: 0,
            grid,
        }
    }

    pub fn grid(&self) -> &Arc<GridModel> {
        &self.grid
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn resolver(&self) -> BoundaryResolver {
        self.resolver
    }

    /// Buffers of the most recent search.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Number of searches started on this engine.
    pub fn searches(&self) -> u64 {
        self.next_request_id
    }

    pub fn max_iterations(&self) -> usize {
        self.config
            .max_iterations
            .unwrap_or_else(|| self.grid.cell_count())
    }

    pub fn max_path_length(&self) -> usize {
        self.config
            .max_path_length
            .unwrap_or_else(|| self.grid.cell_count())
    }

    pub fn execute(&mut self, request: PathRequest) -> Result<Path, SearchError> {
        self.find_path(request.start, request.end, request.fly_cost_multiplier)
    }

    pub fn find_path(
        &mut self,
        start: Coord,
        end: Coord,
        fly_cost_multiplier: f32,
    ) -> Result<Path, SearchError> {
        let max_iterations = self.max_iterations();
        self.find_path_bounded(start, end, fly_cost_multiplier, max_iterations)
    }

    pub fn find_path_bounded(
        &mut self,
        start: Coord,
        end: Coord,
        fly_cost_multiplier: f32,
        max_iterations: usize,
    ) -> Result<Path, SearchError> {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);

        let start_idx = self.resolve_endpoint(start)?;
        let end_idx = self.resolve_endpoint(end)?;
        let multiplier = sanitize_multiplier(fly_cost_multiplier);

        let grid = &*self.grid;
        let goal = grid.coord(end_idx);
        let cell_size = grid.cell_size();

        self.state.reset();
        self.frontier.clear();

        self.state
            .open_start(start_idx, octile_distance(grid.coord(start_idx), goal, cell_size));
        self.frontier.insert(&mut self.state, start_idx);

        let mut expanded = 0usize;
        while let Some(current) = self.frontier.extract_min(&mut self.state) {
            if expanded >= max_iterations {
                tracing::warn!(
                    request_id,
                    limit = max_iterations,
                    "search hit iteration cap"
                );
                return Err(SearchError::IterationCapExceeded {
                    limit: max_iterations,
                });
            }
            expanded += 1;
            self.state.mark_visited(current);

            if current == end_idx {
                let cells = reconstruct(&self.state, grid, end_idx, self.max_path_length())?;
                let total_cost = self.state.g_cost(end_idx);
                tracing::debug!(
                    request_id,
                    expanded,
                    nodes = cells.len(),
                    total_cost,
                    "path found"
                );
                return Ok(Path::new(cells, total_cost, expanded, request_id));
            }

            expand(
                grid,
                &mut self.state,
                &mut self.frontier,
                current,
                goal,
                multiplier,
            );
        }

        tracing::debug!(request_id, expanded, "no route available");
        Err(SearchError::NoPathFound { expanded })
    }

    fn resolve_endpoint(&self, coord: Coord) -> Result<usize, SearchError> {
        let resolved = self.resolver.resolve(coord);
        match self.grid.index(resolved) {
            Some(index) if self.grid.walkable_at(index) => Ok(index),
            _ => {
                tracing::debug!(%coord, "rejected endpoint");
                Err(SearchError::InvalidEndpoint { coord })
            }
        }
    }
}

/// Most entries the frontier can ever hold during one search.
///
/// Cells are expanded at most once and each expansion pushes at most one
/// entry per neighbour, so superseded entries included the heap never holds
/// more than `8 * cells` pushes plus the start cell.
pub(crate) fn frontier_bound(cells: usize) -> usize {
    cells
        .saturating_mul(NEIGHBOR_OFFSETS.len())
        .saturating_add(1)
}

fn sanitize_multiplier(multiplier: f32) -> f32 {
    if multiplier.is_finite() && multiplier > 0.0 {
        multiplier
    } else {
        0.0
    }
}

fn expand(
    grid: &GridModel,
    state: &mut SearchState,
    frontier: &mut Frontier,
    current: usize,
    goal: Coord,
    multiplier: f32,
) {
    let here = grid.coord(current);
    let here_height = grid.height_at_index(current);
    let base_g = state.g_cost(current);
    let cell_size = grid.cell_size();

    for (dx, dy) in NEIGHBOR_OFFSETS {
        let next = Coord::new(here.x + dx, here.y + dy);
        let Some(next_idx) = grid.index(next) else {
            continue;
        };
        if !grid.walkable_at(next_idx) || state.is_visited(next_idx) {
            continue;
        }

        let diagonal = dx != 0 && dy != 0;
        // A diagonal needs at least one open cardinal cell beside it.
        if diagonal
            && !grid.is_walkable(Coord::new(here.x + dx, here.y))
            && !grid.is_walkable(Coord::new(here.x, here.y + dy))
        {
            continue;
        }

        let movement = if diagonal { SQRT_2 } else { 1.0 } * cell_size;
        let fly = climb_cost(here_height, grid.height_at_index(next_idx), multiplier);
        let tentative = base_g + movement + fly;
        if tentative < state.g_cost(next_idx) {
            state.relax(
                next_idx,
                tentative,
                octile_distance(next, goal, cell_size),
                fly,
                current,
            );
            frontier.insert(state, next_idx);
        }
    }
}
