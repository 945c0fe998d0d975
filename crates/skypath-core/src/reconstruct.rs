//! Parent-chain walk from the goal back to the start.

use crate::error::SearchError;
use crate::grid::GridModel;
use crate::models::Coord;
use crate::state::SearchState;

/// Ordered coordinates from the chain's root to `end`.
///
/// A chain longer than `max_path_length` can only come from a cycle in the
/// parent links and is reported as [`SearchError::ReconstructionOverflow`].
pub fn reconstruct(
    state: &SearchState,
    grid: &GridModel,
    end: usize,
    max_path_length: usize,
) -> Result<Vec<Coord>, SearchError> {
    let mut cells = Vec::new();
    let mut current = Some(end);
    while let Some(index) = current {
        if cells.len() >= max_path_length {
            let end = grid.coord(end);
            tracing::error!(%end, limit = max_path_length, "parent chain overflow");
            return Err(SearchError::ReconstructionOverflow {
                end,
                limit: max_path_length,
            });
        }
        cells.push(grid.coord(index));
        current = state.parent(index);
    }
    cells.reverse();
    Ok(cells)
}
