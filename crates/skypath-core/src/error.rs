//! Search error taxonomy.

use thiserror::Error;

use crate::models::Coord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Start or end is outside the grid or unwalkable. No state was touched.
    #[error("endpoint {coord} is out of bounds or unwalkable")]
    InvalidEndpoint { coord: Coord },

    /// The frontier ran dry before the goal was expanded.
    #[error("no route available after expanding {expanded} cells")]
    NoPathFound { expanded: usize },

    /// The iteration cap stopped the search. Should not happen on a
    /// well-formed finite grid.
    #[error("search stopped after {limit} iterations without reaching the goal")]
    IterationCapExceeded { limit: usize },

    /// Parent chain longer than the grid allows: the parent links contain a
    /// cycle.
    #[error("parent chain from {end} exceeded {limit} nodes")]
    ReconstructionOverflow { end: Coord, limit: usize },
}

impl SearchError {
    /// Routine negative outcome: nothing to route along, try again later.
    pub fn is_no_route(&self) -> bool {
        matches!(
            self,
            SearchError::NoPathFound { .. } | SearchError::IterationCapExceeded { .. }
        )
    }

    /// Internal-consistency failure that callers should escalate.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SearchError::ReconstructionOverflow { .. })
    }
}
