//! Core data models shared by the grid, the search engine and callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::boundary::BoundaryResolver;

/// Signed grid coordinate. Negative or oversized values are representable so
/// that out-of-range requests can be clamped or rejected explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when `other` is one of the 8 grid neighbors of `self`.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// World-space position. `y` is up; the grid spans the x/z plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Horizontal (x/z) distance, ignoring altitude.
    pub fn planar_distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// A single routing request, consumed by [`crate::SearchEngine::execute`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRequest {
    pub start: Coord,
    pub end: Coord,
    pub fly_cost_multiplier: f32,
}

impl PathRequest {
    pub fn new(start: impl Into<Coord>, end: impl Into<Coord>, fly_cost_multiplier: f32) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            fly_cost_multiplier,
        }
    }
}

/// Ordered route from start to end (both inclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<Coord>,
    total_cost: f32,
    expanded: usize,
    request_id: u64,
}

impl Path {
    pub(crate) fn new(cells: Vec<Coord>, total_cost: f32, expanded: usize, request_id: u64) -> Self {
        Self {
            cells,
            total_cost,
            expanded,
            request_id,
        }
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Coord> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Coord> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Coord> {
        self.cells.last().copied()
    }

    /// Accumulated movement plus climb cost of the end cell.
    pub fn total_cost(&self) -> f32 {
        self.total_cost
    }

    /// Number of cells expanded while searching for this path.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Engine-scoped identifier of the search that produced this path.
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Cell-center world positions for steering along the route.
    pub fn to_world(&self, resolver: &BoundaryResolver, y_offset: f32) -> Vec<Position> {
        self.cells
            .iter()
            .map(|coord| resolver.grid_to_world(*coord, y_offset))
            .collect()
    }
}
