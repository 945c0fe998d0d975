//! World <-> grid coordinate conversion and clamping.

use serde::{Deserialize, Serialize};

use crate::models::{Coord, Position};

/// How out-of-range coordinates are handled before a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Snap to the nearest in-bounds cell.
    Clamp,
    /// Leave the coordinate as-is; the engine reports it as invalid.
    #[default]
    Reject,
}

/// Stateless conversion helper over fixed grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryResolver {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: Position,
    policy: BoundaryPolicy,
}

impl BoundaryResolver {
    pub fn new(width: usize, height: usize, cell_size: f32, origin: Position) -> Self {
        Self {
            width,
            height,
            cell_size,
            origin,
            policy: BoundaryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn is_valid(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as i64) < self.width as i64
            && (coord.y as i64) < self.height as i64
    }

    pub fn clamp(&self, coord: Coord) -> Coord {
        let max_x = self.width.saturating_sub(1).min(i32::MAX as usize) as i32;
        let max_y = self.height.saturating_sub(1).min(i32::MAX as usize) as i32;
        Coord {
            x: coord.x.clamp(0, max_x),
            y: coord.y.clamp(0, max_y),
        }
    }

    /// Applies the configured policy: clamps under `Clamp`, passes through
    /// under `Reject`.
    pub fn resolve(&self, coord: Coord) -> Coord {
        match self.policy {
            BoundaryPolicy::Clamp => self.clamp(coord),
            BoundaryPolicy::Reject => coord,
        }
    }

    pub fn world_to_grid_unclamped(&self, pos: Position) -> Coord {
        let x = ((pos.x - self.origin.x) / self.cell_size).floor();
        let y = ((pos.z - self.origin.z) / self.cell_size).floor();
        Coord {
            x: saturate_i32(x),
            y: saturate_i32(y),
        }
    }

    pub fn world_to_grid_clamped(&self, pos: Position) -> Coord {
        self.clamp(self.world_to_grid_unclamped(pos))
    }

    /// World position to grid cell, following the configured policy.
    pub fn world_to_grid(&self, pos: Position) -> Coord {
        self.resolve(self.world_to_grid_unclamped(pos))
    }

    /// Center of `coord` in world space, lifted by `y_offset`.
    pub fn grid_to_world(&self, coord: Coord, y_offset: f32) -> Position {
        Position {
            x: self.origin.x + (coord.x as f32 + 0.5) * self.cell_size,
            y: self.origin.y + y_offset,
            z: self.origin.z + (coord.y as f32 + 0.5) * self.cell_size,
        }
    }

    /// Cells between `coord` and the nearest grid edge. Zero on the border,
    /// negative when the coordinate lies outside the grid.
    pub fn distance_to_boundary(&self, coord: Coord) -> i32 {
        let right = self.width as i64 - 1 - coord.x as i64;
        let top = self.height as i64 - 1 - coord.y as i64;
        let nearest = (coord.x as i64).min(coord.y as i64).min(right).min(top);
        nearest.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

// NaN maps to 0, infinities saturate.
fn saturate_i32(value: f32) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(i32::MIN as f32, i32::MAX as f32) as i32
}
