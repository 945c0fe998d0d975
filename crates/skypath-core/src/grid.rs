//! Grid geometry and sampled terrain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boundary::BoundaryResolver;
use crate::models::{Coord, Position};

/// External height field, sampled at world (x, z).
pub trait HeightProvider {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

impl<F> HeightProvider for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Coord),
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),
    #[error("grid cell count must fit an i32 index, got {width}x{height}")]
    TooLarge { width: usize, height: usize },
    #[error("grid layer holds {actual} cells, expected {expected}")]
    LayerLength { expected: usize, actual: usize },
}

/// Terrain heights and walkability for a fixed grid.
///
/// Built once per terrain configuration and then shared read-only between
/// any number of search engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridLayers")]
pub struct GridModel {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: Position,
    walkable: Vec<bool>,
    terrain_height: Vec<f32>,
}

/// Serialized form of [`GridModel`], checked before it becomes one.
#[derive(Deserialize)]
struct GridLayers {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: Position,
    walkable: Vec<bool>,
    terrain_height: Vec<f32>,
}

impl TryFrom<GridLayers> for GridModel {
    type Error = GridError;

    fn try_from(layers: GridLayers) -> Result<Self, Self::Error> {
        let mut grid =
            GridModel::try_new(layers.width, layers.height, layers.cell_size, layers.origin)?;
        let expected = grid.cell_count();
        for actual in [layers.walkable.len(), layers.terrain_height.len()] {
            if actual != expected {
                return Err(GridError::LayerLength { expected, actual });
            }
        }
        grid.walkable = layers.walkable;
        grid.terrain_height = layers
            .terrain_height
            .into_iter()
            .map(|h| if h.is_finite() { h } else { 0.0 })
            .collect();
        Ok(grid)
    }
}

impl GridModel {
    /// Create a flat, fully walkable grid.
    ///
    /// # Panics
    ///
    /// Panics where [`GridModel::try_new`] would return an error.
    pub fn new(width: usize, height: usize, cell_size: f32, origin: Position) -> Self {
        match Self::try_new(width, height, cell_size, origin) {
            Ok(grid) => grid,
            Err(err) => panic!("{err}"),
        }
    }

    /// Create a flat, fully walkable grid, rejecting zero dimensions, a cell
    /// size that is not positive and finite, or a cell count beyond `i32`
    /// indexing.
    pub fn try_new(
        width: usize,
        height: usize,
        cell_size: f32,
        origin: Position,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::CellSize(cell_size));
        }
        let cells = width.saturating_mul(height);
        if cells > i32::MAX as usize {
            return Err(GridError::TooLarge { width, height });
        }

        Ok(Self {
            width,
            height,
            cell_size,
            origin,
            walkable: vec![true; cells],
            terrain_height: vec![0.0; cells],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn resolver(&self) -> BoundaryResolver {
        BoundaryResolver::new(self.width, self.height, self.cell_size, self.origin)
    }

    /// Fill every cell from `provider`, sampled at the cell center.
    /// Non-finite samples are stored as 0.
    pub fn sample_terrain<P: HeightProvider + ?Sized>(&mut self, provider: &P) {
        let resolver = self.resolver();
        for index in 0..self.cell_count() {
            let center = resolver.grid_to_world(self.coord(index), 0.0);
            let sample = provider.height_at(center.x, center.z);
            self.terrain_height[index] = if sample.is_finite() { sample } else { 0.0 };
        }
        tracing::debug!(
            width = self.width,
            height = self.height,
            "sampled terrain heights"
        );
    }

    pub fn set_walkable(&mut self, coord: Coord, walkable: bool) -> Result<(), GridError> {
        let index = self.index(coord).ok_or(GridError::OutOfBounds(coord))?;
        self.walkable[index] = walkable;
        Ok(())
    }

    pub fn set_height(&mut self, coord: Coord, height: f32) -> Result<(), GridError> {
        let index = self.index(coord).ok_or(GridError::OutOfBounds(coord))?;
        self.terrain_height[index] = if height.is_finite() { height } else { 0.0 };
        Ok(())
    }

    /// Mark every cell above `ceiling` as unwalkable. Returns the number of
    /// cells newly blocked.
    pub fn block_above(&mut self, ceiling: f32) -> usize {
        let mut blocked = 0;
        for (walkable, height) in self.walkable.iter_mut().zip(&self.terrain_height) {
            if *walkable && *height > ceiling {
                *walkable = false;
                blocked += 1;
            }
        }
        blocked
    }

    pub fn is_valid(&self, coord: Coord) -> bool {
        self.resolver().is_valid(coord)
    }

    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.index(coord).is_some_and(|index| self.walkable[index])
    }

    pub fn terrain_height(&self, coord: Coord) -> Option<f32> {
        self.index(coord).map(|index| self.terrain_height[index])
    }

    pub fn index(&self, coord: Coord) -> Option<usize> {
        if !self.is_valid(coord) {
            return None;
        }
        Some(coord.y as usize * self.width + coord.x as usize)
    }

    pub fn coord(&self, index: usize) -> Coord {
        Coord {
            x: (index % self.width) as i32,
            y: (index / self.width) as i32,
        }
    }

    pub fn grid_to_world(&self, coord: Coord, y_offset: f32) -> Position {
        self.resolver().grid_to_world(coord, y_offset)
    }

    pub fn world_to_grid(&self, pos: Position) -> Coord {
        self.resolver().world_to_grid_unclamped(pos)
    }

    pub(crate) fn walkable_at(&self, index: usize) -> bool {
        self.walkable[index]
    }

    pub(crate) fn height_at_index(&self, index: usize) -> f32 {
        self.terrain_height[index]
    }
}
