//! Height-map loading and sampling for grid construction.

use serde::{Deserialize, Serialize};
use skypath_core::{GridError, GridModel, HeightProvider, Position};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to read height map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid height map: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("height map declares {expected} samples but holds {actual}")]
    Shape { expected: usize, actual: usize },
    #[error("height map spacing must be positive, got {0}")]
    Spacing(f32),
    #[error("height map needs at least one row and one column")]
    Empty,
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),
    #[error("cell size {cell_size} gives a {width}x{height} grid, over the {limit} cell limit")]
    GridTooLarge {
        cell_size: f32,
        width: usize,
        height: usize,
        limit: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Largest grid [`HeightMap::grid`] will build.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Regular elevation samples, row-major with rows along z.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightMap {
    pub origin_x: f32,
    pub origin_z: f32,
    pub spacing: f32,
    pub rows: usize,
    pub cols: usize,
    pub elevations: Vec<f32>,
}

impl HeightMap {
    pub fn new(
        origin_x: f32,
        origin_z: f32,
        spacing: f32,
        rows: usize,
        cols: usize,
        elevations: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        let map = Self {
            origin_x,
            origin_z,
            spacing,
            rows,
            cols,
            elevations,
        };
        map.validate()?;
        Ok(map)
    }

    pub fn from_json(text: &str) -> Result<Self, TerrainError> {
        let map: HeightMap = serde_json::from_str(text)?;
        map.validate()?;
        Ok(map)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TerrainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_json(&text)?;
        tracing::info!(
            path = %path.display(),
            rows = map.rows,
            cols = map.cols,
            "loaded height map"
        );
        Ok(map)
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TerrainError::Empty);
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(TerrainError::Spacing(self.spacing));
        }
        let expected = self.rows.saturating_mul(self.cols);
        if self.elevations.len() != expected {
            return Err(TerrainError::Shape {
                expected,
                actual: self.elevations.len(),
            });
        }
        Ok(())
    }

    /// World-space size covered by the samples, as (x, z).
    pub fn extent(&self) -> (f32, f32) {
        (
            (self.cols - 1) as f32 * self.spacing,
            (self.rows - 1) as f32 * self.spacing,
        )
    }

    /// Bilinear elevation at world (x, z), clamped to the map extent.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        if !x.is_finite() || !z.is_finite() {
            return 0.0;
        }
        let max_row = (self.rows - 1) as f32;
        let max_col = (self.cols - 1) as f32;
        let row = ((z - self.origin_z) / self.spacing).clamp(0.0, max_row);
        let col = ((x - self.origin_x) / self.spacing).clamp(0.0, max_col);

        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(self.rows - 1);
        let c1 = (c0 + 1).min(self.cols - 1);
        let dr = row - r0 as f32;
        let dc = col - c0 as f32;

        let v00 = self.value_at(r0, c0);
        let v01 = self.value_at(r0, c1);
        let v10 = self.value_at(r1, c0);
        let v11 = self.value_at(r1, c1);

        let near = v00 + (v01 - v00) * dc;
        let far = v10 + (v11 - v10) * dc;
        near + (far - near) * dr
    }

    /// Grid spanning the map extent with `cell_size` cells, sampled from
    /// this map. At least one cell in each direction, at most
    /// [`MAX_GRID_CELLS`] in total.
    pub fn grid(&self, cell_size: f32) -> Result<GridModel, TerrainError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TerrainError::CellSize(cell_size));
        }
        let (extent_x, extent_z) = self.extent();
        let width = ((extent_x / cell_size).ceil() as usize).max(1);
        let height = ((extent_z / cell_size).ceil() as usize).max(1);
        if width.saturating_mul(height) > MAX_GRID_CELLS {
            return Err(TerrainError::GridTooLarge {
                cell_size,
                width,
                height,
                limit: MAX_GRID_CELLS,
            });
        }

        let mut grid = GridModel::try_new(
            width,
            height,
            cell_size,
            Position::new(self.origin_x, 0.0, self.origin_z),
        )?;
        grid.sample_terrain(self);
        Ok(grid)
    }

    fn value_at(&self, row: usize, col: usize) -> f32 {
        let idx = row.saturating_mul(self.cols) + col.min(self.cols - 1);
        self.elevations
            .get(idx)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

impl HeightProvider for HeightMap {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.sample(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skypath_core::Coord;

    fn ramp() -> HeightMap {
        // 2 rows x 3 cols, rising along x by 10 per sample and 100 along z.
        HeightMap::new(0.0, 0.0, 10.0, 2, 3, vec![0.0, 10.0, 20.0, 100.0, 110.0, 120.0]).unwrap()
    }

    #[test]
    fn sample_interpolates_bilinearly() {
        let map = ramp();
        assert_eq!(map.sample(0.0, 0.0), 0.0);
        assert_eq!(map.sample(5.0, 0.0), 5.0);
        assert_eq!(map.sample(20.0, 10.0), 120.0);
        assert!((map.sample(15.0, 5.0) - 65.0).abs() < 1e-4);
    }

    #[test]
    fn sample_clamps_outside_extent() {
        let map = ramp();
        assert_eq!(map.sample(-50.0, -50.0), 0.0);
        assert_eq!(map.sample(500.0, 500.0), 120.0);
        assert_eq!(map.sample(f32::NAN, 0.0), 0.0);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let err = HeightMap::new(0.0, 0.0, 1.0, 2, 2, vec![0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            TerrainError::Shape {
                expected: 4,
                actual: 3
            }
        ));
        assert!(matches!(
            HeightMap::new(0.0, 0.0, 0.0, 1, 1, vec![0.0]),
            Err(TerrainError::Spacing(_))
        ));
    }

    #[test]
    fn parses_json_document() {
        let text = r#"{"origin_x": 5.0, "origin_z": -5.0, "spacing": 2.0,
            "rows": 2, "cols": 2, "elevations": [1.0, 2.0, 3.0, 4.0]}"#;
        let map = HeightMap::from_json(text).unwrap();
        assert_eq!(map.extent(), (2.0, 2.0));
        assert!(matches!(
            HeightMap::from_json("{\"rows\": 1}"),
            Err(TerrainError::Parse(_))
        ));
    }

    #[test]
    fn grid_covers_extent_and_samples_centers() {
        let map = ramp();
        let grid = map.grid(10.0).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 1));
        // Center of (1, 0) is world (15, 5).
        let height = grid.terrain_height(Coord::new(1, 0)).unwrap();
        assert!((height - 65.0).abs() < 1e-4);
    }

    #[test]
    fn grid_rejects_unusable_cell_sizes() {
        let map = ramp();
        assert!(matches!(map.grid(0.0), Err(TerrainError::CellSize(_))));
        assert!(matches!(map.grid(f32::NAN), Err(TerrainError::CellSize(_))));

        // 20 x 10 units at 1e-4 per cell is 200000 x 100000 cells.
        let err = map.grid(1e-4).unwrap_err();
        assert!(
            matches!(err, TerrainError::GridTooLarge { width, height, .. }
                if width * height > MAX_GRID_CELLS),
            "{err}"
        );
    }
}
