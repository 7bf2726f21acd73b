//! Blob: a maximal 4-connected group of active grid cells.

use serde::{Deserialize, Serialize};

use crate::grid::GridDims;
use crate::region::{NormRect, Point2D};

/// A connected component over the analysis grid.
///
/// Bounds are inclusive grid coordinates. A blob produced by the labeler
/// always satisfies `min_x <= max_x < grid.width`, `min_y <= max_y <
/// grid.height` and `1 <= cell_count <= width() * height()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
    /// Number of member cells.
    pub cell_count: usize,
    /// Mean member position in grid coordinates.
    pub centroid: (f64, f64),
}

impl Blob {
    /// Bounding-box width in cells.
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Bounding-box height in cells.
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    /// Bounding-box aspect ratio (`width / height`).
    pub fn aspect_ratio(&self) -> f64 {
        self.width() as f64 / self.height() as f64
    }

    /// Bounding box normalized against the grid.
    pub fn normalized_box(&self, grid: GridDims) -> NormRect {
        let gw = grid.width as f64;
        let gh = grid.height as f64;
        NormRect {
            x: self.min_x as f64 / gw,
            y: self.min_y as f64 / gh,
            w: self.width() as f64 / gw,
            h: self.height() as f64 / gh,
        }
    }

    /// Centroid normalized against the grid, measured at cell centers.
    pub fn normalized_centroid(&self, grid: GridDims) -> Point2D {
        Point2D::new(
            (self.centroid.0 + 0.5) / grid.width as f64,
            (self.centroid.1 + 0.5) / grid.height as f64,
        )
    }

    /// Check the structural invariants against a grid.
    pub fn is_consistent_with(&self, grid: GridDims) -> bool {
        self.min_x <= self.max_x
            && self.max_x < grid.width
            && self.min_y <= self.max_y
            && self.max_y < grid.height
            && self.cell_count >= 1
            && self.cell_count <= self.width() * self.height()
    }
}
