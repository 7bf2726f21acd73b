//! Analysis grid dimensions and sizing rules.

use serde::{Deserialize, Serialize};

/// Dimensions of the coarse analysis grid, in cells.
///
/// Cells are addressed in row-major (raster) order: `index = y * width + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
}

impl GridDims {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Flat index of cell `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell coordinates of a flat index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Whether `(x, y)` lies on the outermost ring of cells.
    #[inline]
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Number of bytes in an RGBA buffer covering this grid.
    pub fn rgba_len(&self) -> usize {
        self.area() * 4
    }
}

/// How the analysis grid is derived from the source frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GridSizing {
    /// One cell per `cell_size` x `cell_size` block of source pixels.
    CellSize { cell_size: u32 },

    /// A fixed number of columns; rows follow the source aspect ratio.
    FixedWidth { columns: u32 },
}

impl GridSizing {
    /// Compute grid dimensions for a source frame.
    ///
    /// Returns `None` when the source has no usable size or the rule
    /// produces an empty grid.
    pub fn grid_for(&self, source_width: u32, source_height: u32) -> Option<GridDims> {
        if source_width == 0 || source_height == 0 {
            return None;
        }

        let dims = match *self {
            GridSizing::CellSize { cell_size } => {
                let cell = cell_size.max(1);
                GridDims::new(
                    (source_width / cell) as usize,
                    (source_height / cell) as usize,
                )
            }
            GridSizing::FixedWidth { columns } => {
                let aspect = source_width as f64 / source_height as f64;
                let rows = (columns as f64 / aspect).floor() as usize;
                GridDims::new(columns as usize, rows)
            }
        };

        (!dims.is_empty()).then_some(dims)
    }
}

impl Default for GridSizing {
    fn default() -> Self {
        GridSizing::CellSize { cell_size: 32 }
    }
}
