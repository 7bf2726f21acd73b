//! Connected-component labeling over the cleaned mask.
//!
//! Blobs are grown with an explicit work list over flat indices and a
//! visited bitmap sized to the grid, so grid size never bounds recursion
//! depth. Components come out in raster order of their first cell.

use salient_region_model::{Blob, GridDims};

use crate::error::{DetectError, DetectResult};

/// Reusable labeling buffers.
#[derive(Debug, Default)]
pub struct ComponentLabeler {
    visited: Vec<bool>,
    work: Vec<usize>,
}

impl ComponentLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition the active cells of `mask` into 4-connected blobs.
    pub fn label(&mut self, mask: &[bool], grid: GridDims) -> DetectResult<Vec<Blob>> {
        DetectError::check_len("labeling mask", grid.area(), mask.len())?;

        if self.visited.len() != grid.area() {
            self.visited = vec![false; grid.area()];
        } else {
            self.visited.fill(false);
        }

        let mut blobs = Vec::new();
        for start in 0..grid.area() {
            if mask[start] && !self.visited[start] {
                blobs.push(self.grow(start, mask, grid));
            }
        }
        Ok(blobs)
    }

    fn grow(&mut self, start: usize, mask: &[bool], grid: GridDims) -> Blob {
        let (sx, sy) = grid.coords(start);
        let mut blob = Blob {
            min_x: sx,
            max_x: sx,
            min_y: sy,
            max_y: sy,
            cell_count: 0,
            centroid: (0.0, 0.0),
        };
        let (mut sum_x, mut sum_y) = (0usize, 0usize);

        self.work.clear();
        self.work.push(start);
        self.visited[start] = true;

        while let Some(index) = self.work.pop() {
            let (x, y) = grid.coords(index);
            blob.min_x = blob.min_x.min(x);
            blob.max_x = blob.max_x.max(x);
            blob.min_y = blob.min_y.min(y);
            blob.max_y = blob.max_y.max(y);
            blob.cell_count += 1;
            sum_x += x;
            sum_y += y;

            let mut visit = |n: usize| {
                if mask[n] && !self.visited[n] {
                    self.visited[n] = true;
                    self.work.push(n);
                }
            };
            if x + 1 < grid.width {
                visit(index + 1);
            }
            if x > 0 {
                visit(index - 1);
            }
            if y + 1 < grid.height {
                visit(index + grid.width);
            }
            if y > 0 {
                visit(index - grid.width);
            }
        }

        let count = blob.cell_count as f64;
        blob.centroid = (sum_x as f64 / count, sum_y as f64 / count);
        blob
    }
}

/// One-shot labeling with fresh buffers.
pub fn find_blobs(mask: &[bool], grid: GridDims) -> DetectResult<Vec<Blob>> {
    ComponentLabeler::new().label(mask, grid)
}
