//! Binary morphology over the 4-neighborhood.
//!
//! Each pass reads its input and writes a separate output buffer; no pass
//! works in place.

use salient_region_model::GridDims;

use crate::error::{DetectError, DetectResult};

const NEIGHBORS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[inline]
fn neighbor(grid: GridDims, x: usize, y: usize, dx: isize, dy: isize) -> Option<usize> {
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    (nx < grid.width && ny < grid.height).then(|| grid.index(nx, ny))
}

fn check(grid: GridDims, src: &[bool], dst: &[bool]) -> DetectResult<()> {
    DetectError::check_len("morphology input", grid.area(), src.len())?;
    DetectError::check_len("morphology output", grid.area(), dst.len())
}

/// A cell becomes active if it or any in-bounds 4-neighbor is active.
pub fn dilate(src: &[bool], grid: GridDims, dst: &mut [bool]) -> DetectResult<()> {
    check(grid, src, dst)?;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let i = grid.index(x, y);
            dst[i] = src[i]
                || NEIGHBORS
                    .iter()
                    .filter_map(|&(dx, dy)| neighbor(grid, x, y, dx, dy))
                    .any(|n| src[n]);
        }
    }
    Ok(())
}

/// A cell stays active only if it and all four neighbors are active.
/// Border cells never survive.
pub fn erode(src: &[bool], grid: GridDims, dst: &mut [bool]) -> DetectResult<()> {
    check(grid, src, dst)?;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let i = grid.index(x, y);
            dst[i] = !grid.is_border(x, y)
                && src[i]
                && NEIGHBORS
                    .iter()
                    .filter_map(|&(dx, dy)| neighbor(grid, x, y, dx, dy))
                    .all(|n| src[n]);
        }
    }
    Ok(())
}

/// Drop active cells that have no active 4-neighbor.
pub fn despeckle(src: &[bool], grid: GridDims, dst: &mut [bool]) -> DetectResult<()> {
    check(grid, src, dst)?;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let i = grid.index(x, y);
            dst[i] = src[i]
                && NEIGHBORS
                    .iter()
                    .filter_map(|&(dx, dy)| neighbor(grid, x, y, dx, dy))
                    .any(|n| src[n]);
        }
    }
    Ok(())
}

/// Closing followed by despeckling, with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct MorphologicalFilter {
    dilated: Vec<bool>,
    closed: Vec<bool>,
}

impl MorphologicalFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dilation then erosion, into `out`.
    pub fn close(&mut self, mask: &[bool], grid: GridDims, out: &mut [bool]) -> DetectResult<()> {
        self.resize(grid);
        dilate(mask, grid, &mut self.dilated)?;
        erode(&self.dilated, grid, out)
    }

    /// Close `mask`, then remove isolated cells, into `out`.
    pub fn apply(&mut self, mask: &[bool], grid: GridDims, out: &mut [bool]) -> DetectResult<()> {
        self.resize(grid);
        dilate(mask, grid, &mut self.dilated)?;
        erode(&self.dilated, grid, &mut self.closed)?;
        despeckle(&self.closed, grid, out)
    }

    fn resize(&mut self, grid: GridDims) {
        if self.dilated.len() != grid.area() {
            self.dilated = vec![false; grid.area()];
            self.closed = vec![false; grid.area()];
        }
    }
}
