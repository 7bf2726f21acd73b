//! Frame sampling onto the analysis grid.

use salient_region_model::{FrameSource, GridDims, GridSizing};

use crate::error::DetectResult;

/// Owns the downsampled RGBA buffer. The buffer is reallocated only when
/// the grid dimensions change.
#[derive(Debug, Default)]
pub struct FrameSampler {
    grid: Option<GridDims>,
    pixels: Vec<u8>,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the current frame of `source`.
    ///
    /// Returns `Ok(None)` when the source is not ready or its size yields
    /// an empty grid; nothing is sampled in that case.
    pub fn sample<S: FrameSource + ?Sized>(
        &mut self,
        sizing: &GridSizing,
        source: &S,
    ) -> DetectResult<Option<GridDims>> {
        if !source.is_ready() {
            return Ok(None);
        }

        let (width, height) = source.dimensions();
        let Some(grid) = sizing.grid_for(width, height) else {
            tracing::debug!(width, height, "source too small for analysis grid");
            return Ok(None);
        };

        if self.grid != Some(grid) {
            tracing::debug!(
                grid_width = grid.width,
                grid_height = grid.height,
                "resizing sample buffer"
            );
            self.pixels = vec![0; grid.rgba_len()];
            self.grid = Some(grid);
        }

        source.render_into(grid.width as u32, grid.height as u32, &mut self.pixels)?;
        Ok(Some(grid))
    }

    /// The most recently sampled grid, if any.
    pub fn grid(&self) -> Option<GridDims> {
        self.grid
    }

    /// RGBA pixels of the most recent sample.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
