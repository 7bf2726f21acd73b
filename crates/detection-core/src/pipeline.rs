//! The per-tick detection pipeline.
//!
//! sample → score → binarize → close + despeckle → label → select → track
//!
//! One call to [`SaliencePipeline::process`] runs the whole chain
//! synchronously. Frame-local buffers are owned by the pipeline and
//! reallocated only when the grid dimensions change; the only state that
//! carries across frames is the caller's [`TrackerState`].
//!
//! A source that fails to render a frame costs one tick: the frame is
//! handled like a missing one under the configured not-ready policy.
//! Buffer-length mismatches stay fatal.

use serde::Serialize;

use salient_region_model::{
    Blob, DetectorConfig, FrameError, FrameSource, GridDims, TrackOutput,
};

use crate::binarize::{active_count, binarize};
use crate::error::{DetectError, DetectResult};
use crate::labeling::ComponentLabeler;
use crate::morphology::MorphologicalFilter;
use crate::sampler::FrameSampler;
use crate::scoring::{score_grid, Seed};
use crate::selector::select;
use crate::tracker::{Candidate, TemporalTracker, TrackerState};

/// Diagnostics of one analyzed frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameAnalysis {
    pub frame: u64,
    pub grid: GridDims,
    pub seed: Seed,
    /// Active cells straight after thresholding.
    pub active_cells: usize,
    /// Active cells after morphology.
    pub cleaned_cells: usize,
    pub blob_count: usize,
    pub selected: Option<Blob>,
}

/// Result of one tick.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// `None` when the source had no frame this tick.
    pub analysis: Option<FrameAnalysis>,
    pub output: TrackOutput,
}

/// Frame-local buffers, sized to the current grid.
#[derive(Debug, Default)]
struct Buffers {
    grid: Option<GridDims>,
    scores: Vec<f64>,
    mask: Vec<bool>,
    cleaned: Vec<bool>,
}

impl Buffers {
    fn fit(&mut self, grid: GridDims) {
        if self.grid != Some(grid) {
            let area = grid.area();
            self.scores = vec![0.0; area];
            self.mask = vec![false; area];
            self.cleaned = vec![false; area];
            self.grid = Some(grid);
        }
    }
}

/// The detection pipeline for one video source.
#[derive(Debug)]
pub struct SaliencePipeline {
    config: DetectorConfig,
    sampler: FrameSampler,
    morphology: MorphologicalFilter,
    labeler: ComponentLabeler,
    tracker: TemporalTracker,
    buffers: Buffers,
    last_selected: Option<Blob>,
}

impl SaliencePipeline {
    /// Create a pipeline after validating `config`.
    pub fn new(config: DetectorConfig) -> DetectResult<Self> {
        config.validate()?;
        Ok(Self {
            tracker: TemporalTracker::new(config.tracking),
            config,
            sampler: FrameSampler::new(),
            morphology: MorphologicalFilter::new(),
            labeler: ComponentLabeler::new(),
            buffers: Buffers::default(),
            last_selected: None,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run one detection cycle and return only the tracker output.
    pub fn detect<S: FrameSource + ?Sized>(
        &mut self,
        state: &mut TrackerState,
        source: &S,
    ) -> DetectResult<TrackOutput> {
        Ok(self.process(state, source)?.output)
    }

    /// Run one detection cycle with diagnostics.
    pub fn process<S: FrameSource + ?Sized>(
        &mut self,
        state: &mut TrackerState,
        source: &S,
    ) -> DetectResult<FrameReport> {
        let sampled = match self.sampler.sample(&self.config.grid, source) {
            Err(DetectError::Frame(FrameError::Render { message })) => {
                tracing::warn!(%message, "frame render failed; treating as missing frame");
                None
            }
            other => other?,
        };
        let Some(grid) = sampled else {
            tracing::debug!("source not ready");
            return Ok(FrameReport {
                analysis: None,
                output: self.tracker.not_ready(state),
            });
        };

        self.buffers.fit(grid);
        let frame = self.tracker.begin_frame(state);

        let seed = score_grid(
            self.sampler.pixels(),
            grid,
            &self.config.scoring,
            &self.config.noise,
            frame,
            &mut self.buffers.scores,
        )?;

        let active_cells = binarize(
            &self.buffers.scores,
            self.config.threshold,
            &mut self.buffers.mask,
        )?;
        self.morphology
            .apply(&self.buffers.mask, grid, &mut self.buffers.cleaned)?;
        let cleaned_cells = active_count(&self.buffers.cleaned);

        let blobs = self.labeler.label(&self.buffers.cleaned, grid)?;
        let selected = select(&blobs, grid, &self.config.blob).cloned();

        let candidate = selected.as_ref().map(|blob| Candidate {
            rect: blob.normalized_box(grid),
            centroid: blob.normalized_centroid(grid),
            score: Some(seed.score),
        });
        let output = self.tracker.update(state, candidate);

        tracing::debug!(
            frame,
            grid_width = grid.width,
            grid_height = grid.height,
            seed_score = seed.score,
            active_cells,
            cleaned_cells,
            blobs = blobs.len(),
            state = %output.state(),
            "frame analyzed"
        );

        self.last_selected = selected.clone();
        Ok(FrameReport {
            analysis: Some(FrameAnalysis {
                frame,
                grid,
                seed,
                active_cells,
                cleaned_cells,
                blob_count: blobs.len(),
                selected,
            }),
            output,
        })
    }

    /// Score map of the last analyzed frame.
    pub fn scores(&self) -> &[f64] {
        &self.buffers.scores
    }

    /// Cleaned mask of the last analyzed frame.
    pub fn cleaned_mask(&self) -> &[bool] {
        &self.buffers.cleaned
    }

    /// ASCII dump of the last analyzed frame: `#` survives morphology,
    /// `+` was active before cleanup only, `.` is inactive. Cells on the
    /// selected blob's bounding-box edge that are inactive show as `:`.
    pub fn debug_grid(&self) -> Option<String> {
        let grid = self.buffers.grid?;
        let mut out = String::with_capacity((grid.width + 1) * grid.height);
        for y in 0..grid.height {
            for x in 0..grid.width {
                let i = grid.index(x, y);
                let on_box_edge = self.last_selected.as_ref().is_some_and(|b| {
                    (x >= b.min_x && x <= b.max_x && (y == b.min_y || y == b.max_y))
                        || (y >= b.min_y && y <= b.max_y && (x == b.min_x || x == b.max_x))
                });
                let c = if self.buffers.cleaned[i] {
                    '#'
                } else if self.buffers.mask[i] {
                    '+'
                } else if on_box_edge {
                    ':'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        Some(out)
    }
}
