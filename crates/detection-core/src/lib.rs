//! Salient Detection Core
//!
//! Turns video frames into a single smoothed, identity-labeled region:
//! - **Sampling:** Downsample the frame onto a coarse analysis grid
//! - **Scoring:** Per-cell gradient or variance score with optional liveness noise
//! - **Binarize / Morphology:** Threshold, then close and despeckle the mask
//! - **Labeling:** 4-connected components with bounds and centroids
//! - **Selection:** Size and aspect filtering, largest blob wins
//! - **Tracking:** SCANNING / LOCKED state machine with smoothing and identity renewal
//!
//! This crate is pure computation over caller-provided frames. It owns no
//! tick source, spawns nothing and keeps no state besides the explicit
//! [`TrackerState`] threaded through each call.

pub mod binarize;
pub mod error;
pub mod labeling;
pub mod morphology;
pub mod pipeline;
pub mod sampler;
pub mod scoring;
pub mod selector;
pub mod tracker;

pub use error::{DetectError, DetectResult};
pub use pipeline::{FrameAnalysis, FrameReport, SaliencePipeline};
pub use tracker::{Candidate, TemporalTracker, TrackerState};
