//! Salient Region Model
//!
//! Defines the data contracts shared by the detector and its drivers:
//! - **Grid:** Analysis grid dimensions and sizing rules
//! - **Blob:** Connected groups of active grid cells
//! - **Region:** Normalized rectangles and points
//! - **Output:** Per-tick result handed to the renderer
//! - **Config:** Detector tunables and named profiles
//! - **Frame:** The video-source seam and an in-memory RGBA frame
//!
//! All output coordinates are normalized to `[0.0, 1.0]` relative to the
//! analysis grid, and by extension to the source frame.

pub mod blob;
pub mod config;
pub mod frame;
pub mod grid;
pub mod output;
pub mod region;

pub use blob::*;
pub use config::*;
pub use frame::*;
pub use grid::*;
pub use output::*;
pub use region::*;
