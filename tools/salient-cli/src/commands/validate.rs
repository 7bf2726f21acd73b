//! Validate a detector profile file.

use std::path::PathBuf;

use salient_common::SalientError;
use salient_region_model::{DetectorConfig, GridSizing, ScoringRule};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating profile at: {}", path.display());

    if !path.exists() {
        return Err(SalientError::FileNotFound { path }.into());
    }
    let config = DetectorConfig::load(&path)
        .map_err(|e| SalientError::config(format!("Invalid profile: {e}")))?;

    match config.grid {
        GridSizing::CellSize { cell_size } => println!("  Grid: {cell_size}px cells"),
        GridSizing::FixedWidth { columns } => println!("  Grid: {columns} columns"),
    }
    match config.scoring {
        ScoringRule::EdgeSeeking { .. } => println!("  Scoring: edge-seeking"),
        ScoringRule::EdgeAversive { .. } => println!("  Scoring: edge-aversive"),
    }
    println!("  Threshold: {}", config.threshold);
    println!("  Smoothing: {}", config.tracking.smoothing);
    println!("  Renewal distance: {}", config.tracking.renewal_distance);
    if let Some(boredom) = config.tracking.boredom {
        println!(
            "  Boredom: after {} still frames (< {})",
            boredom.patience_frames, boredom.still_distance
        );
    }
    println!("\nProfile is valid.");

    Ok(())
}
