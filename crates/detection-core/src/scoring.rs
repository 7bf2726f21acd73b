//! Per-cell feature scoring.
//!
//! Every score is a pure function of the sampled pixels, the cell
//! coordinates, the frame counter and configuration.
//!
//! For a cell `(x, y)` the scorer looks at its own luminance and that of
//! its right and down neighbors. Missing neighbors at the grid edge are
//! clamped to the cell itself for variance, and left out of the gradient.

use serde::Serialize;

use salient_region_model::{GridDims, NoiseConfig, ScoringRule};

use crate::error::{DetectError, DetectResult};

/// The highest-scoring cell of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Seed {
    pub x: usize,
    pub y: usize,
    pub score: f64,
}

/// Mean of the RGB channels of the cell at `index`.
#[inline]
pub fn luminance(pixels: &[u8], index: usize) -> f64 {
    let i = index * 4;
    (pixels[i] as f64 + pixels[i + 1] as f64 + pixels[i + 2] as f64) / 3.0
}

/// Local statistics of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStats {
    pub luminance: f64,
    /// Mean absolute luminance difference to the available right/down
    /// neighbors. Zero for the bottom-right cell.
    pub gradient: f64,
    /// Population standard deviation over the cell and its (clamped)
    /// right/down neighbors.
    pub std_dev: f64,
}

pub fn cell_stats(pixels: &[u8], grid: GridDims, x: usize, y: usize) -> CellStats {
    let center = luminance(pixels, grid.index(x, y));
    let right = (x + 1 < grid.width).then(|| luminance(pixels, grid.index(x + 1, y)));
    let down = (y + 1 < grid.height).then(|| luminance(pixels, grid.index(x, y + 1)));

    let (diff_sum, neighbors) = [right, down]
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), l| (sum + (center - l).abs(), n + 1));
    let gradient = if neighbors == 0 {
        0.0
    } else {
        diff_sum / neighbors as f64
    };

    let samples = [center, right.unwrap_or(center), down.unwrap_or(center)];
    let mean = samples.iter().sum::<f64>() / 3.0;
    let variance = samples.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / 3.0;

    CellStats {
        luminance: center,
        gradient,
        std_dev: variance.sqrt(),
    }
}

/// Smooth periodic "liveness" noise in `[-weight, weight]`.
///
/// `n = 0.1x + 0.1y + 0.05 * frame + seed`, `noise = sin(10n) * cos(23n) * weight`.
pub fn liveness_noise(x: usize, y: usize, frame: u64, noise: &NoiseConfig) -> f64 {
    if noise.weight == 0.0 {
        return 0.0;
    }
    let n = x as f64 * 0.1 + y as f64 * 0.1 + frame as f64 * 0.05 + noise.seed;
    (n * 10.0).sin() * (n * 23.0).cos() * noise.weight
}

/// Score one cell from its statistics under `rule`, without noise.
pub fn rule_score(stats: &CellStats, rule: &ScoringRule) -> f64 {
    match *rule {
        ScoringRule::EdgeSeeking {
            gradient_floor,
            gradient_ceiling,
        } => {
            if stats.gradient < gradient_floor {
                0.0
            } else {
                stats.gradient.min(gradient_ceiling)
            }
        }
        ScoringRule::EdgeAversive {
            variance_weight,
            edge_weight,
            edge_floor,
            attraction_bonus,
            brightness_range: (lo, hi),
        } => {
            let repulsion = if stats.gradient > edge_floor {
                stats.gradient * edge_weight
            } else {
                0.0
            };
            let attraction = if stats.luminance > lo && stats.luminance < hi {
                attraction_bonus
            } else {
                0.0
            };
            stats.std_dev * variance_weight - repulsion + attraction
        }
    }
}

/// Score every cell into `scores` and return the seed cell.
///
/// Ties for the seed go to the first cell in raster order.
pub fn score_grid(
    pixels: &[u8],
    grid: GridDims,
    rule: &ScoringRule,
    noise: &NoiseConfig,
    frame: u64,
    scores: &mut [f64],
) -> DetectResult<Seed> {
    DetectError::check_len("scoring pixels", grid.rgba_len(), pixels.len())?;
    DetectError::check_len("score map", grid.area(), scores.len())?;

    let mut seed = Seed {
        x: 0,
        y: 0,
        score: f64::NEG_INFINITY,
    };

    for y in 0..grid.height {
        for x in 0..grid.width {
            let stats = cell_stats(pixels, grid, x, y);
            let score = rule_score(&stats, rule) + liveness_noise(x, y, frame, noise);
            scores[grid.index(x, y)] = score;

            if score > seed.score {
                seed = Seed { x, y, score };
            }
        }
    }

    Ok(seed)
}
