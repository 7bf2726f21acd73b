//! Detector configuration and named profiles.
//!
//! Every field has a default so profile files only need to name what they
//! change. Three built-in profiles are provided:
//!
//! - `default`: edge-seeking scoring on a 32px cell grid.
//! - `legacy`: a fixed 32-column grid scored by brightness attraction,
//!   edge repulsion and liveness noise.
//! - `focus`: edge-seeking scoring with boredom renewal enabled.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::grid::GridSizing;

/// Names accepted by [`DetectorConfig::profile`].
pub const PROFILE_NAMES: [&str; 3] = ["default", "legacy", "focus"];

/// Errors raised while loading or validating a detector configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown profile `{name}` (expected one of: {})", PROFILE_NAMES.join(", "))]
    UnknownProfile { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// All tunables of the detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// How the analysis grid is derived from the frame size.
    pub grid: GridSizing,

    /// Per-cell scoring rule.
    pub scoring: ScoringRule,

    /// Deterministic liveness noise added to every cell score.
    pub noise: NoiseConfig,

    /// Binarization cutoff: a cell is active when `score > threshold`.
    pub threshold: f64,

    /// Candidate blob filters.
    pub blob: BlobFilter,

    /// Temporal tracking parameters.
    pub tracking: TrackingConfig,
}

/// Per-cell scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ScoringRule {
    /// Score rises with gradient magnitude, clamped to `gradient_ceiling`.
    /// Cells whose gradient is below `gradient_floor` score zero.
    EdgeSeeking {
        gradient_floor: f64,
        gradient_ceiling: f64,
    },

    /// Prefers local variance with weak directional gradient:
    /// `std_dev * variance_weight - edge * edge_weight`, where the edge
    /// term only applies once the gradient exceeds `edge_floor`. Cells
    /// whose luminance lies strictly inside `brightness_range` earn
    /// `attraction_bonus`.
    EdgeAversive {
        variance_weight: f64,
        edge_weight: f64,
        edge_floor: f64,
        attraction_bonus: f64,
        brightness_range: (f64, f64),
    },
}

impl Default for ScoringRule {
    fn default() -> Self {
        ScoringRule::EdgeSeeking {
            gradient_floor: 0.0,
            gradient_ceiling: 255.0,
        }
    }
}

/// Parameters of the deterministic liveness noise term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Amplitude. Zero disables the term.
    pub weight: f64,
    /// Phase offset making the pattern reproducible per seed.
    pub seed: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            weight: 0.0,
            seed: 0.0,
        }
    }
}

/// Lower bound on a candidate blob's size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinClusterSize {
    /// Absolute number of cells.
    Cells(usize),
    /// Fraction of the grid area.
    AreaFraction(f64),
}

impl MinClusterSize {
    /// Whether `cell_count` satisfies the bound on a grid of `area` cells.
    pub fn admits(&self, cell_count: usize, area: usize) -> bool {
        match *self {
            MinClusterSize::Cells(min) => cell_count >= min,
            MinClusterSize::AreaFraction(f) => cell_count as f64 >= area as f64 * f,
        }
    }
}

/// Inclusive aspect-ratio (`width / height`) bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectBounds {
    pub min: f64,
    pub max: f64,
}

impl AspectBounds {
    pub fn contains(&self, ratio: f64) -> bool {
        ratio >= self.min && ratio <= self.max
    }
}

/// Candidate blob filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobFilter {
    pub min_size: MinClusterSize,
    /// Largest admissible blob as a fraction of the grid area.
    pub max_fraction: f64,
    /// Optional aspect-ratio gate. `None` disables it.
    pub aspect: Option<AspectBounds>,
}

impl Default for BlobFilter {
    fn default() -> Self {
        Self {
            min_size: MinClusterSize::Cells(10),
            max_fraction: 0.4,
            aspect: Some(AspectBounds { min: 0.2, max: 5.0 }),
        }
    }
}

/// What a tick reports when the source has no frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotReadyPolicy {
    /// Repeat the last output; tracker state is untouched.
    #[default]
    HoldLast,
    /// Drop any lock and report SCANNING.
    ReportScanning,
}

/// Stillness-triggered identity renewal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoredomConfig {
    /// Centroid movement (normalized) below which a frame counts as still.
    pub still_distance: f64,
    /// Consecutive still frames before the identity renews.
    pub patience_frames: u32,
}

/// Temporal tracking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Interpolation weight `t` applied per frame while locked.
    pub smoothing: f64,
    /// Center jump (normalized) above which a new identity starts.
    pub renewal_distance: f64,
    pub boredom: Option<BoredomConfig>,
    pub not_ready: NotReadyPolicy,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            renewal_distance: 0.2,
            boredom: None,
            not_ready: NotReadyPolicy::HoldLast,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            grid: GridSizing::default(),
            scoring: ScoringRule::default(),
            noise: NoiseConfig::default(),
            threshold: 30.0,
            blob: BlobFilter::default(),
            tracking: TrackingConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Look up a built-in profile by name.
    pub fn profile(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "legacy" => Ok(Self {
                grid: GridSizing::FixedWidth { columns: 32 },
                scoring: ScoringRule::EdgeAversive {
                    variance_weight: 1.0,
                    edge_weight: 2.0,
                    edge_floor: 15.0,
                    attraction_bonus: 10.0,
                    brightness_range: (20.0, 230.0),
                },
                noise: NoiseConfig {
                    weight: 15.0,
                    seed: 0.0,
                },
                threshold: 20.0,
                blob: BlobFilter {
                    min_size: MinClusterSize::Cells(4),
                    max_fraction: 0.5,
                    aspect: None,
                },
                tracking: TrackingConfig::default(),
            }),
            "focus" => Ok(Self {
                tracking: TrackingConfig {
                    boredom: Some(BoredomConfig {
                        still_distance: 0.01,
                        patience_frames: 180,
                    }),
                    ..TrackingConfig::default()
                },
                ..Self::default()
            }),
            other => Err(ConfigError::UnknownProfile {
                name: other.to_string(),
            }),
        }
    }

    /// Parse a JSON profile and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON profile from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.grid {
            GridSizing::CellSize { cell_size } if cell_size == 0 => {
                return Err(ConfigError::invalid("grid.cell_size", "must be at least 1"));
            }
            GridSizing::FixedWidth { columns } if columns == 0 => {
                return Err(ConfigError::invalid("grid.columns", "must be at least 1"));
            }
            _ => {}
        }

        match self.scoring {
            ScoringRule::EdgeSeeking {
                gradient_floor,
                gradient_ceiling,
            } => {
                if !(gradient_floor.is_finite() && gradient_ceiling.is_finite()) {
                    return Err(ConfigError::invalid("scoring", "gradient bounds must be finite"));
                }
                if gradient_floor > gradient_ceiling {
                    return Err(ConfigError::invalid(
                        "scoring.gradient_floor",
                        format!("{gradient_floor} exceeds gradient_ceiling {gradient_ceiling}"),
                    ));
                }
            }
            ScoringRule::EdgeAversive {
                brightness_range: (lo, hi),
                ..
            } => {
                if lo > hi {
                    return Err(ConfigError::invalid(
                        "scoring.brightness_range",
                        format!("lower bound {lo} exceeds upper bound {hi}"),
                    ));
                }
            }
        }

        if !self.threshold.is_finite() {
            return Err(ConfigError::invalid("threshold", "must be finite"));
        }
        if !self.noise.weight.is_finite() || self.noise.weight < 0.0 {
            return Err(ConfigError::invalid("noise.weight", "must be finite and >= 0"));
        }

        if let MinClusterSize::AreaFraction(f) = self.blob.min_size {
            if !(0.0..=1.0).contains(&f) {
                return Err(ConfigError::invalid("blob.min_size", "area fraction must be in [0, 1]"));
            }
        }
        if !(self.blob.max_fraction > 0.0 && self.blob.max_fraction <= 1.0) {
            return Err(ConfigError::invalid("blob.max_fraction", "must be in (0, 1]"));
        }
        if let Some(aspect) = self.blob.aspect {
            if !(aspect.min > 0.0 && aspect.min <= aspect.max) {
                return Err(ConfigError::invalid(
                    "blob.aspect",
                    format!("expected 0 < min <= max, got [{}, {}]", aspect.min, aspect.max),
                ));
            }
        }

        let t = self.tracking.smoothing;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::invalid("tracking.smoothing", "must be in (0, 1]"));
        }
        if !(self.tracking.renewal_distance >= 0.0) {
            return Err(ConfigError::invalid("tracking.renewal_distance", "must be >= 0"));
        }
        if let Some(boredom) = self.tracking.boredom {
            if boredom.patience_frames == 0 {
                return Err(ConfigError::invalid(
                    "tracking.boredom.patience_frames",
                    "must be at least 1",
                ));
            }
            if !(boredom.still_distance >= 0.0) {
                return Err(ConfigError::invalid(
                    "tracking.boredom.still_distance",
                    "must be >= 0",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_validate() {
        for name in PROFILE_NAMES {
            let config = DetectorConfig::profile(name).unwrap();
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_unknown_profile() {
        let err = DetectorConfig::profile("cinematic").unwrap_err();
        assert!(err.to_string().contains("cinematic"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DetectorConfig::from_json_str(
            r#"{"threshold": 12.5, "tracking": {"smoothing": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.threshold, 12.5);
        assert_eq!(config.tracking.smoothing, 0.5);
        assert_eq!(config.tracking.renewal_distance, 0.2);
        assert_eq!(config.blob, BlobFilter::default());
    }

    #[test]
    fn test_json_round_trip_of_legacy_profile() {
        let legacy = DetectorConfig::profile("legacy").unwrap();
        let json = legacy.to_json_pretty().unwrap();
        assert_eq!(DetectorConfig::from_json_str(&json).unwrap(), legacy);
    }

    #[test]
    fn test_min_cluster_size_variants() {
        assert!(!MinClusterSize::Cells(4).admits(2, 100));
        assert!(MinClusterSize::Cells(4).admits(4, 100));
        assert!(!MinClusterSize::AreaFraction(0.05).admits(4, 100));
        assert!(MinClusterSize::AreaFraction(0.05).admits(5, 100));

        let parsed: MinClusterSize = serde_json::from_str(r#"{"area_fraction":0.02}"#).unwrap();
        assert_eq!(parsed, MinClusterSize::AreaFraction(0.02));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = DetectorConfig::default();
        config.tracking.smoothing = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "tracking.smoothing",
                ..
            })
        ));

        let mut config = DetectorConfig::default();
        config.blob.aspect = Some(AspectBounds { min: 3.0, max: 1.0 });
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.grid = GridSizing::CellSize { cell_size: 0 };
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.scoring = ScoringRule::EdgeSeeking {
            gradient_floor: 50.0,
            gradient_ceiling: 10.0,
        };
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.blob.max_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aspect_bounds_inclusive() {
        let bounds = AspectBounds { min: 0.2, max: 5.0 };
        assert!(bounds.contains(0.2));
        assert!(bounds.contains(5.0));
        assert!(!bounds.contains(6.0));
    }
}
