//! Per-tick tracker output consumed by the renderer.
//!
//! Serialized as a JSON object tagged by `state`:
//!
//! ```json
//! {"state":"SCANNING"}
//! {"state":"LOCKED","x":0.2,"y":0.3,"w":0.1,"h":0.1,"id":"Object_01","score":42.0}
//! ```

use serde::{Deserialize, Serialize};

use crate::region::NormRect;

/// Tracker state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackState {
    Scanning,
    Locked,
}

impl std::fmt::Display for TrackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackState::Scanning => f.write_str("SCANNING"),
            TrackState::Locked => f.write_str("LOCKED"),
        }
    }
}

/// The smoothed, identity-labeled region of a locked tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedRegion {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Label of the current identity epoch.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl LockedRegion {
    pub fn new(rect: NormRect, id: impl Into<String>, score: Option<f64>) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            id: id.into(),
            score,
        }
    }

    pub fn rect(&self) -> NormRect {
        NormRect::new(self.x, self.y, self.w, self.h)
    }
}

/// Result of one detection tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackOutput {
    #[default]
    Scanning,
    Locked(LockedRegion),
}

impl TrackOutput {
    pub fn state(&self) -> TrackState {
        match self {
            TrackOutput::Scanning => TrackState::Scanning,
            TrackOutput::Locked(_) => TrackState::Locked,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, TrackOutput::Locked(_))
    }

    pub fn region(&self) -> Option<&LockedRegion> {
        match self {
            TrackOutput::Locked(region) => Some(region),
            TrackOutput::Scanning => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.region().map(|r| r.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanning_json_shape() {
        let json = serde_json::to_string(&TrackOutput::Scanning).unwrap();
        assert_eq!(json, r#"{"state":"SCANNING"}"#);
    }

    #[test]
    fn test_locked_json_shape() {
        let output = TrackOutput::Locked(LockedRegion::new(
            NormRect::new(0.25, 0.5, 0.125, 0.25),
            "Object_03",
            Some(40.0),
        ));
        let value: serde_json::Value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["state"], "LOCKED");
        assert_eq!(value["x"], 0.25);
        assert_eq!(value["h"], 0.25);
        assert_eq!(value["id"], "Object_03");
        assert_eq!(value["score"], 40.0);

        let parsed: TrackOutput = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, output);
    }

    #[test]
    fn test_locked_without_score_omits_field() {
        let output = TrackOutput::Locked(LockedRegion::new(NormRect::FULL, "Object_01", None));
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("score"));
        assert_eq!(output.state(), TrackState::Locked);
        assert_eq!(output.id(), Some("Object_01"));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TrackState::Scanning.to_string(), "SCANNING");
        assert_eq!(TrackState::Locked.to_string(), "LOCKED");
    }
}
