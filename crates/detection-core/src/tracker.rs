//! Temporal tracking: the SCANNING / LOCKED state machine.
//!
//! The tracker turns the per-frame winning blob into a stable region:
//!
//! - **SCANNING → LOCKED**: a winner appears. The region snaps to the
//!   winner's box exactly and a new identity starts.
//! - **LOCKED → LOCKED**: the region moves toward the winner by the
//!   smoothing factor. A center jump beyond the renewal distance starts a
//!   new identity without leaving LOCKED.
//! - **LOCKED → SCANNING**: the first frame without a winner drops the
//!   lock. There is no grace period.
//!
//! All cross-frame state lives in [`TrackerState`], an explicit value the
//! caller owns and passes in. Only this module mutates it.

use salient_region_model::{
    LockedRegion, NormRect, NotReadyPolicy, Point2D, TrackOutput, TrackState, TrackingConfig,
};

/// The winning region of one frame, in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub rect: NormRect,
    pub centroid: Point2D,
    pub score: Option<f64>,
}

impl Candidate {
    /// A candidate whose centroid is the center of its box.
    pub fn from_rect(rect: NormRect) -> Self {
        Self {
            rect,
            centroid: rect.center(),
            score: None,
        }
    }
}

/// Everything that survives from one frame to the next.
#[derive(Debug, Clone)]
pub struct TrackerState {
    state: TrackState,
    smoothed: Option<NormRect>,
    identity: u64,
    last_centroid: Option<Point2D>,
    still_frames: u32,
    frame_counter: u64,
    last_output: TrackOutput,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            state: TrackState::Scanning,
            smoothed: None,
            identity: 0,
            last_centroid: None,
            still_frames: 0,
            frame_counter: 0,
            last_output: TrackOutput::Scanning,
        }
    }
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    /// The smoothed region; `None` while scanning.
    pub fn smoothed(&self) -> Option<NormRect> {
        self.smoothed
    }

    /// Identity counter. Zero until the first lock.
    pub fn identity(&self) -> u64 {
        self.identity
    }

    /// Label of the current identity epoch.
    pub fn label(&self) -> String {
        identity_label(self.identity)
    }

    /// Consecutive still frames counted toward boredom.
    pub fn still_frames(&self) -> u32 {
        self.still_frames
    }

    /// Frames analyzed so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn last_output(&self) -> &TrackOutput {
        &self.last_output
    }

    fn release(&mut self) {
        self.state = TrackState::Scanning;
        self.smoothed = None;
        self.last_centroid = None;
        self.still_frames = 0;
    }
}

/// Label for an identity counter value, e.g. `Object_07`.
pub fn identity_label(identity: u64) -> String {
    format!("Object_{identity:02}")
}

/// Applies [`TrackingConfig`] to a [`TrackerState`].
#[derive(Debug, Clone)]
pub struct TemporalTracker {
    config: TrackingConfig,
}

impl TemporalTracker {
    pub fn new(config: TrackingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Advance the frame counter and return the index of the new frame.
    pub fn begin_frame(&self, state: &mut TrackerState) -> u64 {
        state.frame_counter += 1;
        state.frame_counter
    }

    /// Feed this frame's winner (or its absence) and produce the output.
    pub fn update(&self, state: &mut TrackerState, candidate: Option<Candidate>) -> TrackOutput {
        let output = match candidate {
            None => {
                if state.state == TrackState::Locked {
                    tracing::info!(id = %state.label(), "lock released");
                }
                state.release();
                TrackOutput::Scanning
            }
            Some(candidate) => {
                match (state.state, state.smoothed) {
                    (TrackState::Locked, Some(previous)) => {
                        self.follow(state, previous, &candidate)
                    }
                    _ => self.acquire(state, &candidate),
                }
                let rect = state.smoothed.unwrap_or(candidate.rect);
                TrackOutput::Locked(LockedRegion::new(rect, state.label(), candidate.score))
            }
        };

        state.last_output = output.clone();
        output
    }

    /// Produce the output for a tick without a frame.
    pub fn not_ready(&self, state: &mut TrackerState) -> TrackOutput {
        match self.config.not_ready {
            NotReadyPolicy::HoldLast => state.last_output.clone(),
            NotReadyPolicy::ReportScanning => {
                if state.state == TrackState::Locked {
                    tracing::info!(id = %state.label(), "lock released: no frame");
                }
                state.release();
                state.last_output = TrackOutput::Scanning;
                TrackOutput::Scanning
            }
        }
    }

    fn acquire(&self, state: &mut TrackerState, candidate: &Candidate) {
        state.state = TrackState::Locked;
        state.smoothed = Some(candidate.rect);
        state.identity += 1;
        state.last_centroid = Some(candidate.centroid);
        state.still_frames = 0;
        tracing::info!(
            id = %state.label(),
            x = candidate.rect.x,
            y = candidate.rect.y,
            w = candidate.rect.w,
            h = candidate.rect.h,
            "locked"
        );
    }

    fn follow(&self, state: &mut TrackerState, previous: NormRect, candidate: &Candidate) {
        let jump = previous.center().distance_to(&candidate.rect.center());
        state.smoothed = Some(previous.approach(&candidate.rect, self.config.smoothing));

        if jump > self.config.renewal_distance {
            state.identity += 1;
            state.still_frames = 0;
            tracing::info!(id = %state.label(), jump, "identity renewed: target jumped");
        } else if let Some(boredom) = self.config.boredom {
            let moved = state
                .last_centroid
                .map_or(f64::INFINITY, |c| c.distance_to(&candidate.centroid));
            if moved < boredom.still_distance {
                state.still_frames += 1;
                if state.still_frames >= boredom.patience_frames {
                    state.identity += 1;
                    state.still_frames = 0;
                    tracing::info!(id = %state.label(), "identity renewed: target idle");
                }
            } else {
                state.still_frames = 0;
            }
        }

        state.last_centroid = Some(candidate.centroid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use salient_region_model::BoredomConfig;

    const EPS: f64 = 1e-6;

    fn tracker(smoothing: f64, renewal_distance: f64) -> TemporalTracker {
        TemporalTracker::new(TrackingConfig {
            smoothing,
            renewal_distance,
            ..TrackingConfig::default()
        })
    }

    fn locked(output: &TrackOutput) -> &LockedRegion {
        output.region().expect("expected LOCKED output")
    }

    #[test]
    fn test_first_lock_is_exact() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();

        let target = NormRect::new(0.2, 0.3, 0.1, 0.1);
        let out = tracker.update(&mut state, Some(Candidate::from_rect(target)));

        assert_eq!(state.state(), TrackState::Locked);
        assert_eq!(state.smoothed(), Some(target));
        let region = locked(&out);
        assert_eq!(region.rect(), target);
        assert_eq!(region.id, "Object_01");
    }

    #[test]
    fn test_steady_state_interpolation() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();
        tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.0, 0.0, 0.1, 0.1))),
        );

        let out = tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.1, 0.1, 0.1, 0.1))),
        );
        let r = locked(&out);
        assert!((r.x - 0.01).abs() < EPS);
        assert!((r.y - 0.01).abs() < EPS);
        assert!((r.w - 0.1).abs() < EPS);
        assert!((r.h - 0.1).abs() < EPS);
        assert_eq!(r.id, "Object_01");
    }

    #[test]
    fn test_immediate_unlock() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();
        tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.4, 0.4, 0.2, 0.2))),
        );
        assert_eq!(state.state(), TrackState::Locked);

        let out = tracker.update(&mut state, None);
        assert_eq!(out, TrackOutput::Scanning);
        assert_eq!(state.state(), TrackState::Scanning);
        assert!(state.smoothed().is_none());
    }

    #[test]
    fn test_scanning_stays_scanning_without_winner() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();
        assert_eq!(tracker.update(&mut state, None), TrackOutput::Scanning);
        assert_eq!(tracker.update(&mut state, None), TrackOutput::Scanning);
        assert_eq!(state.identity(), 0);
    }

    #[test]
    fn test_identity_renewal_on_jump() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();

        let first = tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.1, 0.1, 0.1, 0.1))),
        );
        let far = tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.7, 0.7, 0.1, 0.1))),
        );
        assert_ne!(first.id(), far.id());
        assert_eq!(state.state(), TrackState::Locked);
    }

    #[test]
    fn test_identity_kept_within_renewal_distance() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();

        let first = tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.1, 0.1, 0.1, 0.1))),
        );
        let near = tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.15, 0.12, 0.1, 0.1))),
        );
        assert_eq!(first.id(), near.id());
    }

    #[test]
    fn test_relock_after_release_gets_new_identity() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();
        let rect = NormRect::new(0.3, 0.3, 0.2, 0.2);

        let a = tracker.update(&mut state, Some(Candidate::from_rect(rect)));
        tracker.update(&mut state, None);
        let b = tracker.update(&mut state, Some(Candidate::from_rect(rect)));

        assert_eq!(a.id(), Some("Object_01"));
        assert_eq!(b.id(), Some("Object_02"));
        // Re-acquisition snaps again.
        assert_eq!(locked(&b).rect(), rect);
    }

    #[test]
    fn test_score_is_passed_through() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();
        let candidate = Candidate {
            score: Some(42.0),
            ..Candidate::from_rect(NormRect::new(0.3, 0.3, 0.2, 0.2))
        };
        let out = tracker.update(&mut state, Some(candidate));
        assert_eq!(locked(&out).score, Some(42.0));
    }

    #[test]
    fn test_boredom_renews_identity_after_patience() {
        let tracker = TemporalTracker::new(TrackingConfig {
            boredom: Some(BoredomConfig {
                still_distance: 0.01,
                patience_frames: 3,
            }),
            ..TrackingConfig::default()
        });
        let mut state = TrackerState::new();
        let still = Candidate::from_rect(NormRect::new(0.4, 0.4, 0.2, 0.2));

        tracker.update(&mut state, Some(still));
        assert_eq!(state.identity(), 1);
        tracker.update(&mut state, Some(still));
        tracker.update(&mut state, Some(still));
        assert_eq!(state.identity(), 1);
        assert_eq!(state.still_frames(), 2);

        tracker.update(&mut state, Some(still));
        assert_eq!(state.identity(), 2);
        assert_eq!(state.still_frames(), 0);
    }

    #[test]
    fn test_boredom_resets_on_movement() {
        let tracker = TemporalTracker::new(TrackingConfig {
            boredom: Some(BoredomConfig {
                still_distance: 0.01,
                patience_frames: 2,
            }),
            ..TrackingConfig::default()
        });
        let mut state = TrackerState::new();
        let a = Candidate::from_rect(NormRect::new(0.4, 0.4, 0.2, 0.2));
        let b = Candidate::from_rect(NormRect::new(0.45, 0.4, 0.2, 0.2));

        tracker.update(&mut state, Some(a));
        tracker.update(&mut state, Some(a));
        assert_eq!(state.still_frames(), 1);
        tracker.update(&mut state, Some(b));
        assert_eq!(state.still_frames(), 0);
        assert_eq!(state.identity(), 1);
    }

    #[test]
    fn test_not_ready_hold_last() {
        let tracker = tracker(0.1, 0.2);
        let mut state = TrackerState::new();
        let out = tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.2, 0.2, 0.2, 0.2))),
        );
        assert_eq!(tracker.not_ready(&mut state), out);
        assert_eq!(state.state(), TrackState::Locked);
    }

    #[test]
    fn test_not_ready_report_scanning_resets() {
        let tracker = TemporalTracker::new(TrackingConfig {
            not_ready: NotReadyPolicy::ReportScanning,
            ..TrackingConfig::default()
        });
        let mut state = TrackerState::new();
        tracker.update(
            &mut state,
            Some(Candidate::from_rect(NormRect::new(0.2, 0.2, 0.2, 0.2))),
        );
        assert_eq!(tracker.not_ready(&mut state), TrackOutput::Scanning);
        assert_eq!(state.state(), TrackState::Scanning);
        assert!(state.smoothed().is_none());
    }

    #[test]
    fn test_identity_label_padding() {
        assert_eq!(identity_label(3), "Object_03");
        assert_eq!(identity_label(123), "Object_123");
    }

    fn arb_rect() -> impl Strategy<Value = NormRect> {
        (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(x0, x1, y0, y1)| {
            NormRect::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
        })
    }

    proptest! {
        #[test]
        fn locked_regions_stay_inside_the_frame(
            smoothing in 0.01..=1.0f64,
            renewal_distance in 0.0..=1.5f64,
            winners in prop::collection::vec(prop::option::weighted(0.8, arb_rect()), 1..40),
        ) {
            let tracker = tracker(smoothing, renewal_distance);
            let mut state = TrackerState::new();
            for winner in winners {
                let out = tracker.update(&mut state, winner.map(Candidate::from_rect));
                prop_assert_eq!(out.is_locked(), winner.is_some());
                if let Some(region) = out.region() {
                    prop_assert!(region.rect().is_within_unit(), "{:?}", region);
                }
            }
        }
    }
}
