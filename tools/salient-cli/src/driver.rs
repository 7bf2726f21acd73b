//! The driving loop shared by the tracking commands.
//!
//! The detector owns no tick source. This loop feeds it one frame per
//! tick, optionally paced in real time, prints each output as a JSON line
//! and keeps the lock-status log at a bounded rate.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;

use salient_common::{AppConfig, RateController, SalientError, SalientResult, TickClock};
use salient_detection_core::{FrameReport, SaliencePipeline, TrackerState};
use salient_region_model::{DetectorConfig, FrameError, FrameSource, RgbaFrame, TrackOutput};

use crate::TrackArgs;

/// A tick with no frame: a stalled camera or an unreadable file.
struct Unavailable;

impl FrameSource for Unavailable {
    fn is_ready(&self) -> bool {
        false
    }

    fn dimensions(&self) -> (u32, u32) {
        (0, 0)
    }

    fn render_into(&self, _: u32, _: u32, _: &mut [u8]) -> Result<(), FrameError> {
        Err(FrameError::render("no frame available"))
    }
}

/// One line of stdout.
#[derive(Serialize)]
struct TickLine<'a> {
    tick: u64,
    elapsed_ms: f64,
    output: &'a TrackOutput,
}

/// Totals reported when a run finishes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub locked_ticks: u64,
    pub missing_frames: u64,
    pub identities: u64,
}

/// Pick the detector configuration: `--config` file, then `--profile`,
/// then the profile file named in the app config, then the default profile.
pub fn resolve_config(args: &TrackArgs, app: &AppConfig) -> anyhow::Result<DetectorConfig> {
    if let Some(path) = &args.config {
        return load_profile_file(path);
    }
    if let Some(name) = &args.profile {
        return Ok(DetectorConfig::profile(name)?);
    }
    if let Some(path) = &app.profile_path {
        return load_profile_file(path);
    }
    Ok(DetectorConfig::default())
}

fn load_profile_file(path: &Path) -> anyhow::Result<DetectorConfig> {
    DetectorConfig::load(path)
        .with_context(|| format!("Failed to load detector profile {}", path.display()))
}

/// Run one tick. A missing frame goes through the not-ready path.
fn step(
    pipeline: &mut SaliencePipeline,
    state: &mut TrackerState,
    frame: Option<&RgbaFrame>,
) -> SalientResult<FrameReport> {
    let report = match frame {
        Some(frame) => pipeline.process(state, frame),
        None => pipeline.process(state, &Unavailable),
    };
    report.map_err(SalientError::from)
}

fn tick_line(tick: u64, elapsed_ns: u64, output: &TrackOutput) -> SalientResult<String> {
    let line = TickLine {
        tick,
        elapsed_ms: TickClock::ns_to_secs(elapsed_ns) * 1000.0,
        output,
    };
    Ok(serde_json::to_string(&line)?)
}

/// Run the pipeline over `frames`. `None` items are ticks without a frame.
pub async fn drive<I>(frames: I, args: &TrackArgs, app: &AppConfig) -> anyhow::Result<RunSummary>
where
    I: IntoIterator<Item = Option<RgbaFrame>>,
{
    let config = resolve_config(args, app)?;
    tracing::info!(
        threshold = config.threshold,
        smoothing = config.tracking.smoothing,
        renewal_distance = config.tracking.renewal_distance,
        "detector configured"
    );

    let mut pipeline = SaliencePipeline::new(config)?;
    let mut state = TrackerState::new();
    let mut summary = RunSummary::default();

    let clock = TickClock::start();
    let mut status = RateController::new(app.runtime.status_log_rate_hz);
    let mut pacer = args.realtime.then(|| {
        let hz = app.runtime.tick_rate_hz.max(1);
        tokio::time::interval(Duration::from_secs_f64(1.0 / hz as f64))
    });

    for (tick, frame) in frames.into_iter().enumerate() {
        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }

        let report = step(&mut pipeline, &mut state, frame.as_ref())?;
        if report.analysis.is_none() {
            summary.missing_frames += 1;
        }

        let elapsed_ns = clock.elapsed_ns();
        println!("{}", tick_line(tick as u64, elapsed_ns, &report.output)?);

        if args.debug_grid && report.analysis.is_some() {
            if let Some(dump) = pipeline.debug_grid() {
                eprintln!("tick {tick}\n{dump}");
            }
        }

        summary.ticks += 1;
        if report.output.is_locked() {
            summary.locked_ticks += 1;
        }

        if status.should_tick(elapsed_ns) {
            tracing::info!(
                tick,
                state = %report.output.state(),
                id = report.output.id().unwrap_or("-"),
                blobs = report.analysis.as_ref().map_or(0, |a| a.blob_count),
                "status"
            );
        }
    }

    summary.identities = state.identity();
    tracing::info!(
        ticks = summary.ticks,
        locked = summary.locked_ticks,
        missing = summary.missing_frames,
        identities = summary.identities,
        started = clock.epoch_wall(),
        "run complete"
    );
    Ok(summary)
}
