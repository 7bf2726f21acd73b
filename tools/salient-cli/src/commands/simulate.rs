//! Track a synthetic moving-patch scene.

use salient_common::AppConfig;

use crate::driver;
use crate::scene::SyntheticScene;
use crate::TrackArgs;

pub async fn run(
    frames: u64,
    width: u32,
    height: u32,
    track: TrackArgs,
    app: &AppConfig,
) -> anyhow::Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("Frame size must be non-zero, got {width}x{height}");
    }

    tracing::info!(frames, width, height, "simulating scene");
    let scene = SyntheticScene::new(width, height);
    driver::drive((0..frames).map(|i| scene.tick(i)), &track, app).await?;
    Ok(())
}
