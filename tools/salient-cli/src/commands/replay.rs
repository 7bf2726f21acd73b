//! Track a directory of still images as a frame sequence.

use std::path::{Path, PathBuf};

use salient_common::{AppConfig, SalientError, SalientResult};
use salient_region_model::RgbaFrame;

use crate::driver;
use crate::TrackArgs;

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub async fn run(dir: PathBuf, track: TrackArgs, app: &AppConfig) -> anyhow::Result<()> {
    if !dir.is_dir() {
        return Err(SalientError::FileNotFound { path: dir }.into());
    }

    let paths = frame_paths(&dir)?;
    if paths.is_empty() {
        anyhow::bail!("No image frames found in {}", dir.display());
    }
    tracing::info!(frames = paths.len(), dir = %dir.display(), "replaying frames");

    driver::drive(paths.iter().map(|p| decode(p)), &track, app).await?;
    Ok(())
}

/// Image files in `dir`, sorted by file name.
fn frame_paths(dir: &Path) -> SalientResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_frame = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if is_frame {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decode one frame. Unreadable files become missing frames.
fn decode(path: &Path) -> Option<RgbaFrame> {
    let img = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            tracing::warn!("Skipping unreadable frame {}: {}", path.display(), e);
            return None;
        }
    };
    let (width, height) = img.dimensions();
    match RgbaFrame::new(width, height, img.into_raw()) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::warn!("Skipping malformed frame {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("salient-replay-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_frame_paths_filters_and_sorts() {
        let dir = scratch_dir("paths");
        for name in ["b.png", "a.PNG", "c.txt", "d.jpg"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }

        let names: Vec<String> = frame_paths(&dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png", "d.jpg"]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_frame_paths_on_a_file_is_an_io_error() {
        let dir = scratch_dir("not-a-dir");
        let file = dir.join("frame.png");
        std::fs::write(&file, b"").unwrap();
        assert!(matches!(frame_paths(&file), Err(SalientError::Io(_))));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_decode_round_trips_pixels() {
        let dir = scratch_dir("decode");
        let path = dir.join("frame.png");
        let mut img = image::RgbaImage::from_pixel(8, 6, image::Rgba([10, 20, 30, 255]));
        img.put_pixel(3, 2, image::Rgba([200, 100, 50, 255]));
        img.save(&path).unwrap();

        let frame = decode(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
        assert_eq!(frame.pixel(3, 2), Some([200, 100, 50, 255]));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unreadable_file_is_a_missing_frame() {
        let dir = scratch_dir("garbage");
        let path = dir.join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(decode(&path).is_none());
        std::fs::remove_dir_all(dir).ok();
    }
}
