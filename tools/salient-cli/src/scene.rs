//! Synthetic scene generation

use salient_region_model::RgbaFrame;

const PATCH_COLOR: [u8; 4] = [235, 225, 210, 255];

/// A dark, softly shaded backdrop with one bright square patch drifting on
/// a Lissajous path in the left half of the frame. Every other
/// `hop_period` frames the path is mirrored into the right half, far
/// enough to start a new identity.
/// Frames inside a dropout window are missing, as from a stalled camera.
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    width: u32,
    height: u32,
    hop_period: u64,
    dropout_every: u64,
    dropout_len: u64,
}

impl SyntheticScene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            hop_period: 150,
            dropout_every: 97,
            dropout_len: 3,
        }
    }

    /// Side length of the patch in pixels.
    pub fn patch_size(&self) -> u32 {
        (self.width.min(self.height) / 4).max(1)
    }

    /// Top-left corner of the patch in frame `index`.
    pub fn patch_origin(&self, index: u64) -> (u32, u32) {
        let t = index as f64;
        let mut cx = 0.25 + 0.1 * (t * 0.02).sin();
        let cy = 0.5 + 0.2 * (t * 0.031).sin();
        if (index / self.hop_period) % 2 == 1 {
            cx = 1.0 - cx;
        }

        let size = self.patch_size() as f64;
        let x = (cx * self.width as f64 - size / 2.0).max(0.0);
        let y = (cy * self.height as f64 - size / 2.0).max(0.0);
        (x as u32, y as u32)
    }

    /// Render frame `index`.
    pub fn frame(&self, index: u64) -> RgbaFrame {
        let mut frame = RgbaFrame::filled(self.width, self.height, [0, 0, 0, 255]);
        for y in 0..self.height {
            let shade = 24 + (y * 24 / self.height.max(1)) as u8;
            frame.fill_rect(0, y, self.width, 1, [shade, shade, shade + 6, 255]);
        }

        let (px, py) = self.patch_origin(index);
        let size = self.patch_size();
        frame.fill_rect(px, py, size, size, PATCH_COLOR);
        frame
    }

    /// Frame `index`, or `None` inside a dropout window.
    pub fn tick(&self, index: u64) -> Option<RgbaFrame> {
        let phase = index % self.dropout_every;
        if index > 0 && phase >= self.dropout_every - self.dropout_len {
            None
        } else {
            Some(self.frame(index))
        }
    }
}
