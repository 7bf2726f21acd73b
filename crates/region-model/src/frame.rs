//! The video-source seam.
//!
//! Acquisition (camera negotiation, device choice, decoding) lives outside
//! the detector. All the detector needs from a source is a ready flag, the
//! intrinsic frame size and a way to render the current frame into an
//! RGBA buffer of arbitrary size.

/// Errors raised by a frame source while rendering.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("RGBA buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    #[error("Frame render failed: {message}")]
    Render { message: String },
}

impl FrameError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }
}

/// A live video source.
pub trait FrameSource {
    /// Whether a frame with valid dimensions and content is available.
    fn is_ready(&self) -> bool;

    /// Intrinsic frame size in pixels (`width`, `height`).
    fn dimensions(&self) -> (u32, u32);

    /// Render the current frame, resampled to `width` x `height`, into
    /// `out` as tightly packed RGBA8. `out.len()` must equal
    /// `width * height * 4`.
    fn render_into(&self, width: u32, height: u32, out: &mut [u8]) -> Result<(), FrameError>;
}

impl<S: FrameSource + ?Sized> FrameSource for &S {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn render_into(&self, width: u32, height: u32, out: &mut [u8]) -> Result<(), FrameError> {
        (**self).render_into(width, height, out)
    }
}

/// An in-memory RGBA8 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaFrame {
    /// Wrap an existing RGBA8 buffer.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(FrameError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Set one pixel; out-of-range coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Fill an axis-aligned rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgba: [u8; 4]) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end {
                self.put_pixel(px, py, rgba);
            }
        }
    }
}

impl FrameSource for RgbaFrame {
    fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Area-averaging resample: each output pixel is the mean of the source
    /// pixels its footprint covers (at least one source pixel when
    /// upsampling).
    fn render_into(&self, width: u32, height: u32, out: &mut [u8]) -> Result<(), FrameError> {
        let expected = width as usize * height as usize * 4;
        if out.len() != expected {
            return Err(FrameError::BufferLength {
                expected,
                actual: out.len(),
            });
        }
        if !self.is_ready() {
            return Err(FrameError::render("source frame is empty"));
        }

        let (sw, sh) = (self.width as u64, self.height as u64);
        let (dw, dh) = (width as u64, height as u64);

        for gy in 0..dh {
            let y0 = gy * sh / dh;
            let y1 = ((gy + 1) * sh / dh).max(y0 + 1).min(sh);
            for gx in 0..dw {
                let x0 = gx * sw / dw;
                let x1 = ((gx + 1) * sw / dw).max(x0 + 1).min(sw);

                let mut sum = [0u64; 4];
                for sy in y0..y1 {
                    let row = (sy * sw) as usize;
                    for sx in x0..x1 {
                        let i = (row + sx as usize) * 4;
                        for (c, acc) in sum.iter_mut().enumerate() {
                            *acc += self.data[i + c] as u64;
                        }
                    }
                }

                let count = (y1 - y0) * (x1 - x0);
                let o = ((gy * dw + gx) * 4) as usize;
                for (c, acc) in sum.iter().enumerate() {
                    out[o + c] = (acc / count) as u8;
                }
            }
        }

        Ok(())
    }
}
