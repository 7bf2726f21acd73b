//! Detection errors.
//!
//! Not-ready input is never an error; it short-circuits the tick. Anything
//! that reaches this type is a broken source or a broken invariant and the
//! caller should stop.

use salient_common::SalientError;
use salient_region_model::{ConfigError, FrameError};

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("{stage}: buffer length mismatch (expected {expected}, got {actual})")]
    BufferLength {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type DetectResult<T> = Result<T, DetectError>;

impl DetectError {
    /// Fail unless `actual == expected`.
    pub(crate) fn check_len(stage: &'static str, expected: usize, actual: usize) -> DetectResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(DetectError::BufferLength {
                stage,
                expected,
                actual,
            })
        }
    }
}

impl From<DetectError> for SalientError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::Frame(e) => SalientError::source(e.to_string()),
            DetectError::Config(e) => SalientError::config(e.to_string()),
            other => SalientError::detection(other.to_string()),
        }
    }
}
