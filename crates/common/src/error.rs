//! Error types shared across Salient crates.

use std::path::PathBuf;

/// Top-level error type for Salient operations.
#[derive(Debug, thiserror::Error)]
pub enum SalientError {
    #[error("Frame source error: {message}")]
    Source { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SalientError.
pub type SalientResult<T> = Result<T, SalientError>;

impl SalientError {
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_messages() {
        let err = SalientError::config("smoothing must be in (0, 1)");
        assert_eq!(
            err.to_string(),
            "Configuration error: smoothing must be in (0, 1)"
        );

        let err = SalientError::source("camera not ready");
        assert!(err.to_string().starts_with("Frame source error"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SalientError = io.into();
        assert!(matches!(err, SalientError::Io(_)));
    }

    #[test]
    fn test_json_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: SalientError = parse.into();
        assert!(matches!(err, SalientError::Json(_)));
    }
}
