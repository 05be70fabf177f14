//! Error types shared across Shorts Maker crates.

use std::path::PathBuf;

/// Top-level error type for Shorts Maker operations.
#[derive(Debug, thiserror::Error)]
pub enum ShortsError {
    #[error("Media error: {message}")]
    Media { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Render service error: {message}")]
    Service { message: String },

    #[error("Download error: {message}")]
    Download { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ShortsError.
pub type ShortsResult<T> = Result<T, ShortsError>;

impl ShortsError {
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media {
            message: msg.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service {
            message: msg.into(),
        }
    }

    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download {
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
        let err = ShortsError::media("not an image: notes.txt");
        assert_eq!(err.to_string(), "Media error: not an image: notes.txt");

        let err = ShortsError::download("HTTP 404");
        assert_eq!(err.to_string(), "Download error: HTTP 404");
    }

    #[test]
    fn test_io_conversion_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ShortsError = io.into();
        assert_eq!(err.to_string(), "gone");
    }
}
