//! Error types shared across Demoscope crates.

use std::path::PathBuf;

/// Top-level error type for Demoscope operations.
#[derive(Debug, thiserror::Error)]
pub enum DemoscopeError {
    #[error("Video error: {message}")]
    Video { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Key release for a key that is not held: {key}")]
    KeyNotHeld { key: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DemoscopeError.
pub type DemoscopeResult<T> = Result<T, DemoscopeError>;

impl DemoscopeError {
    pub fn video(msg: impl Into<String>) -> Self {
        Self::Video {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    pub fn key_not_held(key: impl Into<String>) -> Self {
        Self::KeyNotHeld { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_held_names_the_key() {
        let err = DemoscopeError::key_not_held("MetaLeft");
        assert_eq!(
            err.to_string(),
            "Key release for a key that is not held: MetaLeft"
        );
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> DemoscopeResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(DemoscopeError::Io(_))));
    }
}
