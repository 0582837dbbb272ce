//! Error types for the scene model

use thiserror::Error;

/// Errors from scene mutations addressed by source id
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("Unknown source id: {0}")]
    SourceNotFound(u32),

    #[error("Source id already in use: {0}")]
    DuplicateId(u32),
}

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
