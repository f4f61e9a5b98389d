//! Error types for the sdfedit core.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for editor operations.
///
/// Every variant is fatal to the session: the edit history and the
/// renderer's copy of it must never silently diverge.
#[derive(Error, Debug)]
pub enum Error {
    /// Startup file does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Malformed line in a startup text file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Startup scene is structurally invalid
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// Settings value outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Growing the committed buffer failed
    #[error("Cannot grow edit buffer to {requested} primitives")]
    Capacity { requested: usize },

    /// No object id left that the renderer record can hold exactly
    #[error("Object ids exhausted: next id {next} exceeds {max}")]
    IdsExhausted { next: u32, max: u32 },

    /// Renderer buffer rejected an upload
    #[error("Scene upload failed: {0}")]
    Upload(String),

    /// Scene was already synced during this frame
    #[error("Scene already synced for frame {frame}")]
    DuplicateSync { frame: u64 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse { line, message: message.into() }
    }

    /// Create an invalid configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Errors that can only happen before the interactive loop starts.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_)
                | Self::Parse { .. }
                | Self::InvalidScene(_)
                | Self::InvalidConfig(_)
                | Self::Io(_)
                | Self::Json(_)
        )
    }
}

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;
