//! Error types for configuration and session operations.

use crate::classification::BreakpointError;

/// Result type for session operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("Load error: {0}")]
    LoadError(String),

    #[error("No point table loaded")]
    NotLoaded,

    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<anyhow::Error> for ViewerError {
    fn from(e: anyhow::Error) -> Self {
        ViewerError::LoadError(format!("{:#}", e))
    }
}

/// Error type for configuration files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(String, String),

    #[error("Failed to parse config at '{0}': {1}")]
    Parse(String, String),

    #[error("Invalid break points: {0}")]
    Breakpoints(#[from] BreakpointError),
}
