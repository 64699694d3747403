//! Errors reported by the command line tool

use std::path::PathBuf;

/// Failure of one tool action
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The firmware file could not be opened, read, created or written
    #[error("{path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The controller misbehaved or the protocol failed
    #[error(transparent)]
    Device(#[from] ftflash_core::Error),
}

impl ToolError {
    pub(crate) fn file(path: &std::path::Path, source: std::io::Error) -> Self {
        ToolError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }
}
