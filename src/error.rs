//! Unified error type for tcstamp.
//!
//! Every stage of the pipeline funnels its failures into [`Error`], so the
//! CLI can report a single error per file and the watcher can isolate one
//! file's failure from the rest of the loop.

use std::path::{Path, PathBuf};

/// Unified error type covering all failure modes in tcstamp.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file's metadata could not be read.
    #[error("Stat error: failed to read metadata for {}: {source}", path.display())]
    Stat {
        /// The file that could not be stat'ed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An option or start timecode failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An external tool (ffmpeg) failed to launch or exited non-zero.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A processed file could not be filed into its lifecycle folder.
    #[error("Relocation error for {}: {message}", path.display())]
    Relocation {
        /// The file that could not be moved.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// The folder watcher could not be set up.
    #[error("Watch error: {0}")]
    Watch(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::Stat`].
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Stat {
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Relocation`].
    pub fn relocation(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Relocation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Relocation`] from a failed move.
    pub fn relocation_move(from: &Path, to: &Path, source: std::io::Error) -> Self {
        Error::Relocation {
            path: from.to_path_buf(),
            message: format!("failed to move to {}: {source}", to.display()),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
