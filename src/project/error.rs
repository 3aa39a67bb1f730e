//! Error types for the migration pipeline.
//!
//! The semantic core is infallible by design (malformed input yields no
//! references); errors only arise at the filesystem and manifest edges.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the migration pipeline.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Base path missing or not a directory.
    #[error("base path is not a directory: {}", .0.display())]
    InvalidBasePath(PathBuf),

    /// Failure reading a source file.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failure writing a migrated file.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failure renaming a file or folder.
    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// Directory walk error during discovery.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// composer.json could not be parsed or serialized.
    #[error("composer manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type MigrationResult<T> = Result<T, MigrationError>;
