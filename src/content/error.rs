//! Errors raised while reading the posts directory

use std::io;
use std::path::PathBuf;

/// Failure to read posts from disk
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Failed to read posts directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read post {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
