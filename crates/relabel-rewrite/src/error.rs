//! File rewrite errors.

use std::path::PathBuf;

/// Error returned by [`FileRewrite::run`](crate::FileRewrite::run).
///
/// Every variant is fatal: nothing is retried and no partial output is kept.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// The source could not be read, or is not valid UTF-8.
    #[error("Cannot read {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The rewritten text could not be written to the destination.
    #[error("Cannot write {}: {source}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The existing destination could not be copied aside before overwriting.
    #[error("Cannot create backup {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RewriteError {
    /// Path the failed operation was acting on.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::SourceUnreadable { path, .. }
            | Self::DestinationUnwritable { path, .. }
            | Self::Backup { path, .. } => path,
        }
    }
}
