//! CLI error types.

use std::path::PathBuf;

use relabel_config::ConfigError;
use relabel_rewrite::RewriteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Rewrite(#[from] RewriteError),

    #[error("{} is not normalized", .0.display())]
    NotNormalized(PathBuf),
}
