//! Read, normalize and write back a single markup file.
//!
//! The source is read in full as UTF-8. The result is written to a temp file
//! in the destination directory and persisted over the destination, so an
//! interrupted run never leaves a half-written file behind.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::document::Document;
use crate::error::RewriteError;
use crate::normalizer::Normalizer;
use crate::report::NormalizeReport;

/// Whether a rewrite persists its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write the result to the destination.
    #[default]
    Write,
    /// Only report whether the document would change.
    Check,
}

/// A rewrite of one file, optionally to a different destination.
#[derive(Debug, Clone)]
pub struct FileRewrite {
    source: PathBuf,
    destination: Option<PathBuf>,
    backup: bool,
    mode: WriteMode,
}

/// Result of a [`FileRewrite`].
#[derive(Debug)]
pub struct FileOutcome {
    /// Per-pass replacement counts.
    pub report: NormalizeReport,
    /// Whether the normalized text differs from the source text.
    pub changed: bool,
    /// Whether the destination was written.
    pub written: bool,
    /// Backup copy of the previous destination, if one was made.
    pub backup: Option<PathBuf>,
}

impl FileRewrite {
    /// Rewrite `source` in place.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: None,
            backup: false,
            mode: WriteMode::Write,
        }
    }

    /// Write the result to `destination` instead of the source.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Copy an existing destination to `<destination>.bak` before overwriting.
    #[must_use]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination path: the configured one, or the source itself.
    #[must_use]
    pub fn destination(&self) -> &Path {
        self.destination.as_deref().unwrap_or(&self.source)
    }

    /// Whether the destination names the source file, however it is spelled.
    fn in_place(&self) -> bool {
        let destination = self.destination();
        destination == self.source || canonical(destination) == canonical(&self.source)
    }

    /// Read the source, run `normalizer` over it and persist the result.
    ///
    /// An in-place rewrite that changes nothing leaves the file untouched.
    ///
    /// # Errors
    ///
    /// - [`RewriteError::SourceUnreadable`] if the source cannot be read as UTF-8.
    /// - [`RewriteError::Backup`] if the backup copy fails.
    /// - [`RewriteError::DestinationUnwritable`] if the result cannot be written.
    pub fn run(&self, normalizer: &Normalizer) -> Result<FileOutcome, RewriteError> {
        let original =
            fs::read_to_string(&self.source).map_err(|source| RewriteError::SourceUnreadable {
                path: self.source.clone(),
                source,
            })?;

        let mut document = Document::new(original.as_str());
        let report = normalizer.run(&mut document);
        let changed = document.as_str() != original;

        let mut outcome = FileOutcome {
            report,
            changed,
            written: false,
            backup: None,
        };

        if self.mode == WriteMode::Check || (!changed && self.in_place()) {
            tracing::debug!(
                path = %self.source.display(),
                changed,
                "skipping write"
            );
            return Ok(outcome);
        }

        let destination = self.destination();
        if self.backup && destination.exists() {
            outcome.backup = Some(backup(destination)?);
        }

        write_atomically(destination, document.as_str())?;
        outcome.written = true;
        tracing::info!(
            path = %destination.display(),
            replacements = outcome.report.total(),
            "wrote normalized document"
        );

        Ok(outcome)
    }
}

/// Copy `path` to `<path>.bak`, replacing any previous backup.
fn backup(path: &Path) -> Result<PathBuf, RewriteError> {
    let backup_path = with_suffix(path, ".bak");
    fs::copy(path, &backup_path).map_err(|source| RewriteError::Backup {
        path: backup_path.clone(),
        source,
    })?;
    tracing::info!(path = %backup_path.display(), "created backup");
    Ok(backup_path)
}

/// Write `contents` to a temp file next to `path`, then persist it over `path`.
///
/// An existing destination keeps its permissions. The temp file is removed on
/// every failure path.
fn write_atomically(path: &Path, contents: &str) -> Result<(), RewriteError> {
    let unwritable = |source| RewriteError::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(unwritable)?;
    tmp.write_all(contents.as_bytes()).map_err(unwritable)?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(unwritable)?;
    }

    tmp.persist(path).map_err(|e| unwritable(e.error))?;
    Ok(())
}

/// Resolve `path` through the filesystem, or keep it as given if that fails.
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// `rules.html` + `.bak` -> `rules.html.bak`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
