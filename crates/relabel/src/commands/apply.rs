//! `relabel apply` command implementation.

use std::path::PathBuf;

use clap::Args;
use relabel_config::{CliSettings, Config};
use relabel_rewrite::{FileOutcome, FileRewrite, Normalizer, Preset, WriteMode};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the apply command.
#[derive(Args)]
pub(crate) struct ApplyArgs {
    /// Markup file to rewrite (overrides config; default: src/rules.html).
    path: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover relabel.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the result here instead of rewriting in place (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rule preset: collapse or repair (overrides config).
    #[arg(long)]
    preset: Option<Preset>,

    /// Copy the previous destination to <destination>.bak before writing.
    #[arg(long)]
    backup: bool,

    /// Do not make a backup, even if the config asks for one.
    #[arg(long, conflicts_with = "backup")]
    no_backup: bool,

    /// Do not write; fail if the document is not already normalized.
    #[arg(long)]
    check: bool,

    /// Enable verbose output (show per-pass replacement counts).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ApplyArgs {
    /// Execute the apply command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the document cannot be read or
    /// written, or `--check` finds a document that would change.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let mode = if self.check {
            WriteMode::Check
        } else {
            WriteMode::Write
        };

        let cli_settings = CliSettings {
            path: self.path,
            output: self.output,
            preset: self.preset,
            backup: backup_override(self.backup, self.no_backup),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let document = &config.document_resolved;
        let normalizer = Normalizer::new(config.rewrite.preset);

        let mut rewrite = FileRewrite::new(&document.path)
            .with_backup(document.backup)
            .with_mode(mode);
        if let Some(destination) = &document.output {
            rewrite = rewrite.with_destination(destination);
        }

        tracing::debug!(
            config = ?config.config_path,
            source = %rewrite.source().display(),
            destination = %rewrite.destination().display(),
            preset = %normalizer.preset(),
            backup = document.backup,
            check = self.check,
            "resolved rewrite"
        );

        if self.verbose {
            if let Some(config_path) = &config.config_path {
                output.info(&format!("Config: {}", config_path.display()));
            }
            output.info(&format!(
                "Rewriting {} -> {} ({})",
                rewrite.source().display(),
                rewrite.destination().display(),
                normalizer.preset()
            ));
        }

        let outcome = rewrite.run(&normalizer)?;

        if self.verbose {
            print_passes(&output, &outcome);
        }

        report(&output, &rewrite, &normalizer, &outcome, mode)
    }
}

/// `--backup` and `--no-backup` override the config; neither leaves it alone.
fn backup_override(backup: bool, no_backup: bool) -> Option<bool> {
    match (backup, no_backup) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Print one line per pass with its replacement count.
fn print_passes(output: &Output, outcome: &FileOutcome) {
    for pass in outcome.report.passes() {
        output.detail(&format!("  {:<20} {}", pass.rule, pass.replacements));
    }
    if let Some(backup) = &outcome.backup {
        output.detail(&format!("  backup: {}", backup.display()));
    }
}

/// Print the completion message, or fail a `--check` run that found changes.
fn report(
    output: &Output,
    rewrite: &FileRewrite,
    normalizer: &Normalizer,
    outcome: &FileOutcome,
    mode: WriteMode,
) -> Result<(), CliError> {
    let total = outcome.report.total();

    if mode == WriteMode::Check {
        if outcome.changed {
            output.warning(&format!(
                "Would rewrite {}: {total} replacements ({})",
                rewrite.source().display(),
                normalizer.preset()
            ));
            return Err(CliError::NotNormalized(rewrite.source().to_path_buf()));
        }
        output.success(&format!(
            "{} already normalized",
            rewrite.source().display()
        ));
        return Ok(());
    }

    if outcome.changed {
        output.success(&format!(
            "Rewrote {}: {total} replacements ({})",
            rewrite.destination().display(),
            normalizer.preset()
        ));
    } else {
        output.success(&format!(
            "{} already normalized",
            rewrite.source().display()
        ));
        if outcome.written {
            output.detail(&format!("  copied to {}", rewrite.destination().display()));
        }
    }

    Ok(())
}
