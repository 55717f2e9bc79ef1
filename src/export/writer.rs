//! Filesystem half of the output writer.
//!
//! Writes the per-pull-request tree: `issues/` for resolvable comment files,
//! `discussions/` for everything else, and `SUMMARY.md` at the tree root.
//! Reruns overwrite same-named files; nothing is ever deleted, so files
//! orphaned by a shrinking data set are left in place.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::github::error::ExportError;

/// Directory name for resolvable inline comment files.
const ISSUES_DIR: &str = "issues";
/// Directory name for non-resolvable comment files.
const DISCUSSIONS_DIR: &str = "discussions";
/// Summary index filename.
const SUMMARY_FILE: &str = "SUMMARY.md";

fn io_error(context: &str, error: &std::io::Error) -> ExportError {
    ExportError::Io {
        message: format!("{context}: {error}"),
    }
}

/// Writes rendered export files under one pull request root.
#[derive(Debug)]
pub struct ExportWriter {
    pr_root: Utf8PathBuf,
}

impl ExportWriter {
    /// Creates a writer rooted at `<output_root>/PR-<number>`.
    #[must_use]
    pub fn new(output_root: &Utf8Path, number: u64) -> Self {
        Self {
            pr_root: output_root.join(format!("PR-{number}")),
        }
    }

    /// Root of the tree this writer produces.
    #[must_use]
    pub fn pr_root(&self) -> &Utf8Path {
        &self.pr_root
    }

    /// Creates the output directories.
    ///
    /// Called once before the first write so that a zero-result run never
    /// leaves an empty tree behind.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` when directory creation fails.
    pub fn prepare(&self) -> Result<(), ExportError> {
        for dir in [
            self.pr_root.clone(),
            self.pr_root.join(ISSUES_DIR),
            self.pr_root.join(DISCUSSIONS_DIR),
        ] {
            fs::create_dir_all(&dir)
                .map_err(|error| io_error(&format!("create directory '{dir}'"), &error))?;
        }
        Ok(())
    }

    /// Writes one resolvable issue file.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` when the write fails.
    pub fn write_issue(&self, file_name: &str, content: &str) -> Result<(), ExportError> {
        self.write_file(&self.pr_root.join(ISSUES_DIR).join(file_name), content)
    }

    /// Writes one discussion file.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` when the write fails.
    pub fn write_discussion(&self, file_name: &str, content: &str) -> Result<(), ExportError> {
        self.write_file(&self.pr_root.join(DISCUSSIONS_DIR).join(file_name), content)
    }

    /// Writes the summary index at the tree root.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` when the write fails.
    pub fn write_summary(&self, content: &str) -> Result<(), ExportError> {
        self.write_file(&self.pr_root.join(SUMMARY_FILE), content)
    }

    fn write_file(&self, path: &Utf8Path, content: &str) -> Result<(), ExportError> {
        fs::write(path, content).map_err(|error| io_error(&format!("write '{path}'"), &error))?;
        debug!(path = %path, bytes = content.len(), "wrote export file");
        Ok(())
    }
}
