//! Data models for the assembled export.
//!
//! These types sit between fetching and rendering: comment streams are
//! filtered, reconciled, classified, and numbered into `ReviewIssue` and
//! `Discussion` values, then handed to the renderer and writer.

use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::github::models::ReviewComment;

use super::classify::Severity;

/// An inline review comment annotated for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewIssue {
    /// 1-based position in the chronological inline sequence.
    pub sequence: usize,
    /// Severity derived from body markers.
    pub severity: Severity,
    /// Result of the conjunctive resolution policy.
    pub resolved: bool,
    /// Owning thread identifier, when reconciliation found one.
    pub thread_id: Option<String>,
    /// The underlying comment.
    pub comment: ReviewComment,
}

impl ReviewIssue {
    /// Filename for this issue, encoding sequence, severity, and state.
    #[must_use]
    pub fn file_name(&self) -> String {
        let state = if self.resolved { "resolved" } else { "unresolved" };
        format!("{:03}-{}-{}.md", self.sequence, self.severity.label(), state)
    }
}

/// Origin of a non-resolvable discussion entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionKind {
    /// A general comment on the pull request.
    Comment,
    /// The body of a formal review submission.
    Review,
}

impl fmt::Display for DiscussionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => f.write_str("comment"),
            Self::Review => f.write_str("review"),
        }
    }
}

/// A general comment or review summary, merged into one secondary sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discussion {
    /// 1-based position in the merged chronological sequence.
    pub sequence: usize,
    /// Whether this came from the comment or review stream.
    pub kind: DiscussionKind,
    /// Author login.
    pub author: Option<String>,
    /// Body text.
    pub body: Option<String>,
    /// Creation or submission timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Review state for review-sourced entries (e.g. APPROVED).
    pub state: Option<String>,
}

impl Discussion {
    /// Filename for this discussion entry; encodes the sequence only.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{:03}.md", self.sequence)
    }
}

/// Counts aggregated for the summary file and the final status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportCounts {
    /// Critical issues, resolved under the policy.
    pub critical_resolved: usize,
    /// Critical issues still open.
    pub critical_unresolved: usize,
    /// Major issues, resolved under the policy.
    pub major_resolved: usize,
    /// Major issues still open.
    pub major_unresolved: usize,
    /// Trivial issues, resolved under the policy.
    pub trivial_resolved: usize,
    /// Trivial issues still open.
    pub trivial_unresolved: usize,
    /// General comments and review summaries.
    pub discussions: usize,
}

impl ExportCounts {
    /// Records one issue in the matching severity/resolution bucket.
    pub const fn record_issue(&mut self, severity: Severity, resolved: bool) {
        let bucket = match (severity, resolved) {
            (Severity::Critical, true) => &mut self.critical_resolved,
            (Severity::Critical, false) => &mut self.critical_unresolved,
            (Severity::Major, true) => &mut self.major_resolved,
            (Severity::Major, false) => &mut self.major_unresolved,
            (Severity::Trivial, true) => &mut self.trivial_resolved,
            (Severity::Trivial, false) => &mut self.trivial_unresolved,
        };
        *bucket += 1;
    }

    /// Total number of inline issues.
    #[must_use]
    pub const fn total_issues(&self) -> usize {
        self.critical_resolved
            + self.critical_unresolved
            + self.major_resolved
            + self.major_unresolved
            + self.trivial_resolved
            + self.trivial_unresolved
    }

    /// Issues resolved under the conjunctive policy.
    #[must_use]
    pub const fn total_resolved(&self) -> usize {
        self.critical_resolved + self.major_resolved + self.trivial_resolved
    }

    /// Per-severity `(resolved, unresolved)` pair.
    #[must_use]
    pub const fn by_severity(&self, severity: Severity) -> (usize, usize) {
        match severity {
            Severity::Critical => (self.critical_resolved, self.critical_unresolved),
            Severity::Major => (self.major_resolved, self.major_unresolved),
            Severity::Trivial => (self.trivial_resolved, self.trivial_unresolved),
        }
    }
}

/// Final report returned by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Aggregated counts.
    pub counts: ExportCounts,
    /// Root of the written tree; `None` when nothing was written.
    pub output_root: Option<Utf8PathBuf>,
    /// Names of fetchers that failed and degraded to empty results.
    pub degraded_streams: Vec<String>,
}

impl ExportReport {
    /// True when the run found no review bot comments at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.counts.total_issues() == 0 && self.counts.discussions == 0
    }
}
