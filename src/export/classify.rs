//! Severity classification for review bot comments.
//!
//! The review bot embeds a fixed marker phrase in each inline comment body.
//! Severity is a pure function of that body: markers are checked in priority
//! order so a body carrying several markers classifies as the most severe,
//! and a body with no marker defaults to trivial.

use std::fmt;

use serde::Serialize;

/// Severity derived from marker substrings in a comment body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A potential defect; must be addressed.
    Critical,
    /// A substantive improvement suggestion.
    Major,
    /// Nitpicks and everything unmarked.
    Trivial,
}

impl Severity {
    /// All severities in display order, most severe first.
    pub const ALL: [Self; 3] = [Self::Critical, Self::Major, Self::Trivial];

    /// Lower-case label used in filenames and the summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Trivial => "trivial",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Marker substrings per severity, checked most severe first.
const MARKER_SETS: &[(Severity, &[&str])] = &[
    (Severity::Critical, &["⚠️ Potential issue"]),
    (Severity::Major, &["🛠️ Refactor suggestion"]),
    (Severity::Trivial, &["🧹 Nitpick", "Nitpick"]),
];

/// Classifies a comment body by its severity markers.
///
/// Checked most severe first; the order is the tie-break when a body
/// contains several markers. Bodies with no marker default to trivial.
#[must_use]
pub fn classify(body: &str) -> Severity {
    MARKER_SETS
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| body.contains(marker)))
        .map_or(Severity::Trivial, |(severity, _)| *severity)
}
